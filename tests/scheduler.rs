//! Integration tests for the court/time slot scheduler.

use chrono::NaiveTime;
use court_planner::{
    knockout_matches, round_robin_matches, schedule, tier, GameMatch, MatchCategory, Participant,
    ScheduleConfig, ScheduleOutput, SchedulingInput, Team,
};
use std::collections::HashMap;

fn config(num_courts: usize, points_per_matchup: usize, total_slots: usize) -> ScheduleConfig {
    ScheduleConfig {
        num_courts,
        slot_minutes: 15,
        points_per_matchup,
        total_slots,
        window_start: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
    }
}

fn rr(a: &str, b: &str) -> GameMatch {
    GameMatch::new(
        MatchCategory::RoundRobin,
        "Group A",
        Participant::team(a),
        Participant::team(b),
        "Group A round robin",
    )
}

fn semi(a: &str, b: &str) -> GameMatch {
    GameMatch::new(
        MatchCategory::WinnersSemiFinal,
        "Knockout",
        Participant::placeholder(a),
        Participant::placeholder(b),
        "Semifinal",
    )
}

fn group(names: &[&str], level: &str) -> Vec<Team> {
    names.iter().map(|n| Team::in_group(*n, level)).collect()
}

fn run(matches: Vec<GameMatch>, config: ScheduleConfig) -> (SchedulingInput, ScheduleOutput) {
    let input = SchedulingInput { matches, config };
    let output = schedule(&input);
    (input, output)
}

/// Checks every structural guarantee of a schedule against its input.
fn assert_invariants(input: &SchedulingInput, output: &ScheduleOutput) {
    let duration = input.config.points_per_matchup;

    // Numbering is 1..K in (start_row, court) order.
    for (i, m) in output.scheduled.iter().enumerate() {
        assert_eq!(m.match_no as usize, i + 1);
        assert_eq!(m.end_row - m.start_row, duration);
        assert!(m.end_row <= input.config.total_slots);
        assert!(m.court_index < input.config.num_courts);
    }
    for pair in output.scheduled.windows(2) {
        assert!((pair[0].start_row, pair[0].court_index) < (pair[1].start_row, pair[1].court_index));
    }

    // No team plays twice at once; no court holds two matches at once.
    for (i, a) in output.scheduled.iter().enumerate() {
        for b in &output.scheduled[i + 1..] {
            if !a.overlaps(b) {
                continue;
            }
            assert_ne!(a.court_index, b.court_index, "court double-booked");
            for id in a.game.identities() {
                if !id.is_empty() {
                    assert!(!b.game.identities().contains(&id), "{} double-booked", id);
                }
            }
        }
    }

    // Each match fills exactly its own run of cells in one column.
    let mut cell_counts: HashMap<u32, usize> = HashMap::new();
    for (row, cells) in output.grid.rows().iter().enumerate() {
        for (court, cell) in cells.iter().enumerate() {
            if let Some(no) = cell {
                let m = output.by_number(*no).expect("grid references a scheduled match");
                assert_eq!(m.court_index, court);
                assert!(m.start_row <= row && row < m.end_row);
                *cell_counts.entry(*no).or_default() += 1;
            }
        }
    }
    for m in &output.scheduled {
        assert_eq!(cell_counts.get(&m.match_no), Some(&duration));
    }

    // scheduled + unscheduled is the input multiset.
    let mut counts: HashMap<&GameMatch, i64> = HashMap::new();
    for m in &input.matches {
        *counts.entry(m).or_default() += 1;
    }
    for m in output.scheduled.iter().map(|s| &s.game).chain(&output.unscheduled) {
        *counts.entry(m).or_default() -= 1;
    }
    assert!(counts.values().all(|&c| c == 0));
}

#[test]
fn four_team_group_fills_two_courts_every_five_slots() {
    let teams = group(&["T1", "T2", "T3", "T4"], "Group A");
    let (input, output) = run(round_robin_matches(&teams), config(2, 5, 20));
    assert_invariants(&input, &output);

    assert!(output.unscheduled.is_empty());
    let placed: Vec<(u32, usize, usize, &str, &str, &str)> = output
        .scheduled
        .iter()
        .map(|m| {
            (
                m.match_no,
                m.start_row,
                m.court_index,
                m.start_time.as_str(),
                m.game.team_a.identity(),
                m.game.team_b.identity(),
            )
        })
        .collect();
    assert_eq!(
        placed,
        vec![
            (1, 0, 0, "10:00", "T1", "T2"),
            (2, 0, 1, "10:00", "T3", "T4"),
            (3, 5, 0, "11:15", "T1", "T3"),
            (4, 5, 1, "11:15", "T2", "T4"),
            (5, 10, 0, "12:30", "T1", "T4"),
            (6, 10, 1, "12:30", "T2", "T3"),
        ]
    );
    assert_eq!(output.grid.get(4, 1), Some(2));
    assert_eq!(output.grid.get(15, 0), None);
}

#[test]
fn full_tournament_keeps_phase_order() {
    let mut teams = group(&["A1", "A2", "A3", "A4"], "Group A");
    teams.extend(group(&["B1", "B2", "B3", "B4"], "Group B"));
    let mut matches = round_robin_matches(&teams);
    matches.extend(knockout_matches("Group A", "Group B", true));
    let (input, output) = run(matches, config(3, 5, 28));
    assert_invariants(&input, &output);

    for a in &output.scheduled {
        for b in &output.scheduled {
            if a.tier < b.tier {
                assert!(a.start_row <= b.start_row, "tier {} started after tier {}", a.tier, b.tier);
            }
        }
    }
    // Anything left over is from a phase no earlier than anything placed.
    let max_placed = output.scheduled.iter().map(|m| m.tier).max().unwrap_or(0);
    for m in &output.unscheduled {
        assert!(tier(m) >= max_placed);
    }
}

#[test]
fn later_phase_backfills_the_row_where_earlier_phase_ends() {
    let matches = vec![rr("A", "B"), semi("X1", "Y2"), semi("Y1", "X2")];
    let (input, output) = run(matches, config(3, 2, 4));
    assert_invariants(&input, &output);

    let rows: Vec<(u32, usize, u8)> = output
        .scheduled
        .iter()
        .map(|m| (m.match_no, m.start_row, m.tier))
        .collect();
    // The round robin match is still being played on court 1 while both semifinals start.
    assert_eq!(rows, vec![(1, 0, 0), (2, 0, 1), (3, 0, 1)]);
}

#[test]
fn blocked_phase_idles_courts_until_it_can_finish() {
    let matches = vec![rr("A", "B"), rr("A", "C"), semi("X1", "Y2")];
    let (input, output) = run(matches, config(2, 2, 4));
    assert_invariants(&input, &output);

    let rows: Vec<(u32, usize, usize, u8)> = output
        .scheduled
        .iter()
        .map(|m| (m.match_no, m.start_row, m.court_index, m.tier))
        .collect();
    // Court 2 stays empty at rows 0-1: A-C waits for A and the semifinal waits for A-C.
    assert_eq!(rows, vec![(1, 0, 0, 0), (2, 2, 0, 0), (3, 2, 1, 1)]);
    assert_eq!(output.grid.get(0, 1), None);
    assert_eq!(output.grid.get(1, 1), None);
}

#[test]
fn leftover_matches_are_reported_in_input_order() {
    let matches = vec![rr("A", "B"), rr("C", "D"), rr("E", "F"), rr("G", "H")];
    let (input, output) = run(matches.clone(), config(1, 2, 5));
    assert_invariants(&input, &output);

    assert_eq!(output.scheduled.len(), 2);
    assert_eq!(output.scheduled[1].start_row, 2);
    assert_eq!(output.unscheduled, vec![matches[2].clone(), matches[3].clone()]);
}

#[test]
fn degenerate_configs_schedule_nothing() {
    let matches = vec![rr("A", "B"), semi("X", "Y")];
    for cfg in [config(2, 5, 0), config(0, 5, 20), config(2, 6, 5), config(2, 0, 20)] {
        let (input, output) = run(matches.clone(), cfg);
        assert!(output.scheduled.is_empty());
        assert_eq!(output.unscheduled, input.matches);
        assert!(output.grid.is_empty());
        assert_eq!(output.grid.num_rows(), cfg.total_slots);
    }
}

#[test]
fn empty_team_names_never_block() {
    let matches = vec![rr("", "X"), rr("", "Y")];
    let (input, output) = run(matches, config(2, 3, 3));
    assert_invariants(&input, &output);
    assert_eq!(output.scheduled.len(), 2);
    assert!(output.scheduled.iter().all(|m| m.start_row == 0));
}

#[test]
fn placeholder_and_team_with_same_label_share_availability() {
    let a = GameMatch::new(
        MatchCategory::Other,
        "Knockout",
        Participant::team("Group A champion"),
        Participant::team("Z"),
        "Exhibition",
    );
    let b = semi("Group A champion", "Group B runner-up");
    let (input, output) = run(vec![a, b], config(2, 2, 4));
    assert_invariants(&input, &output);
    assert_eq!(output.scheduled[1].start_row, 2);
}

#[test]
fn same_input_gives_identical_output() {
    let mut teams = group(&["A1", "A2", "A3", "A4", "A5"], "Group A");
    teams.extend(group(&["B1", "B2", "B3"], "Group B"));
    let mut matches = round_robin_matches(&teams);
    matches.extend(knockout_matches("Group A", "Group B", true));
    let input = SchedulingInput {
        matches,
        config: config(4, 3, 30),
    };

    let first = schedule(&input);
    let second = schedule(&input);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn start_times_wrap_past_midnight() {
    let cfg = ScheduleConfig {
        window_start: NaiveTime::from_hms_opt(23, 30, 0).unwrap(),
        ..config(1, 1, 8)
    };
    assert_eq!(cfg.slot_label(0), "23:30");
    assert_eq!(cfg.slot_label(4), "00:30");
    assert_eq!(cfg.slot_label(96), "23:30");

    let long_slots = ScheduleConfig { slot_minutes: u32::MAX, ..cfg };
    assert_eq!(long_slots.slot_label(usize::MAX).len(), 5);
}
