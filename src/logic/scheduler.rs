//! Court/time slot scheduling.
//!
//! Greedy row-by-row fill of a `total_slots x num_courts` grid:
//! 1. At each row, the tier floor is the lowest tier still waiting.
//! 2. Each free court takes the first waiting match (input order) at the floor tier whose
//!    teams are both free at this row. It holds the court for `points_per_matchup` rows.
//! 3. After every placement the floor is recomputed, so a later phase can start on the
//!    remaining courts of the row in which the earlier phase placed its last match.
//!
//! No placement is ever revisited. Whatever is left when rows run out is unscheduled.
//! Match numbers come from a row-major scan of the final grid, not from placement order.

use crate::logic::priority::tier;
use crate::models::{
    GameMatch, MatchNo, PlanError, ScheduleConfig, ScheduleOutput, ScheduledMatch,
    SchedulingInput, SlotGrid, Tier, TournamentPlan,
};
use std::collections::HashMap;

/// First row at which each team identity is free again. Missing means free from row 0.
#[derive(Debug, Default)]
struct BusyUntil<'a> {
    rows: HashMap<&'a str, usize>,
}

impl<'a> BusyUntil<'a> {
    /// Empty identities (malformed records) never block.
    fn is_busy(&self, identity: &str, row: usize) -> bool {
        !identity.is_empty() && self.rows.get(identity).is_some_and(|&until| until > row)
    }

    fn occupy(&mut self, identity: &'a str, until: usize) {
        if !identity.is_empty() {
            self.rows.insert(identity, until);
        }
    }
}

/// Matches still waiting, as indices into the input list, in input order.
#[derive(Debug)]
struct MatchQueue {
    entries: Vec<(usize, Tier)>,
}

impl MatchQueue {
    fn new(matches: &[GameMatch]) -> Self {
        Self {
            entries: matches.iter().map(tier).enumerate().collect(),
        }
    }

    fn min_tier(&self) -> Option<Tier> {
        self.entries.iter().map(|&(_, t)| t).min()
    }

    /// Remove and return the first entry matching `pred`, keeping the rest in order.
    fn take_first(&mut self, mut pred: impl FnMut(usize, Tier) -> bool) -> Option<usize> {
        let pos = self.entries.iter().position(|&(idx, t)| pred(idx, t))?;
        Some(self.entries.remove(pos).0)
    }

    fn into_indices(self) -> impl Iterator<Item = usize> {
        self.entries.into_iter().map(|(idx, _)| idx)
    }
}

/// Place `input.matches` on courts and time slots.
///
/// Pure and deterministic: identical input gives an identical grid, numbering and
/// scheduled/unscheduled split. Never fails; degenerate configurations (no rows, no courts,
/// matches longer than the day) leave every match unscheduled.
pub fn schedule(input: &SchedulingInput) -> ScheduleOutput {
    let config = input.config;
    let matches = &input.matches;

    if config.is_degenerate() {
        if !matches.is_empty() {
            log::warn!(
                "No room to schedule: {} slot(s), {} court(s), {} slot(s) per match",
                config.total_slots,
                config.num_courts,
                config.points_per_matchup
            );
        }
        return ScheduleOutput {
            config,
            grid: SlotGrid::new(config.total_slots, config.num_courts),
            scheduled: Vec::new(),
            unscheduled: matches.clone(),
        };
    }

    let duration = config.duration();
    let mut cells: Vec<Vec<Option<usize>>> = vec![vec![None; config.num_courts]; config.total_slots];
    let mut queue = MatchQueue::new(matches);
    let mut busy = BusyUntil::default();

    let mut row = 0;
    while row + duration <= config.total_slots {
        let Some(mut min_tier) = queue.min_tier() else {
            break;
        };
        for court in 0..config.num_courts {
            // Still held by a match that started on an earlier row.
            if cells[row][court].is_some() {
                continue;
            }
            let found = queue.take_first(|idx, t| {
                t == min_tier
                    && matches[idx]
                        .identities()
                        .iter()
                        .all(|id| !busy.is_busy(id, row))
            });
            let Some(idx) = found else {
                continue;
            };

            let end = row + duration;
            for cells_row in &mut cells[row..end] {
                cells_row[court] = Some(idx);
            }
            for id in matches[idx].identities() {
                busy.occupy(id, end);
            }
            log::debug!(
                "Placed {} vs {} (tier {}) at row {} on court {}",
                matches[idx].team_a,
                matches[idx].team_b,
                min_tier,
                row,
                court + 1
            );

            match queue.min_tier() {
                Some(t) => min_tier = t,
                None => break,
            }
        }
        row += 1;
    }

    let (grid, scheduled) = number_matches(&cells, matches, &config);
    let unscheduled: Vec<GameMatch> = queue.into_indices().map(|idx| matches[idx].clone()).collect();

    let output = ScheduleOutput {
        config,
        grid,
        scheduled,
        unscheduled,
    };
    if output.is_complete() {
        log::info!("Scheduled all {} match(es)", output.scheduled.len());
    } else {
        log::warn!(
            "Scheduled {} match(es); {} could not be placed",
            output.scheduled.len(),
            output.unscheduled.len()
        );
    }
    output
}

/// Number matches 1..K by scanning the committed grid row by row, courts left to right.
/// A match is numbered at the first cell it is seen in, which is its start cell.
fn number_matches(
    cells: &[Vec<Option<usize>>],
    matches: &[GameMatch],
    config: &ScheduleConfig,
) -> (SlotGrid, Vec<ScheduledMatch>) {
    let mut numbers: HashMap<usize, MatchNo> = HashMap::new();
    let mut scheduled: Vec<ScheduledMatch> = Vec::new();

    for (row, cells_row) in cells.iter().enumerate() {
        for (court, cell) in cells_row.iter().enumerate() {
            let Some(idx) = *cell else {
                continue;
            };
            if numbers.contains_key(&idx) {
                continue;
            }
            let match_no = scheduled.len() as MatchNo + 1;
            numbers.insert(idx, match_no);
            let game = matches[idx].clone();
            scheduled.push(ScheduledMatch {
                match_no,
                start_row: row,
                end_row: row + config.duration(),
                court_index: court,
                start_time: config.slot_label(row),
                tier: tier(&game),
                game,
            });
        }
    }

    let grid = SlotGrid::from_cells(
        cells
            .iter()
            .map(|r| r.iter().map(|c| c.and_then(|idx| numbers.get(&idx).copied())).collect())
            .collect(),
    );
    (grid, scheduled)
}

/// Schedule the plan's catalog with its settings and keep the result on the plan.
pub fn schedule_plan(plan: &mut TournamentPlan) -> Result<&ScheduleOutput, PlanError> {
    plan.settings.validate()?;
    if plan.matches.is_empty() {
        return Err(PlanError::NoMatches);
    }
    let input = SchedulingInput {
        matches: plan.matches.clone(),
        config: plan.settings.to_config(),
    };
    let output = schedule(&input);
    Ok(plan.schedule.insert(output))
}
