//! Match catalog templates: group round robin and the two-group knockout stage.
//!
//! Knockout participants are placeholders; nothing here knows results.

use crate::logic::priority::sort_by_tier;
use crate::models::{GameMatch, MatchCategory, Participant, PlanError, Team, TournamentPlan};
use std::collections::BTreeMap;

/// Level label of the main knockout bracket matches.
pub const KNOCKOUT_LEVEL: &str = "Knockout";
/// Level label of the losers bracket matches.
pub const LOSERS_LEVEL: &str = "Losers Bracket";

/// One match per unordered pair of teams within each group. Groups are visited in sorted
/// order; teams keep roster order. Ungrouped and unassigned teams are skipped.
pub fn round_robin_matches(teams: &[Team]) -> Vec<GameMatch> {
    let mut groups: BTreeMap<&str, Vec<&Team>> = BTreeMap::new();
    for team in teams {
        if let Some(group) = team.group() {
            groups.entry(group).or_default().push(team);
        }
    }

    let mut matches = Vec::new();
    for (group, members) in &groups {
        for (i, a) in members.iter().enumerate() {
            for b in &members[i + 1..] {
                matches.push(GameMatch::new(
                    MatchCategory::RoundRobin,
                    *group,
                    Participant::team(a.name.as_str()),
                    Participant::team(b.name.as_str()),
                    format!("{} round robin", group),
                ));
            }
        }
    }
    matches
}

/// Cross-group semifinals, optional losers bracket, then 3rd place and grand final.
///
/// Order: 2 semifinals, [2 losers semifinals, losers final], 3rd place, grand final.
pub fn knockout_matches(group_1: &str, group_2: &str, include_losers: bool) -> Vec<GameMatch> {
    let mut matches = vec![
        GameMatch::new(
            MatchCategory::WinnersSemiFinal,
            KNOCKOUT_LEVEL,
            Participant::placeholder(format!("{} champion", group_1)),
            Participant::placeholder(format!("{} runner-up", group_2)),
            format!("Semifinal 1 ({} #1 vs {} #2)", group_1, group_2),
        ),
        GameMatch::new(
            MatchCategory::WinnersSemiFinal,
            KNOCKOUT_LEVEL,
            Participant::placeholder(format!("{} champion", group_2)),
            Participant::placeholder(format!("{} runner-up", group_1)),
            format!("Semifinal 2 ({} #1 vs {} #2)", group_2, group_1),
        ),
    ];

    if include_losers {
        matches.extend([
            GameMatch::new(
                MatchCategory::LosersSemiFinal,
                LOSERS_LEVEL,
                Participant::placeholder(format!("{} 3rd place", group_1)),
                Participant::placeholder(format!("{} 4th place", group_2)),
                format!("Losers semifinal 1 ({} #3 vs {} #4)", group_1, group_2),
            ),
            GameMatch::new(
                MatchCategory::LosersSemiFinal,
                LOSERS_LEVEL,
                Participant::placeholder(format!("{} 3rd place", group_2)),
                Participant::placeholder(format!("{} 4th place", group_1)),
                format!("Losers semifinal 2 ({} #3 vs {} #4)", group_2, group_1),
            ),
            GameMatch::new(
                MatchCategory::LosersFinal,
                LOSERS_LEVEL,
                Participant::placeholder("Losers semifinal winner 1"),
                Participant::placeholder("Losers semifinal winner 2"),
                "Losers bracket final",
            ),
        ]);
    }

    matches.extend([
        GameMatch::new(
            MatchCategory::ThirdPlace,
            KNOCKOUT_LEVEL,
            Participant::placeholder("Semifinal loser 1"),
            Participant::placeholder("Semifinal loser 2"),
            "3rd place match",
        ),
        GameMatch::new(
            MatchCategory::GrandFinal,
            KNOCKOUT_LEVEL,
            Participant::placeholder("Semifinal winner 1"),
            Participant::placeholder("Semifinal winner 2"),
            "Grand final",
        ),
    ]);
    matches
}

/// Replace the plan's catalog with the round robin of its current groups.
/// Returns the number of matches generated.
pub fn generate_round_robin(plan: &mut TournamentPlan) -> Result<usize, PlanError> {
    let matches = round_robin_matches(&plan.teams);
    if matches.is_empty() {
        return Err(PlanError::NoGroupedTeams);
    }
    let count = matches.len();
    plan.matches = matches;
    sort_by_tier(&mut plan.matches);
    plan.schedule = None;
    log::info!("Generated {} round robin match(es)", count);
    Ok(count)
}

/// Append the knockout stage between `group_1` and `group_2` to the plan's catalog.
/// Returns the number of matches added.
pub fn add_knockout_stage(
    plan: &mut TournamentPlan,
    group_1: &str,
    group_2: &str,
    include_losers: bool,
) -> Result<usize, PlanError> {
    let (group_1, group_2) = (group_1.trim(), group_2.trim());
    if group_1.eq_ignore_ascii_case(group_2) {
        return Err(PlanError::SameKnockoutGroups);
    }
    let matches = knockout_matches(group_1, group_2, include_losers);
    let count = matches.len();
    plan.matches.extend(matches);
    sort_by_tier(&mut plan.matches);
    plan.schedule = None;
    log::info!(
        "Added {} knockout match(es) for {} vs {}",
        count,
        group_1,
        group_2
    );
    Ok(count)
}
