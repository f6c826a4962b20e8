//! Roster helpers: random balanced grouping and sample teams for trying things out.

use crate::models::{PlanError, Team, TournamentPlan, UNASSIGNED};
use rand::seq::SliceRandom;
use rand::Rng;

/// Group labels handed out by [`balance_groups`], in order.
pub const GROUP_NAMES: [&str; 8] = [
    "Group A", "Group B", "Group C", "Group D", "Group E", "Group F", "Group G", "Group H",
];

const ADJECTIVES: [&str; 8] = [
    "Unbeatable", "Happy", "Sweaty", "Lightspeed", "Golden", "Super", "Clumsy", "Zen",
];
const NOUNS: [&str; 7] = ["Raptors", "Shuttlers", "Squad", "Smashers", "Crew", "Club", "United"];

/// Shuffle the roster and deal teams round-robin into `groups` groups, so group sizes
/// differ by at most one.
pub fn balance_groups<R: Rng>(
    teams: &mut [Team],
    groups: usize,
    rng: &mut R,
) -> Result<(), PlanError> {
    if !(2..=GROUP_NAMES.len()).contains(&groups) {
        return Err(PlanError::InvalidGroupCount(groups));
    }
    teams.shuffle(rng);
    for (i, team) in teams.iter_mut().enumerate() {
        team.level = Some(GROUP_NAMES[i % groups].to_string());
    }
    Ok(())
}

/// `count` ungrouped teams named "<Adjective> <Noun>-NN", numbered from `first_number`.
pub fn sample_teams<R: Rng>(count: usize, first_number: usize, rng: &mut R) -> Vec<Team> {
    (0..count)
        .map(|i| {
            let adjective = ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())];
            let noun = NOUNS[rng.gen_range(0..NOUNS.len())];
            let name = format!("{} {}-{:02}", adjective, noun, first_number + i);
            Team::new(name, Some(UNASSIGNED.to_string()))
        })
        .collect()
}

/// Add `count` sample teams to the plan. Returns how many were added (name clashes are skipped).
pub fn add_sample_teams<R: Rng>(
    plan: &mut TournamentPlan,
    count: usize,
    rng: &mut R,
) -> usize {
    let first = plan.teams.len() + 1;
    sample_teams(count, first, rng)
        .into_iter()
        .filter(|t| plan.add_team(t.name.clone(), t.level.clone()).is_ok())
        .count()
}

/// Rebalance the plan's roster into `groups` groups. Drops any previous schedule.
pub fn balance_plan_groups<R: Rng>(
    plan: &mut TournamentPlan,
    groups: usize,
    rng: &mut R,
) -> Result<(), PlanError> {
    if plan.teams.is_empty() {
        return Err(PlanError::NoGroupedTeams);
    }
    balance_groups(&mut plan.teams, groups, rng)?;
    plan.schedule = None;
    Ok(())
}
