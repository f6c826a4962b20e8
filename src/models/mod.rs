//! Data structures for tournament planning: teams, matches, schedules, plans.

mod game;
mod plan;
mod schedule;
mod team;

pub use game::{BracketSide, GameMatch, MatchCategory, MatchRecord, Participant, Tier};
pub use plan::{PlanError, PlanId, PlanSettings, PlanSnapshot, TournamentPlan};
pub use schedule::{
    MatchNo, OperatingWindow, ScheduleConfig, ScheduleOutput, ScheduledMatch, SchedulingInput,
    SlotGrid,
};
pub use team::{Team, TeamId, UNASSIGNED};
