//! Tournament planner: library with models and planning logic.

pub mod logic;
pub mod models;

pub use logic::{
    add_knockout_stage, add_sample_teams, balance_groups, balance_plan_groups, bracket_csv,
    bracket_sheet, category_tier, display_grid, generate_round_robin, grid_csv, knockout_matches,
    round_robin_matches, sample_teams, schedule, schedule_csv, schedule_plan, sort_by_tier, tier,
    BracketRow, DisplayGrid, ScheduleRow,
};
pub use models::{
    BracketSide, GameMatch, MatchCategory, MatchNo, MatchRecord, OperatingWindow, Participant,
    PlanError, PlanId, PlanSettings, PlanSnapshot, ScheduleConfig, ScheduleOutput, ScheduledMatch,
    SchedulingInput, SlotGrid, Team, TeamId, Tier, TournamentPlan, UNASSIGNED,
};
