//! Planning logic: bracket templates, phase tiers, grouping, scheduling, export.

mod bracket;
mod export;
mod grouping;
mod priority;
mod scheduler;

pub use bracket::{
    add_knockout_stage, generate_round_robin, knockout_matches, round_robin_matches,
    KNOCKOUT_LEVEL, LOSERS_LEVEL,
};
pub use export::{
    bracket_csv, bracket_sheet, display_grid, grid_csv, schedule_csv, BracketRow, DisplayGrid,
    ScheduleRow,
};
pub use grouping::{add_sample_teams, balance_groups, balance_plan_groups, sample_teams, GROUP_NAMES};
pub use priority::{
    category_tier, sort_by_tier, tier, GRAND_FINAL, KNOCKOUT, LOSERS_FINAL, PLACEMENT,
    PRELIMINARY,
};
pub use scheduler::{schedule, schedule_plan};
