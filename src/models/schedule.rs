//! Scheduling inputs and outputs: window, config, slot grid, scheduled matches.

use crate::models::game::{GameMatch, Tier};
use chrono::{Duration, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

const MINUTES_PER_DAY: u64 = 24 * 60;

/// Sequence number of a scheduled match; the stable cross-reference key for exports.
pub type MatchNo = u32;

/// Venue rental window. Setup/teardown buffers are removed from both ends before play.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct OperatingWindow {
    pub open: NaiveTime,
    pub close: NaiveTime,
    pub buffer_minutes: u32,
}

impl OperatingWindow {
    pub fn new(open: NaiveTime, close: NaiveTime, buffer_minutes: u32) -> Self {
        Self {
            open,
            close,
            buffer_minutes,
        }
    }

    /// First playable minute (open + buffer).
    pub fn play_start(&self) -> NaiveTime {
        self.open
            .overflowing_add_signed(Duration::minutes(i64::from(self.buffer_minutes)))
            .0
    }

    /// Minutes available for play after removing both buffers. Never negative.
    pub fn play_minutes(&self) -> i64 {
        let open = i64::from(self.open.num_seconds_from_midnight() / 60);
        let close = i64::from(self.close.num_seconds_from_midnight() / 60);
        let buffer = i64::from(self.buffer_minutes);
        ((close - buffer) - (open + buffer)).max(0)
    }

    /// `floor(play_minutes / slot_minutes)`; zero for a zero slot length.
    pub fn total_slots(&self, slot_minutes: u32) -> usize {
        if slot_minutes == 0 {
            return 0;
        }
        (self.play_minutes() / i64::from(slot_minutes)) as usize
    }
}

/// Resources for one scheduling run.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub num_courts: usize,
    pub slot_minutes: u32,
    /// Match length in slots.
    pub points_per_matchup: usize,
    pub total_slots: usize,
    pub window_start: NaiveTime,
}

impl ScheduleConfig {
    pub fn duration(&self) -> usize {
        self.points_per_matchup
    }

    /// True when no match can be placed at all: no rows, no courts, or matches longer than the day.
    pub fn is_degenerate(&self) -> bool {
        self.total_slots == 0
            || self.num_courts == 0
            || self.points_per_matchup == 0
            || self.points_per_matchup > self.total_slots
    }

    /// Wall-clock start of `row`, wrapping past midnight.
    pub fn slot_time(&self, row: usize) -> NaiveTime {
        let minutes =
            (row as u64 % MINUTES_PER_DAY) * u64::from(self.slot_minutes) % MINUTES_PER_DAY;
        self.window_start
            .overflowing_add_signed(Duration::minutes(minutes as i64))
            .0
    }

    /// `HH:MM` label of `row`.
    pub fn slot_label(&self, row: usize) -> String {
        self.slot_time(row).format("%H:%M").to_string()
    }
}

/// Everything the engine needs. Owned by the caller; the engine keeps nothing between runs.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SchedulingInput {
    pub matches: Vec<GameMatch>,
    pub config: ScheduleConfig,
}

/// `rows` time slots by `num_courts` columns; each occupied cell holds the number of the
/// match playing there.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotGrid {
    cells: Vec<Vec<Option<MatchNo>>>,
}

impl SlotGrid {
    pub fn new(rows: usize, num_courts: usize) -> Self {
        Self {
            cells: vec![vec![None; num_courts]; rows],
        }
    }

    pub(crate) fn from_cells(cells: Vec<Vec<Option<MatchNo>>>) -> Self {
        Self { cells }
    }

    pub fn num_rows(&self) -> usize {
        self.cells.len()
    }

    pub fn num_courts(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn get(&self, row: usize, court: usize) -> Option<MatchNo> {
        self.cells.get(row).and_then(|r| r.get(court)).copied().flatten()
    }

    pub fn rows(&self) -> &[Vec<Option<MatchNo>>] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_none)
    }
}

/// A match placed on the grid.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScheduledMatch {
    pub match_no: MatchNo,
    pub start_row: usize,
    /// Exclusive.
    pub end_row: usize,
    pub court_index: usize,
    /// `HH:MM`.
    pub start_time: String,
    pub tier: Tier,
    #[serde(flatten)]
    pub game: GameMatch,
}

impl ScheduledMatch {
    /// Row ranges `[start_row, end_row)` intersect.
    pub fn overlaps(&self, other: &ScheduledMatch) -> bool {
        self.start_row < other.end_row && other.start_row < self.end_row
    }
}

/// Result of one scheduling run.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub config: ScheduleConfig,
    pub grid: SlotGrid,
    /// Ascending by `match_no`.
    pub scheduled: Vec<ScheduledMatch>,
    /// Input order.
    pub unscheduled: Vec<GameMatch>,
}

impl ScheduleOutput {
    pub fn is_complete(&self) -> bool {
        self.unscheduled.is_empty()
    }

    pub fn by_number(&self, match_no: MatchNo) -> Option<&ScheduledMatch> {
        self.scheduled.iter().find(|m| m.match_no == match_no)
    }
}
