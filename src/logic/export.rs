//! Spreadsheet-friendly views of a schedule: match list, display grid, bracket score sheets.
//!
//! These read a `ScheduleOutput` and never renumber or reorder it; `match_no` is the key.

use crate::models::{BracketSide, ScheduleOutput, ScheduledMatch};
use serde::Serialize;
use std::error::Error;

/// Text grid: one row per slot, one column per court.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DisplayGrid {
    /// `HH:MM` of every slot.
    pub time_labels: Vec<String>,
    /// "Court 1".."Court N".
    pub court_labels: Vec<String>,
    pub cells: Vec<Vec<String>>,
}

/// Row of the flat match list.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ScheduleRow {
    pub match_no: u32,
    pub time: String,
    pub court: usize,
    pub level: String,
    pub team_a: String,
    pub team_b: String,
    pub desc: String,
}

impl From<&ScheduledMatch> for ScheduleRow {
    fn from(m: &ScheduledMatch) -> Self {
        Self {
            match_no: m.match_no,
            time: m.start_time.clone(),
            court: m.court_index + 1,
            level: m.game.level.clone(),
            team_a: m.game.team_a.to_string(),
            team_b: m.game.team_b.to_string(),
            desc: m.game.desc.clone(),
        }
    }
}

/// Row of a bracket score sheet; scores are left blank for filling in by hand.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BracketRow {
    #[serde(rename = "Match No.")]
    pub match_no: u32,
    #[serde(rename = "Stage")]
    pub stage: String,
    #[serde(rename = "Team A")]
    pub team_a: String,
    #[serde(rename = "Score A")]
    pub score_a: String,
    #[serde(rename = "Score B")]
    pub score_b: String,
    #[serde(rename = "Team B")]
    pub team_b: String,
}

fn cell_text(m: &ScheduledMatch, row: usize) -> String {
    if row == m.start_row {
        format!(
            "No.{}\n{}\nvs\n{}\n({})",
            m.match_no, m.game.team_a, m.game.team_b, m.game.level
        )
    } else {
        format!("No.{} ...", m.match_no)
    }
}

pub fn display_grid(output: &ScheduleOutput) -> DisplayGrid {
    let config = &output.config;
    let time_labels = (0..output.grid.num_rows())
        .map(|row| config.slot_label(row))
        .collect();
    let court_labels = (0..config.num_courts)
        .map(|c| format!("Court {}", c + 1))
        .collect();
    let cells = output
        .grid
        .rows()
        .iter()
        .enumerate()
        .map(|(row, cells_row)| {
            cells_row
                .iter()
                .map(|cell| {
                    cell.and_then(|no| output.by_number(no))
                        .map(|m| cell_text(m, row))
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();
    DisplayGrid {
        time_labels,
        court_labels,
        cells,
    }
}

/// Scheduled knockout matches of one side, ordered by match number.
pub fn bracket_sheet(output: &ScheduleOutput, side: BracketSide) -> Vec<BracketRow> {
    output
        .scheduled
        .iter()
        .filter(|m| m.game.category.side() == Some(side))
        .map(|m| BracketRow {
            match_no: m.match_no,
            stage: m.game.desc.clone(),
            team_a: m.game.team_a.to_string(),
            score_a: String::new(),
            score_b: String::new(),
            team_b: m.game.team_b.to_string(),
        })
        .collect()
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String, Box<dyn Error>> {
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Match list as CSV: `match_no,time,court,level,team_a,team_b,desc`.
pub fn schedule_csv(output: &ScheduleOutput) -> Result<String, Box<dyn Error>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    if output.scheduled.is_empty() {
        wtr.write_record(["match_no", "time", "court", "level", "team_a", "team_b", "desc"])?;
    }
    for m in &output.scheduled {
        wtr.serialize(ScheduleRow::from(m))?;
    }
    finish(wtr)
}

/// Display grid as CSV: a time column followed by one column per court.
pub fn grid_csv(output: &ScheduleOutput) -> Result<String, Box<dyn Error>> {
    let grid = display_grid(output);
    let mut wtr = csv::Writer::from_writer(Vec::new());
    let mut header = vec!["Time".to_string()];
    header.extend(grid.court_labels.iter().cloned());
    wtr.write_record(&header)?;
    for (time, cells_row) in grid.time_labels.iter().zip(&grid.cells) {
        let mut record = vec![time.clone()];
        record.extend(cells_row.iter().cloned());
        wtr.write_record(&record)?;
    }
    finish(wtr)
}

/// Bracket score sheet of one side as CSV.
pub fn bracket_csv(output: &ScheduleOutput, side: BracketSide) -> Result<String, Box<dyn Error>> {
    let rows = bracket_sheet(output, side);
    let mut wtr = csv::Writer::from_writer(Vec::new());
    if rows.is_empty() {
        wtr.write_record(["Match No.", "Stage", "Team A", "Score A", "Score B", "Team B"])?;
    }
    for row in &rows {
        wtr.serialize(row)?;
    }
    finish(wtr)
}
