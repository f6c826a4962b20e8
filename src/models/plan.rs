//! TournamentPlan: roster, match catalog, settings, and the last schedule.

use crate::models::game::{GameMatch, MatchRecord};
use crate::models::schedule::{OperatingWindow, ScheduleConfig, ScheduleOutput};
use crate::models::team::{Team, TeamId};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during plan operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PlanError {
    /// Team name is empty after trimming.
    EmptyTeamName,
    /// A team with this name already exists (names are unique, case-insensitive).
    DuplicateTeamName,
    TeamNotFound(TeamId),
    /// Round robin needs at least one group with two teams.
    NoGroupedTeams,
    /// Knockout stage needs two different groups.
    SameKnockoutGroups,
    /// Group count for balancing must be 2..=8.
    InvalidGroupCount(usize),
    /// Nothing to schedule.
    NoMatches,
    InvalidSettings(String),
}

impl std::fmt::Display for PlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanError::EmptyTeamName => write!(f, "Team name must not be empty"),
            PlanError::DuplicateTeamName => write!(f, "A team with this name already exists"),
            PlanError::TeamNotFound(_) => write!(f, "Team not found"),
            PlanError::NoGroupedTeams => {
                write!(f, "Assign teams to groups first (a group needs at least 2 teams)")
            }
            PlanError::SameKnockoutGroups => write!(f, "Knockout stage needs two different groups"),
            PlanError::InvalidGroupCount(n) => {
                write!(f, "Can split into 2 to 8 groups (requested {})", n)
            }
            PlanError::NoMatches => write!(f, "No matches to schedule"),
            PlanError::InvalidSettings(msg) => write!(f, "Invalid settings: {}", msg),
        }
    }
}

impl std::error::Error for PlanError {}

/// Unique identifier for a plan.
pub type PlanId = Uuid;

fn default_open() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default()
}

fn default_close() -> NaiveTime {
    NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default()
}

fn default_buffer_minutes() -> u32 {
    60
}

fn default_num_courts() -> usize {
    10
}

fn default_slot_minutes() -> u32 {
    15
}

fn default_points_per_matchup() -> usize {
    5
}

/// Venue and match-length settings.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlanSettings {
    #[serde(default = "default_open")]
    pub open: NaiveTime,
    #[serde(default = "default_close")]
    pub close: NaiveTime,
    /// Setup/teardown time removed at both ends of the window.
    #[serde(default = "default_buffer_minutes")]
    pub buffer_minutes: u32,
    #[serde(default = "default_num_courts")]
    pub num_courts: usize,
    /// Minutes per point (one slot).
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,
    /// Points (slots) per matchup.
    #[serde(default = "default_points_per_matchup")]
    pub points_per_matchup: usize,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            open: default_open(),
            close: default_close(),
            buffer_minutes: default_buffer_minutes(),
            num_courts: default_num_courts(),
            slot_minutes: default_slot_minutes(),
            points_per_matchup: default_points_per_matchup(),
        }
    }
}

impl PlanSettings {
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.num_courts == 0 {
            return Err(PlanError::InvalidSettings("need at least one court".into()));
        }
        if self.slot_minutes == 0 {
            return Err(PlanError::InvalidSettings("minutes per point must be positive".into()));
        }
        if self.points_per_matchup == 0 {
            return Err(PlanError::InvalidSettings("points per matchup must be positive".into()));
        }
        Ok(())
    }

    pub fn window(&self) -> OperatingWindow {
        OperatingWindow::new(self.open, self.close, self.buffer_minutes)
    }

    /// Length of one matchup in minutes.
    pub fn matchup_minutes(&self) -> u64 {
        let points = u64::try_from(self.points_per_matchup).unwrap_or(u64::MAX);
        u64::from(self.slot_minutes).saturating_mul(points)
    }

    pub fn to_config(&self) -> ScheduleConfig {
        let window = self.window();
        ScheduleConfig {
            num_courts: self.num_courts,
            slot_minutes: self.slot_minutes,
            points_per_matchup: self.points_per_matchup,
            total_slots: window.total_slots(self.slot_minutes),
            window_start: window.play_start(),
        }
    }
}

/// Exportable plan configuration: roster plus the flat match catalog.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlanSnapshot {
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
}

/// Full planning state for one tournament.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentPlan {
    pub id: PlanId,
    pub teams: Vec<Team>,
    /// Match catalog, kept stably sorted by tier.
    pub matches: Vec<GameMatch>,
    pub settings: PlanSettings,
    /// Last scheduling result; cleared whenever the catalog or settings change.
    pub schedule: Option<ScheduleOutput>,
}

impl TournamentPlan {
    pub fn new(settings: PlanSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            teams: Vec::new(),
            matches: Vec::new(),
            settings,
            schedule: None,
        }
    }

    pub fn with_teams(teams: Vec<Team>, settings: PlanSettings) -> Self {
        Self {
            teams,
            ..Self::new(settings)
        }
    }

    /// Add a team. Names are trimmed and must be unique (case-insensitive).
    pub fn add_team(
        &mut self,
        name: impl Into<String>,
        level: Option<String>,
    ) -> Result<TeamId, PlanError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(PlanError::EmptyTeamName);
        }
        if self.teams.iter().any(|t| t.name.eq_ignore_ascii_case(name)) {
            return Err(PlanError::DuplicateTeamName);
        }
        let level = level.map(|l| l.trim().to_string()).filter(|l| !l.is_empty());
        let team = Team::new(name, level);
        let id = team.id;
        self.teams.push(team);
        Ok(id)
    }

    pub fn remove_team(&mut self, team_id: TeamId) -> Result<(), PlanError> {
        let idx = self
            .teams
            .iter()
            .position(|t| t.id == team_id)
            .ok_or(PlanError::TeamNotFound(team_id))?;
        self.teams.remove(idx);
        Ok(())
    }

    pub fn clear_teams(&mut self) {
        self.teams.clear();
    }

    pub fn clear_matches(&mut self) {
        self.matches.clear();
        self.schedule = None;
    }

    pub fn set_settings(&mut self, settings: PlanSettings) -> Result<(), PlanError> {
        settings.validate()?;
        self.settings = settings;
        self.schedule = None;
        Ok(())
    }

    /// Group labels present in the roster, sorted.
    pub fn groups(&self) -> Vec<String> {
        let mut groups: Vec<String> = self
            .teams
            .iter()
            .filter_map(|t| t.group().map(str::to_string))
            .collect();
        groups.sort();
        groups.dedup();
        groups
    }

    pub fn snapshot(&self) -> PlanSnapshot {
        PlanSnapshot {
            teams: self.teams.clone(),
            matches: self.matches.iter().map(GameMatch::to_record).collect(),
        }
    }

    /// Replace roster and catalog from a snapshot. Settings are kept; any schedule is dropped.
    ///
    /// Team names follow the same rules as [`TournamentPlan::add_team`]; on error the plan
    /// is left untouched.
    pub fn restore(&mut self, snapshot: PlanSnapshot) -> Result<(), PlanError> {
        let PlanSnapshot { teams, matches } = snapshot;
        let mut roster: Vec<Team> = Vec::with_capacity(teams.len());
        for mut team in teams {
            let name = team.name.trim();
            if name.is_empty() {
                return Err(PlanError::EmptyTeamName);
            }
            if roster.iter().any(|t| t.name.eq_ignore_ascii_case(name)) {
                return Err(PlanError::DuplicateTeamName);
            }
            team.name = name.to_string();
            roster.push(team);
        }
        self.matches = matches
            .iter()
            .map(|r| GameMatch::from_record(r, &roster))
            .collect();
        self.teams = roster;
        self.schedule = None;
        Ok(())
    }
}
