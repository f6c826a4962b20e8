//! Match (game), participants, and match categories.

use crate::models::team::Team;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One side of a match: a registered team, or a stand-in for a team not known yet
/// ("Group A champion", "Semifinal winner 1").
///
/// Both variants are keyed by their label when tracking who is busy; the tag only records
/// whether the label names a real team.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "label", rename_all = "snake_case")]
pub enum Participant {
    Resolved(String),
    Placeholder(String),
}

impl Participant {
    pub fn team(name: impl Into<String>) -> Self {
        Participant::Resolved(name.into())
    }

    pub fn placeholder(label: impl Into<String>) -> Self {
        Participant::Placeholder(label.into())
    }

    /// Key used for availability tracking.
    pub fn identity(&self) -> &str {
        match self {
            Participant::Resolved(name) => name,
            Participant::Placeholder(label) => label,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Participant::Placeholder(_))
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identity())
    }
}

/// Integer priority class of a match: lower tiers are played earlier.
pub type Tier = u8;

/// Which score sheet a knockout match belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketSide {
    Winners,
    Losers,
}

/// Phase of the tournament this match belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCategory {
    /// Group stage, every pair within a group.
    RoundRobin,
    /// Cross-group semifinals of the main bracket.
    WinnersSemiFinal,
    /// Crossover matches among 3rd/4th placed teams.
    LosersSemiFinal,
    LosersFinal,
    ThirdPlace,
    GrandFinal,
    /// Anything else supplied from outside (treated like an ordinary knockout match).
    Other,
}

impl MatchCategory {
    /// Human-readable stage label, used as the `type` column of exported records.
    pub fn label(self) -> &'static str {
        match self {
            MatchCategory::RoundRobin => "Preliminary",
            MatchCategory::WinnersSemiFinal => "Knockout - Winners",
            MatchCategory::LosersSemiFinal => "Knockout - Losers",
            MatchCategory::LosersFinal => "Final - Losers",
            MatchCategory::ThirdPlace | MatchCategory::GrandFinal => "Final - Winners",
            MatchCategory::Other => "Knockout",
        }
    }

    /// Classify a free-text record by its type and description labels.
    ///
    /// Precedence: preliminary type, then grand final, third place and losers final
    /// descriptions, then losers/winners type. Never fails; unknown text is [`MatchCategory::Other`].
    pub fn infer(kind: &str, desc: &str) -> Self {
        let kind = kind.to_lowercase();
        let desc = desc.to_lowercase();
        if kind.contains("preliminary") {
            MatchCategory::RoundRobin
        } else if desc.contains("grand final") {
            MatchCategory::GrandFinal
        } else if desc.contains("3rd place") || desc.contains("third place") {
            MatchCategory::ThirdPlace
        } else if desc.contains("losers final") || desc.contains("losers bracket final") {
            MatchCategory::LosersFinal
        } else if kind.contains("losers") {
            MatchCategory::LosersSemiFinal
        } else if kind.contains("winners") {
            MatchCategory::WinnersSemiFinal
        } else {
            MatchCategory::Other
        }
    }

    pub fn side(self) -> Option<BracketSide> {
        match self {
            MatchCategory::WinnersSemiFinal
            | MatchCategory::ThirdPlace
            | MatchCategory::GrandFinal => Some(BracketSide::Winners),
            MatchCategory::LosersSemiFinal | MatchCategory::LosersFinal => Some(BracketSide::Losers),
            MatchCategory::RoundRobin | MatchCategory::Other => None,
        }
    }
}

/// A single abstract match. Immutable once generated; scheduling only adds annotations
/// around it (see `ScheduledMatch`).
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub category: MatchCategory,
    pub level: String,
    pub team_a: Participant,
    pub team_b: Participant,
    pub desc: String,
}

impl GameMatch {
    pub fn new(
        category: MatchCategory,
        level: impl Into<String>,
        team_a: Participant,
        team_b: Participant,
        desc: impl Into<String>,
    ) -> Self {
        Self {
            category,
            level: level.into(),
            team_a,
            team_b,
            desc: desc.into(),
        }
    }

    /// Both participants' availability keys.
    pub fn identities(&self) -> [&str; 2] {
        [self.team_a.identity(), self.team_b.identity()]
    }

    pub fn to_record(&self) -> MatchRecord {
        MatchRecord {
            kind: self.category.label().to_string(),
            level: self.level.clone(),
            team_a: self.team_a.identity().to_string(),
            team_b: self.team_b.identity().to_string(),
            desc: self.desc.clone(),
        }
    }

    /// Rebuild a match from a flat record. Team names found in `roster` become
    /// [`Participant::Resolved`], everything else a placeholder.
    pub fn from_record(record: &MatchRecord, roster: &[Team]) -> Self {
        let participant = |name: &str| {
            if roster.iter().any(|t| t.name == name) {
                Participant::team(name)
            } else {
                Participant::placeholder(name)
            }
        };
        Self {
            category: MatchCategory::infer(&record.kind, &record.desc),
            level: record.level.clone(),
            team_a: participant(&record.team_a),
            team_b: participant(&record.team_b),
            desc: record.desc.clone(),
        }
    }
}

/// Flat, string-only match record used for import/export.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub team_a: String,
    #[serde(default)]
    pub team_b: String,
    #[serde(default)]
    pub desc: String,
}
