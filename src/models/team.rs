//! Team roster entries.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team (used for roster edits).
pub type TeamId = Uuid;

/// Group label for teams that were entered but not placed in any group (matched case-insensitively).
pub const UNASSIGNED: &str = "Unassigned";

/// A registered team. `level` is a group label ("Group A"), the [`UNASSIGNED`] sentinel, or absent.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(default = "Uuid::new_v4")]
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub level: Option<String>,
}

impl Team {
    pub fn new(name: impl Into<String>, level: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            level,
        }
    }

    /// Shorthand for a team placed in `group`.
    pub fn in_group(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self::new(name, Some(group.into()))
    }

    /// The group this team plays round robin in, if any.
    pub fn group(&self) -> Option<&str> {
        match self.level.as_deref().map(str::trim) {
            Some(level) if !level.is_empty() && !level.eq_ignore_ascii_case(UNASSIGNED) => {
                Some(level)
            }
            _ => None,
        }
    }
}
