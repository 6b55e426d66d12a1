// View filtering by completion status

use crate::error::ValidationError;
use crate::models::Task;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which tasks a view shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Active,
    Completed,
}

impl FilterMode {
    pub const ALL_MODES: [FilterMode; 3] = [FilterMode::All, FilterMode::Active, FilterMode::Completed];

    /// Whether a task belongs in a view under this mode
    pub fn matches(self, task: &Task) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Active => !task.completed,
            FilterMode::Completed => task.completed,
        }
    }
}

impl FromStr for FilterMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(FilterMode::All),
            "active" => Ok(FilterMode::Active),
            "completed" => Ok(FilterMode::Completed),
            _ => Err(ValidationError::UnknownFilter(s.to_string())),
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterMode::All => write!(f, "All"),
            FilterMode::Active => write!(f, "Active"),
            FilterMode::Completed => write!(f, "Completed"),
        }
    }
}
