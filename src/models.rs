// Data models for the task list

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique task identifier
///
/// Backed by a UUIDv7, which is time-ordered and carries a per-process
/// counter, so ids minted within the same millisecond still differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task priority; descriptive only, no scheduling effect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Parse raw form input; empty input selects the default
    pub fn parse_or_default(s: &str) -> Result<Self, ValidationError> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        s.parse()
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "h" | "高" => Ok(Priority::High),
            "medium" | "m" | "中" => Ok(Priority::Medium),
            "low" | "l" | "低" => Ok(Priority::Low),
            _ => Err(ValidationError::UnknownPriority(s.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    pub important: bool,
    /// Stored verbatim; `None` means unset
    pub due_date: Option<String>,
    pub priority: Priority,
}

impl Task {
    pub(crate) fn new(text: String, due_date: Option<String>, priority: Priority) -> Self {
        Self {
            id: TaskId::new(),
            text,
            completed: false,
            important: false,
            due_date,
            priority,
        }
    }
}

/// Running totals over the whole collection, independent of the filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}
