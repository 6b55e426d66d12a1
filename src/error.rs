// Validation errors raised at the store boundary

use thiserror::Error;

/// Rejected input; the store is never mutated when one of these is returned
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a task.")]
    EmptyText,

    #[error("Unknown priority: {0:?} (expected high, medium or low)")]
    UnknownPriority(String),

    #[error("Unknown filter: {0:?} (expected all, active or completed)")]
    UnknownFilter(String),
}
