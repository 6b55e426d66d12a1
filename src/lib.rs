// Tasklist - In-memory task list with filtering and running counts

pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod shared;
pub mod shell;
pub mod store;

// Re-export main types for convenience
pub use config::Config;
pub use error::ValidationError;
pub use filter::FilterMode;
pub use models::{Counts, Priority, Task, TaskId};
pub use shared::SharedTaskStore;
pub use shell::{Command, Outcome, Session, ShellError};
pub use store::TaskStore;
