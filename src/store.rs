// In-memory task store: the only mutation and query surface for tasks

use crate::error::ValidationError;
use crate::filter::FilterMode;
use crate::models::{Counts, Priority, Task, TaskId};
use tracing::{debug, info};

/// Ordered task collection plus the current view filter
///
/// Tasks keep insertion order. Nothing is persisted; the store lives for one
/// session.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    filter: FilterMode,
}

impl TaskStore {
    /// Create an empty store with the `All` filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store starting on the given filter
    pub fn with_filter(filter: FilterMode) -> Self {
        Self {
            tasks: Vec::new(),
            filter,
        }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Append a new task
    ///
    /// The text is trimmed and must not be empty. An empty due date is stored
    /// as unset; any other due date is kept verbatim. Priority defaults to
    /// `Medium`.
    pub fn add_task(
        &mut self,
        text: &str,
        due_date: Option<&str>,
        priority: Option<Priority>,
    ) -> Result<Task, ValidationError> {
        let text = Self::validate_text(text)?;
        let due_date = due_date.filter(|d| !d.is_empty()).map(str::to_string);
        let task = Task::new(text.to_string(), due_date, priority.unwrap_or_default());

        info!(id = %task.id, priority = %task.priority, due = ?task.due_date, "add_task: appended");
        self.tasks.push(task.clone());

        Ok(task)
    }

    /// Append a task from raw form fields
    ///
    /// Coerces the priority string before touching the collection, so an
    /// unknown priority leaves the store unchanged.
    pub fn add_from_form(&mut self, text: &str, due_date: &str, priority: &str) -> Result<Task, ValidationError> {
        Self::validate_text(text)?;
        let priority = Priority::parse_or_default(priority)?;
        self.add_task(text, Some(due_date), Some(priority))
    }

    /// Flip `completed` on the matching task
    ///
    /// Returns false (and changes nothing) if no task has this id.
    pub fn toggle_completed(&mut self, id: TaskId) -> bool {
        match self.find_mut(id) {
            Some(task) => {
                task.completed = !task.completed;
                debug!(%id, completed = task.completed, "toggle_completed");
                true
            }
            None => {
                debug!(%id, "toggle_completed: unknown id, ignoring");
                false
            }
        }
    }

    /// Flip `important` on the matching task
    ///
    /// Returns false (and changes nothing) if no task has this id.
    pub fn toggle_important(&mut self, id: TaskId) -> bool {
        match self.find_mut(id) {
            Some(task) => {
                task.important = !task.important;
                debug!(%id, important = task.important, "toggle_important");
                true
            }
            None => {
                debug!(%id, "toggle_important: unknown id, ignoring");
                false
            }
        }
    }

    /// Remove the matching task, keeping the order of the rest
    ///
    /// Returns false if no task has this id.
    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() != before;

        if removed {
            info!(%id, "delete_task: removed");
        } else {
            debug!(%id, "delete_task: unknown id, ignoring");
        }
        removed
    }

    /// Replace the view filter; the collection is untouched
    pub fn set_filter(&mut self, mode: FilterMode) {
        debug!(from = %self.filter, to = %mode, "set_filter");
        self.filter = mode;
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    /// Tasks visible under the current filter, in insertion order
    pub fn list_tasks(&self) -> Vec<&Task> {
        self.list_with(self.filter)
    }

    /// Tasks visible under `mode`, without changing the current filter
    pub fn list_with(&self, mode: FilterMode) -> Vec<&Task> {
        self.tasks.iter().filter(|t| mode.matches(t)).collect()
    }

    /// Totals over the whole collection
    pub fn counts(&self) -> Counts {
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        Counts {
            total: self.tasks.len(),
            active: self.tasks.len() - completed,
            completed,
        }
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Full collection in insertion order, ignoring the filter
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    fn find_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    fn validate_text(text: &str) -> Result<&str, ValidationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyText);
        }
        Ok(trimmed)
    }
}
