// Thread-safe handle around a TaskStore

use crate::error::ValidationError;
use crate::filter::FilterMode;
use crate::models::{Counts, Priority, Task, TaskId};
use crate::store::TaskStore;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

/// Cloneable handle that serializes every operation on one store
///
/// Each call holds the lock for its whole duration, so no two mutations
/// interleave and `counts()` always observes a consistent collection.
#[derive(Debug, Clone, Default)]
pub struct SharedTaskStore {
    inner: Arc<Mutex<TaskStore>>,
}

impl SharedTaskStore {
    pub fn new(store: TaskStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TaskStore> {
        // Every store operation completes or leaves the store untouched,
        // so a panic elsewhere cannot leave it half-updated.
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("Task store lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    pub fn add_task(
        &self,
        text: &str,
        due_date: Option<&str>,
        priority: Option<Priority>,
    ) -> Result<Task, ValidationError> {
        self.lock().add_task(text, due_date, priority)
    }

    pub fn add_from_form(&self, text: &str, due_date: &str, priority: &str) -> Result<Task, ValidationError> {
        self.lock().add_from_form(text, due_date, priority)
    }

    pub fn toggle_completed(&self, id: TaskId) -> bool {
        self.lock().toggle_completed(id)
    }

    pub fn toggle_important(&self, id: TaskId) -> bool {
        self.lock().toggle_important(id)
    }

    pub fn delete_task(&self, id: TaskId) -> bool {
        self.lock().delete_task(id)
    }

    pub fn set_filter(&self, mode: FilterMode) {
        self.lock().set_filter(mode)
    }

    pub fn filter(&self) -> FilterMode {
        self.lock().filter()
    }

    /// Owned snapshot of the current view
    pub fn list_tasks(&self) -> Vec<Task> {
        self.lock().list_tasks().into_iter().cloned().collect()
    }

    pub fn counts(&self) -> Counts {
        self.lock().counts()
    }

    /// Run a closure with exclusive access to the store
    pub fn with<R>(&self, f: impl FnOnce(&mut TaskStore) -> R) -> R {
        f(&mut self.lock())
    }
}
