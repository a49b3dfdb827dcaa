// Task list state with write-through persistence

use crate::codec;
use crate::error::ValidationError;
use crate::filter::Filter;
use crate::models::{IdGenerator, Task};
use crate::slot::{Slot, validate_key};
use eyre::{Context, Result, eyre};
use tracing::{debug, info};

/// Default slot key holding the task list
pub const DEFAULT_KEY: &str = "tasks";

/// Owns the task list and the current filter.
///
/// Every mutation rewrites the whole list to the slot before returning.
pub struct TaskStore<S: Slot> {
    slot: S,
    key: String,
    tasks: Vec<Task>,
    filter: Filter,
    ids: IdGenerator,
}

impl<S: Slot> TaskStore<S> {
    /// Load the task list stored under `key`.
    ///
    /// A missing or undecodable value yields an empty list.
    pub fn open(slot: S, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        validate_key(&key)?;

        let tasks = match slot.get(&key).context("Failed to read task list")? {
            Some(raw) => codec::decode(&raw),
            None => Vec::new(),
        };

        info!(key = %key, count = tasks.len(), "Loaded task list");

        let ids = IdGenerator::seeded(&tasks);
        Ok(Self {
            slot,
            key,
            tasks,
            filter: Filter::All,
            ids,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Append a new task built from `text`
    pub fn add(&mut self, text: &str) -> Result<Task> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText.into());
        }

        let id = self
            .ids
            .next_id()
            .ok_or_else(|| eyre!("Task id space exhausted (largest id is {})", i64::MAX))?;
        let task = Task::new(id, text);

        let mut next = self.tasks.clone();
        next.push(task.clone());
        self.commit(next)?;

        debug!(id = task.id, "Added task");
        Ok(task)
    }

    /// Remove the task with `id`. Returns whether one was removed.
    pub fn delete(&mut self, id: i64) -> Result<bool> {
        let next: Vec<Task> = self.tasks.iter().filter(|t| t.id != id).cloned().collect();
        let removed = next.len() < self.tasks.len();
        self.commit(next)?;

        debug!(id, removed, "Deleted task");
        Ok(removed)
    }

    /// Flip the completion flag of the task with `id`, if it exists
    pub fn toggle(&mut self, id: i64) -> Result<Option<&Task>> {
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            debug!(id, "Toggle of unknown task ignored");
            return Ok(None);
        };

        let mut next = self.tasks.clone();
        next[index].completed = !next[index].completed;
        self.commit(next)?;

        let task = &self.tasks[index];
        debug!(id, completed = task.completed, "Toggled task");
        Ok(Some(task))
    }

    /// Remove every completed task in one pass. Returns how many were removed.
    pub fn clear_completed(&mut self) -> Result<usize> {
        let next: Vec<Task> = self.tasks.iter().filter(|t| !t.completed).cloned().collect();
        let removed = self.tasks.len() - next.len();
        self.commit(next)?;

        debug!(removed, "Cleared completed tasks");
        Ok(removed)
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// Tasks visible under the current filter, in list order
    pub fn filtered_view(&self) -> Vec<&Task> {
        self.filter.apply(&self.tasks)
    }

    /// Incomplete tasks, regardless of the current filter
    pub fn active_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    /// Persist `next` and make it the current list; on a failed write the
    /// current list is left untouched.
    fn commit(&mut self, next: Vec<Task>) -> Result<()> {
        let encoded = codec::encode(&next)?;
        self.slot
            .set(&self.key, &encoded)
            .context("Failed to persist task list")?;
        self.tasks = next;
        Ok(())
    }
}
