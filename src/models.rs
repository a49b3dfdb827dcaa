// Data models for the task list

use serde::{Deserialize, Serialize};

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub text: String,
    pub completed: bool,
}

impl Task {
    /// Create an incomplete task. `text` is expected to be trimmed already.
    pub fn new(id: i64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }
}

/// Hands out task ids derived from the wall clock.
///
/// Ids are strictly increasing: when two tasks are created within the same
/// millisecond, the second gets `last + 1` instead of a duplicate timestamp.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    /// Seed the generator so it never reissues any of `existing`
    pub fn seeded<'a>(existing: impl IntoIterator<Item = &'a Task>) -> Self {
        let last = existing.into_iter().map(|t| t.id).max().unwrap_or(0);
        Self { last }
    }

    /// Next id, or `None` once the id space above the last id is used up
    pub fn next_id(&mut self) -> Option<i64> {
        self.next_id_at(now_ms())
    }

    fn next_id_at(&mut self, now: i64) -> Option<i64> {
        let id = if now > self.last { now } else { self.last.checked_add(1)? };
        self.last = id;
        Some(id)
    }
}

/// Current timestamp in milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
