// JSON encoding of the whole task list

use crate::models::Task;
use eyre::{Context, Result};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Encode the task list as a JSON array
pub fn encode(tasks: &[Task]) -> Result<String> {
    serde_json::to_string(tasks).context("Failed to serialize task list")
}

/// Decode a stored task list.
///
/// Never fails: an unparsable value yields an empty list, and individual
/// records that are malformed, blank, or reuse an earlier id are skipped.
pub fn decode(raw: &str) -> Vec<Task> {
    let values: Vec<Value> = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = ?e, "Stored task list is not a JSON array, starting empty");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut tasks = Vec::with_capacity(values.len());

    for (index, value) in values.into_iter().enumerate() {
        let task: Task = match serde_json::from_value(value) {
            Ok(t) => t,
            Err(e) => {
                warn!(index, error = ?e, "Failed to parse task record, skipping");
                continue;
            }
        };

        if task.text.trim().is_empty() {
            warn!(index, id = task.id, "Task record has blank text, skipping");
            continue;
        }

        if !seen.insert(task.id) {
            warn!(index, id = task.id, "Duplicate task id, skipping");
            continue;
        }

        tasks.push(task);
    }

    debug!(count = tasks.len(), "Decoded task list");
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_matches_stored_shape() {
        let json = encode(&[Task::new(1, "Estudar")]).unwrap();
        assert_eq!(json, r#"[{"id":1,"text":"Estudar","completed":false}]"#);
    }

    #[test]
    fn test_round_trip_preserves_everything() {
        let mut done = Task::new(20, "second <b>bold</b>");
        done.completed = true;
        let tasks = vec![Task::new(10, "first"), done, Task::new(30, "third \"quoted\"")];

        let decoded = decode(&encode(&tasks).unwrap());
        assert_eq!(decoded, tasks);
    }

    #[test]
    fn test_decode_ignores_field_order() {
        let tasks = decode(r#"[{"completed":true,"text":"x","id":5}]"#);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, 5);
        assert!(tasks[0].completed);
    }

    #[test]
    fn test_decode_garbage_is_empty() {
        assert!(decode("{not json").is_empty());
        assert!(decode("null").is_empty());
        assert!(decode(r#"{"id":1}"#).is_empty());
    }

    #[test]
    fn test_decode_skips_malformed_records() {
        let raw = r#"[
            {"id":1,"text":"Valid","completed":false},
            {"id":"two","text":"bad id","completed":false},
            {"id":3,"text":"   ","completed":false},
            {"id":4,"text":"Also valid","completed":true}
        ]"#;

        let tasks = decode(raw);
        let ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn test_decode_drops_duplicate_ids() {
        let raw = r#"[
            {"id":1,"text":"kept","completed":false},
            {"id":1,"text":"dropped","completed":true}
        ]"#;

        let tasks = decode(raw);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "kept");
    }
}
