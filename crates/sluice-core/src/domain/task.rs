use serde::{Deserialize, Serialize};

use super::TaskId;

/// One unit of work: an id plus an opaque payload.
///
/// A `Task` is immutable once built. It is moved into the work queue and
/// from there into exactly one worker, so nothing ever shares it mutably.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    payload: String,
}

impl Task {
    pub fn new(id: u64, payload: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(id),
            payload: payload.into(),
        }
    }

    /// Build `count` tasks with monotonically issued ids `1..=count` and
    /// payloads `data_item_<id>`.
    pub fn batch(count: usize) -> Vec<Task> {
        (1..=count as u64)
            .map(|i| Task::new(i, format!("data_item_{i}")))
            .collect()
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_issues_sequential_ids_and_payloads() {
        let tasks = Task::batch(3);
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0], Task::new(1, "data_item_1"));
        assert_eq!(tasks[2].id(), TaskId::new(3));
        assert_eq!(tasks[2].payload(), "data_item_3");
    }

    #[test]
    fn empty_batch() {
        assert!(Task::batch(0).is_empty());
    }
}
