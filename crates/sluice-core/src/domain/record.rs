//! Result records: what a worker publishes for each successful task.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{TaskId, WorkerId};

/// Output of one successfully processed task.
///
/// Produced exactly once per success; failed tasks never produce one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub worker_id: WorkerId,
    pub task_id: TaskId,
    pub text: String,
}

impl ResultRecord {
    pub fn new(worker_id: WorkerId, task_id: TaskId, text: impl Into<String>) -> Self {
        Self {
            worker_id,
            task_id,
            text: text.into(),
        }
    }

    /// The single line handed to the sink for this record.
    pub fn line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Worker {}: {}", self.worker_id, self.text)
    }
}
