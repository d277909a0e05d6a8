//! Pipeline configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("worker_count must be greater than 0")]
    ZeroWorkers,

    #[error("queue_capacity must be greater than 0")]
    ZeroQueueCapacity,

    #[error("result_capacity must be greater than 0")]
    ZeroResultCapacity,

    #[error("sink_target must not be empty")]
    EmptySinkTarget,
}

/// Startup parameters of one pipeline run.
///
/// `queue_capacity` and `result_capacity` are independent of `task_count`;
/// either may be smaller than the number of tasks, in which case producers
/// wait for space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub worker_count: usize,
    pub task_count: usize,
    pub queue_capacity: usize,
    pub result_capacity: usize,
    pub sink_target: String,
    /// Artificial delay applied by the reference processor.
    #[serde(with = "millis")]
    pub process_delay: Duration,
}

impl PipelineConfig {
    pub const DEFAULT_WORKERS: usize = 4;
    pub const DEFAULT_TASKS: usize = 20;
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        if self.result_capacity == 0 {
            return Err(ConfigError::ZeroResultCapacity);
        }
        if self.sink_target.trim().is_empty() {
            return Err(ConfigError::EmptySinkTarget);
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            worker_count: Self::DEFAULT_WORKERS,
            task_count: Self::DEFAULT_TASKS,
            queue_capacity: Self::DEFAULT_TASKS,
            result_capacity: Self::DEFAULT_TASKS,
            sink_target: "output.txt".to_string(),
            process_delay: Self::DEFAULT_DELAY,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
