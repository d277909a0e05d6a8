//! Processor port: the per-task transformation.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Task;

/// A task the processor refused or could not transform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ProcessError(String);

impl ProcessError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Transforms one task into its result text.
///
/// Implementations are shared by every worker through an `Arc` and are
/// called concurrently, so they must not keep per-call state.
#[async_trait]
pub trait Processor: Send + Sync {
    async fn process(&self, task: &Task) -> Result<String, ProcessError>;
}
