//! Reference processors.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{Task, TaskId};
use crate::ports::{ProcessError, Processor};

/// Uppercases the payload after an artificial delay.
///
/// Output: `Task <id> processed: <PAYLOAD>`.
#[derive(Debug, Clone)]
pub struct UppercaseProcessor {
    delay: Duration,
}

impl UppercaseProcessor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for UppercaseProcessor {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

#[async_trait]
impl Processor for UppercaseProcessor {
    async fn process(&self, task: &Task) -> Result<String, ProcessError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(format!(
            "Task {} processed: {}",
            task.id(),
            task.payload().to_uppercase()
        ))
    }
}

/// How an injected fault shows up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultMode {
    Error,
    Panic,
}

/// Wraps a processor and fails it for a fixed set of task ids.
#[derive(Debug, Clone)]
pub struct FaultInjector<P> {
    inner: P,
    failing: HashSet<TaskId>,
    mode: FaultMode,
}

impl<P: Processor> FaultInjector<P> {
    pub fn new(inner: P, failing: impl IntoIterator<Item = TaskId>, mode: FaultMode) -> Self {
        Self {
            inner,
            failing: failing.into_iter().collect(),
            mode,
        }
    }
}

#[async_trait]
impl<P: Processor> Processor for FaultInjector<P> {
    async fn process(&self, task: &Task) -> Result<String, ProcessError> {
        if self.failing.contains(&task.id()) {
            match self.mode {
                FaultMode::Error => {
                    return Err(ProcessError::new(format!(
                        "injected fault for task {}",
                        task.id()
                    )));
                }
                FaultMode::Panic => panic!("injected panic for task {}", task.id()),
            }
        }
        self.inner.process(task).await
    }
}
