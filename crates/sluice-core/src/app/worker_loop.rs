//! WorkerLoop - dequeue, process inside the fault boundary, publish.

use std::any::Any;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinError;

use crate::domain::{ResultRecord, Task, WorkerId};
use crate::ports::{ProcessError, Processor};
use crate::queue::{ResultSender, WorkReceiver};

/// Why a single task produced no result.
#[derive(Debug, Error)]
pub enum Fault {
    #[error("{0}")]
    Failed(#[from] ProcessError),

    #[error("panicked: {0}")]
    Panicked(String),

    #[error("aborted: {0}")]
    Aborted(String),
}

impl From<JoinError> for Fault {
    fn from(err: JoinError) -> Self {
        if err.is_panic() {
            Fault::Panicked(panic_message(err.into_panic()))
        } else {
            Fault::Aborted(err.to_string())
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Run the processor on one task, turning every abnormal outcome into a
/// `Fault`.
///
/// The call runs as its own tokio task so a panic inside the processor
/// surfaces as a `JoinError` here instead of unwinding through the worker.
pub async fn run_guarded(processor: &Arc<dyn Processor>, task: Task) -> Result<String, Fault> {
    let processor = Arc::clone(processor);
    let handle = tokio::spawn(async move { processor.process(&task).await });
    Ok(handle.await??)
}

/// What one worker did before its queue ran dry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerReport {
    pub worker_id: WorkerId,
    pub processed: usize,
    pub failed: usize,
}

impl WorkerReport {
    pub fn new(worker_id: WorkerId) -> Self {
        Self {
            worker_id,
            processed: 0,
            failed: 0,
        }
    }
}

/// Consume tasks until the queue is closed and drained.
///
/// Nothing that happens to a single task ends the loop: faults are logged
/// and counted, and the worker moves on to the next task.
pub async fn worker_loop(
    worker_id: WorkerId,
    queue: WorkReceiver,
    results: ResultSender,
    processor: Arc<dyn Processor>,
) -> WorkerReport {
    tracing::debug!(worker = %worker_id, "Worker {worker_id} started");
    let mut report = WorkerReport::new(worker_id);

    while let Some(task) = queue.dequeue().await {
        let task_id = task.id();

        let text = match run_guarded(&processor, task).await {
            Ok(text) => text,
            Err(fault) => {
                tracing::warn!(
                    worker = %worker_id,
                    task = %task_id,
                    error = %fault,
                    "Worker {worker_id} recovered from error on task {task_id}"
                );
                report.failed += 1;
                continue;
            }
        };

        // The coordinator closes the channel only after every worker joined,
        // so this only fails if the sink writer itself died.
        if let Err(e) = results.publish(ResultRecord::new(worker_id, task_id, text)).await {
            tracing::error!(
                worker = %worker_id,
                task = %task_id,
                error = %e,
                "result dropped"
            );
            report.failed += 1;
            continue;
        }
        report.processed += 1;
    }

    results.close();
    tracing::debug!(
        worker = %worker_id,
        processed = report.processed,
        failed = report.failed,
        "Worker {worker_id} finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::domain::TaskId;
    use crate::queue::{result_channel, work_queue};

    struct Echo;

    #[async_trait]
    impl Processor for Echo {
        async fn process(&self, task: &Task) -> Result<String, ProcessError> {
            match task.payload() {
                "boom" => panic!("exploded on {}", task.id()),
                "bad" => Err(ProcessError::new("bad payload")),
                other => Ok(other.to_string()),
            }
        }
    }

    fn echo() -> Arc<dyn Processor> {
        Arc::new(Echo)
    }

    #[tokio::test]
    async fn guarded_passes_through_success() {
        let text = run_guarded(&echo(), Task::new(1, "ok")).await.unwrap();
        assert_eq!(text, "ok");
    }

    #[tokio::test]
    async fn guarded_contains_errors() {
        let fault = run_guarded(&echo(), Task::new(1, "bad")).await.unwrap_err();
        assert!(matches!(fault, Fault::Failed(ref e) if e.message() == "bad payload"));
    }

    #[tokio::test]
    async fn guarded_contains_panics() {
        let fault = run_guarded(&echo(), Task::new(4, "boom")).await.unwrap_err();
        match fault {
            Fault::Panicked(msg) => assert_eq!(msg, "exploded on 4"),
            other => panic!("expected panic fault, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn worker_survives_faults_and_drains_queue() {
        let (queue, rx) = work_queue(8);
        let (tx, mut results) = result_channel(8);

        for (id, payload) in [(1, "a"), (2, "boom"), (3, "bad"), (4, "d")] {
            queue.enqueue(Task::new(id, payload)).await.unwrap();
        }
        queue.close();

        let report = worker_loop(WorkerId::new(1), rx, tx, echo()).await;
        assert_eq!(report.processed, 2);
        assert_eq!(report.failed, 2);

        let mut got = Vec::new();
        while let Some(record) = results.next().await {
            got.push((record.task_id, record.line()));
        }
        assert_eq!(
            got,
            vec![
                (TaskId::new(1), "Worker 1: a".to_string()),
                (TaskId::new(4), "Worker 1: d".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn worker_keeps_draining_when_results_are_gone() {
        let (queue, rx) = work_queue(4);
        let (tx, results) = result_channel(1);
        drop(results);

        for task in Task::batch(3) {
            queue.enqueue(task).await.unwrap();
        }
        queue.close();

        let report = worker_loop(WorkerId::new(2), rx, tx, echo()).await;
        assert_eq!(report.processed, 0);
        assert_eq!(report.failed, 3);
    }
}
