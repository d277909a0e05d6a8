use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;

use super::worker_loop::{WorkerReport, worker_loop};
use crate::domain::WorkerId;
use crate::ports::Processor;
use crate::queue::{ResultSender, WorkReceiver};

/// Spawns the fixed set of workers for one run.
pub struct WorkerPool;

impl WorkerPool {
    /// Spawn `n` workers sharing one work queue and one result channel.
    ///
    /// Worker ids run from 1 to `n`. The pool keeps no handle of its own on
    /// either channel: once every worker has returned, the only result
    /// sender left is the caller's.
    pub fn start(
        n: usize,
        queue: WorkReceiver,
        results: ResultSender,
        processor: Arc<dyn Processor>,
    ) -> PoolHandle {
        let mut joins = Vec::with_capacity(n);
        for i in 1..=n {
            let worker_id = WorkerId::new(i);
            let join = tokio::spawn(worker_loop(
                worker_id,
                queue.clone(),
                results.clone(),
                Arc::clone(&processor),
            ));
            joins.push((worker_id, join));
        }
        tracing::debug!(workers = n, "worker pool started");

        drop(queue);
        results.close();
        PoolHandle { joins }
    }
}

/// Join barrier over the pool's workers.
///
/// Owned by whoever started the pool and consumed by `await_all`, so it
/// lives for exactly one run.
pub struct PoolHandle {
    joins: Vec<(WorkerId, JoinHandle<WorkerReport>)>,
}

impl PoolHandle {
    pub fn len(&self) -> usize {
        self.joins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joins.is_empty()
    }

    /// Wait until every worker has observed the closed, drained queue and
    /// left its loop. No worker publishes after this returns.
    pub async fn await_all(self) -> PoolReport {
        let mut workers = Vec::with_capacity(self.joins.len());
        for (worker_id, join) in self.joins {
            match join.await {
                Ok(report) => workers.push(report),
                Err(e) => {
                    tracing::error!(worker = %worker_id, error = %e, "worker terminated abnormally");
                    workers.push(WorkerReport::new(worker_id));
                }
            }
        }
        PoolReport::from_workers(workers)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PoolReport {
    pub processed: usize,
    pub failed: usize,
    pub workers: Vec<WorkerReport>,
}

impl PoolReport {
    pub fn from_workers(workers: Vec<WorkerReport>) -> Self {
        let processed = workers.iter().map(|w| w.processed).sum();
        let failed = workers.iter().map(|w| w.failed).sum();
        Self {
            processed,
            failed,
            workers,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use rstest::rstest;

    use super::*;
    use crate::domain::Task;
    use crate::ports::ProcessError;
    use crate::queue::{result_channel, work_queue};

    struct Slow;

    #[async_trait]
    impl Processor for Slow {
        async fn process(&self, task: &Task) -> Result<String, ProcessError> {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok(task.payload().to_uppercase())
        }
    }

    #[rstest]
    #[case(1, 0)]
    #[case(1, 5)]
    #[case(4, 20)]
    #[case(8, 3)]
    #[tokio::test]
    async fn every_task_is_handled_once(#[case] workers: usize, #[case] tasks: usize) {
        let (queue, rx) = work_queue(tasks.max(1));
        let (tx, mut results) = result_channel(tasks.max(1));

        let pool = WorkerPool::start(workers, rx, tx, Arc::new(Slow));
        assert_eq!(pool.len(), workers);

        for task in Task::batch(tasks) {
            queue.enqueue(task).await.unwrap();
        }
        queue.close();

        let report = pool.await_all().await;
        assert_eq!(report.processed, tasks);
        assert_eq!(report.failed, 0);
        assert_eq!(report.workers.len(), workers);

        let mut ids = Vec::new();
        while let Some(record) = results.next().await {
            ids.push(record.task_id.get());
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=tasks as u64).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn await_all_waits_for_queue_close() {
        let (queue, rx) = work_queue(1);
        let (tx, _results) = result_channel(1);
        let pool = WorkerPool::start(2, rx, tx, Arc::new(Slow));

        let joined = tokio::spawn(pool.await_all());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!joined.is_finished(), "workers must wait for queue close");

        queue.close();
        let report = joined.await.unwrap();
        assert_eq!(report.processed, 0);
    }

    #[tokio::test]
    async fn result_channel_closes_after_pool_without_caller_sender() {
        let (queue, rx) = work_queue(2);
        let (tx, mut results) = result_channel(2);
        let pool = WorkerPool::start(2, rx, tx, Arc::new(Slow));

        queue.enqueue(Task::new(1, "x")).await.unwrap();
        queue.close();
        pool.await_all().await;

        assert!(results.next().await.is_some());
        assert!(results.next().await.is_none());
    }
}
