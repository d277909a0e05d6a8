//! Bounded multi-consumer work queue.
//!
//! Backed by `async-channel`, whose receiver is `Clone`: every worker owns
//! its own handle and no mutex sits around a shared receiver.

use crate::domain::Task;
use crate::error::PipelineError;

/// Create a work queue holding at most `capacity` tasks.
///
/// A zero capacity is raised to 1; `PipelineConfig::validate` rejects it
/// before a run gets here.
pub fn work_queue(capacity: usize) -> (WorkQueue, WorkReceiver) {
    let (tx, rx) = async_channel::bounded(capacity.max(1));
    (WorkQueue { tx }, WorkReceiver { rx })
}

/// Producer half of the work queue.
///
/// There is exactly one of these per queue; it is not `Clone`. Closing it
/// consumes it, so nothing can be enqueued after `close`.
#[derive(Debug)]
pub struct WorkQueue {
    tx: async_channel::Sender<Task>,
}

impl WorkQueue {
    /// Enqueue a task, waiting while the queue is full.
    ///
    /// Fails only if every consumer is gone, which means the pool was never
    /// started or has already been torn down.
    pub async fn enqueue(&self, task: Task) -> Result<(), PipelineError> {
        self.tx
            .send(task)
            .await
            .map_err(|_| PipelineError::QueueClosed)
    }

    /// Number of tasks currently buffered.
    pub fn len(&self) -> usize {
        self.tx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }

    /// Signal that no more tasks will arrive.
    ///
    /// Consumers still receive everything already buffered.
    pub fn close(self) {
        self.tx.close();
    }
}

/// Consumer half of the work queue. Clone one per worker.
#[derive(Debug, Clone)]
pub struct WorkReceiver {
    rx: async_channel::Receiver<Task>,
}

impl WorkReceiver {
    /// Next task, or `None` once the queue is closed and drained.
    pub async fn dequeue(&self) -> Option<Task> {
        self.rx.recv().await.ok()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn delivers_in_submission_order() {
        let (queue, rx) = work_queue(4);
        for task in Task::batch(3) {
            queue.enqueue(task).await.unwrap();
        }
        queue.close();

        let mut seen = Vec::new();
        while let Some(task) = rx.dequeue().await {
            seen.push(task.id().get());
        }
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn close_then_drain() {
        let (queue, rx) = work_queue(8);
        queue.enqueue(Task::new(1, "a")).await.unwrap();
        queue.enqueue(Task::new(2, "b")).await.unwrap();
        queue.close();

        assert_eq!(rx.dequeue().await.map(|t| t.id().get()), Some(1));
        assert_eq!(rx.dequeue().await.map(|t| t.id().get()), Some(2));
        assert_eq!(rx.dequeue().await, None);
        assert_eq!(rx.dequeue().await, None);
    }

    #[tokio::test]
    async fn dequeue_waits_until_task_or_close() {
        let (queue, rx) = work_queue(1);

        let waiter = tokio::spawn(async move { rx.dequeue().await });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        queue.enqueue(Task::new(9, "late")).await.unwrap();
        let task = waiter.await.unwrap();
        assert_eq!(task.map(|t| t.id().get()), Some(9));
    }

    #[tokio::test]
    async fn enqueue_applies_backpressure_when_full() {
        let (queue, rx) = work_queue(1);
        queue.enqueue(Task::new(1, "a")).await.unwrap();
        assert_eq!(queue.len(), 1);

        let blocked = tokio::time::timeout(
            Duration::from_millis(50),
            queue.enqueue(Task::new(2, "b")),
        )
        .await;
        assert!(blocked.is_err(), "enqueue should wait on a full queue");

        assert_eq!(rx.dequeue().await.map(|t| t.id().get()), Some(1));
        queue.enqueue(Task::new(2, "b")).await.unwrap();
        queue.close();
        assert_eq!(rx.dequeue().await.map(|t| t.id().get()), Some(2));
        assert_eq!(rx.dequeue().await, None);
    }

    #[tokio::test]
    async fn every_consumer_observes_close() {
        let (queue, rx) = work_queue(2);
        let other = rx.clone();
        queue.close();
        assert_eq!(rx.dequeue().await, None);
        assert_eq!(other.dequeue().await, None);
    }

    #[tokio::test]
    async fn zero_capacity_holds_one_task() {
        let (queue, rx) = work_queue(0);
        queue.enqueue(Task::new(1, "a")).await.unwrap();
        assert_eq!(queue.len(), 1);
        queue.close();
        assert_eq!(rx.dequeue().await.map(|t| t.id().get()), Some(1));
    }

    #[tokio::test]
    async fn enqueue_without_consumers_fails() {
        let (queue, rx) = work_queue(2);
        drop(rx);
        let err = queue.enqueue(Task::new(1, "a")).await.unwrap_err();
        assert!(matches!(err, PipelineError::QueueClosed));
    }
}
