//! Bounded result channel: workers in, sink writer out.

use tokio::sync::mpsc;

use crate::domain::ResultRecord;
use crate::error::PipelineError;

/// Create a result channel holding at most `capacity` records.
///
/// A zero capacity is raised to 1, as for the work queue.
pub fn result_channel(capacity: usize) -> (ResultSender, ResultReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (ResultSender { tx }, ResultReceiver { rx })
}

/// Producer half. Each worker holds a clone; the channel closes once every
/// clone is closed or dropped.
#[derive(Debug, Clone)]
pub struct ResultSender {
    tx: mpsc::Sender<ResultRecord>,
}

impl ResultSender {
    /// Publish a record, waiting while the channel is full.
    pub async fn publish(&self, record: ResultRecord) -> Result<(), PipelineError> {
        self.tx
            .send(record)
            .await
            .map_err(|_| PipelineError::ResultsClosed)
    }

    /// Give up this handle. The channel closes when the last one goes.
    pub fn close(self) {
        drop(self.tx);
    }
}

/// Consumer half, owned by the sink writer.
#[derive(Debug)]
pub struct ResultReceiver {
    rx: mpsc::Receiver<ResultRecord>,
}

impl ResultReceiver {
    /// Next record, or `None` once every sender is closed and the buffer is
    /// drained.
    pub async fn next(&mut self) -> Option<ResultRecord> {
        self.rx.recv().await
    }
}
