//! SinkWriter - the single consumer of the result channel.
//!
//! The writer owns the sink for its whole lifetime, which is what keeps
//! concurrent workers from ever interleaving writes.

use serde::Serialize;
use tokio::sync::oneshot;

use crate::error::PipelineError;
use crate::ports::{Sink, SinkFactory};
use crate::queue::ResultReceiver;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WriterReport {
    pub written: usize,
    pub write_failures: usize,
}

pub struct SinkWriter;

impl SinkWriter {
    /// Open the sink and start draining `results` into it.
    ///
    /// Failing to open the sink is fatal: the error is returned and no
    /// writer task is started.
    pub async fn spawn(
        factory: &dyn SinkFactory,
        results: ResultReceiver,
    ) -> Result<WriterHandle, PipelineError> {
        let target = factory.target();
        let sink = factory.create().await.map_err(|e| {
            tracing::error!(sink = %target, error = %e, "failed to create sink");
            PipelineError::SinkCreate(e)
        })?;
        tracing::debug!(sink = %target, "sink opened");

        let (done_tx, done_rx) = oneshot::channel();
        tokio::spawn(write_loop(sink, results, done_tx));
        Ok(WriterHandle { done: done_rx })
    }
}

async fn write_loop(
    mut sink: Box<dyn Sink>,
    mut results: ResultReceiver,
    done: oneshot::Sender<WriterReport>,
) {
    let mut report = WriterReport::default();

    while let Some(record) = results.next().await {
        match sink.append(&record.line()).await {
            Ok(()) => report.written += 1,
            Err(e) => {
                tracing::warn!(
                    worker = %record.worker_id,
                    task = %record.task_id,
                    error = %e,
                    "File write error"
                );
                report.write_failures += 1;
            }
        }
    }

    if let Err(e) = sink.close().await {
        tracing::warn!(error = %e, "failed to close sink");
    }

    // The coordinator may have gone away on a fatal path.
    let _ = done.send(report);
}

/// Completion signal of a running sink writer. Fires exactly once, after
/// the result channel is closed, drained and the sink released.
pub struct WriterHandle {
    done: oneshot::Receiver<WriterReport>,
}

impl WriterHandle {
    pub async fn finished(self) -> Result<WriterReport, PipelineError> {
        self.done.await.map_err(|_| PipelineError::WriterLost)
    }
}
