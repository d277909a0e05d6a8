//! Coordinator - wires the channels, the pool and the writer for one run.
//!
//! # Lifecycle
//! `Init -> QueueFilled -> QueueClosed -> WorkersJoined -> ResultsClosed ->
//! WriterJoined -> Done`
//!
//! The result channel is closed only after every worker has joined; closing
//! it earlier would lose records still in flight.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use super::pool::WorkerPool;
use super::writer::SinkWriter;
use crate::config::PipelineConfig;
use crate::domain::Task;
use crate::error::PipelineError;
use crate::ports::{Processor, SinkFactory};
use crate::queue::{result_channel, work_queue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Init,
    QueueFilled,
    QueueClosed,
    WorkersJoined,
    ResultsClosed,
    WriterJoined,
    Done,
}

impl Stage {
    fn advance(&mut self, next: Stage) {
        debug_assert!(next > *self, "stage went backwards: {self} -> {next}");
        tracing::debug!(from = %self, to = %next, "pipeline stage");
        *self = next;
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Init => "INIT",
            Stage::QueueFilled => "QUEUE_FILLED",
            Stage::QueueClosed => "QUEUE_CLOSED",
            Stage::WorkersJoined => "WORKERS_JOINED",
            Stage::ResultsClosed => "RESULTS_CLOSED",
            Stage::WriterJoined => "WRITER_JOINED",
            Stage::Done => "DONE",
        };
        f.write_str(s)
    }
}

/// Outcome of a completed run.
///
/// A run that reaches `Done` counts as successful even when some tasks
/// failed or some lines could not be written; those are reported here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub submitted: usize,
    pub processed: usize,
    pub failed: usize,
    pub written: usize,
    pub write_failures: usize,
    /// Tasks that did not end up as a line in the sink.
    pub dropped: usize,
    pub elapsed_ms: u64,
}

pub struct Pipeline {
    config: PipelineConfig,
    processor: Arc<dyn Processor>,
    sink: Arc<dyn SinkFactory>,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        processor: Arc<dyn Processor>,
        sink: Arc<dyn SinkFactory>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            config,
            processor,
            sink,
        })
    }

    /// Push `tasks` through the pipeline and wait until every result is
    /// flushed.
    ///
    /// Fails only if the sink cannot be created (nothing is processed then)
    /// or a lifecycle signal is lost.
    pub async fn run(self, tasks: Vec<Task>) -> Result<RunSummary, PipelineError> {
        let started = Instant::now();
        let mut stage = Stage::Init;
        let submitted = tasks.len();
        tracing::info!(
            workers = self.config.worker_count,
            tasks = submitted,
            sink = %self.sink.target(),
            "starting pipeline"
        );

        let (queue, work_rx) = work_queue(self.config.queue_capacity);
        let (results_tx, results_rx) = result_channel(self.config.result_capacity);

        // The writer has to be draining before tasks go in: with small
        // capacities the producer waits on workers, which wait on the writer.
        let writer = SinkWriter::spawn(self.sink.as_ref(), results_rx).await?;
        let pool = WorkerPool::start(
            self.config.worker_count,
            work_rx,
            results_tx.clone(),
            Arc::clone(&self.processor),
        );

        tracing::info!("sending tasks");
        for task in tasks {
            queue.enqueue(task).await?;
        }
        stage.advance(Stage::QueueFilled);

        queue.close();
        stage.advance(Stage::QueueClosed);

        let pool_report = pool.await_all().await;
        stage.advance(Stage::WorkersJoined);

        results_tx.close();
        stage.advance(Stage::ResultsClosed);

        let writer_report = writer.finished().await?;
        stage.advance(Stage::WriterJoined);

        let summary = RunSummary {
            submitted,
            processed: pool_report.processed,
            failed: pool_report.failed,
            written: writer_report.written,
            write_failures: writer_report.write_failures,
            dropped: submitted.saturating_sub(writer_report.written),
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        stage.advance(Stage::Done);

        tracing::info!(
            processed = summary.processed,
            failed = summary.failed,
            written = summary.written,
            write_failures = summary.write_failures,
            dropped = summary.dropped,
            elapsed_ms = summary.elapsed_ms,
            "All tasks completed. Check {}",
            self.sink.target()
        );
        Ok(summary)
    }
}

/// Run the reference batch of `config.task_count` tasks.
pub async fn run_pipeline(
    config: PipelineConfig,
    processor: Arc<dyn Processor>,
    sink: Arc<dyn SinkFactory>,
) -> Result<RunSummary, PipelineError> {
    let tasks = Task::batch(config.task_count);
    Pipeline::new(config, processor, sink)?.run(tasks).await
}
