use thiserror::Error;

use crate::config::ConfigError;
use crate::ports::SinkError;

/// Errors that abort a pipeline run.
///
/// Per-task faults and per-line write failures never show up here: they are
/// contained by the worker and the sink writer and only counted.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to create sink: {0}")]
    SinkCreate(#[source] SinkError),

    #[error("work queue is closed")]
    QueueClosed,

    #[error("result channel is closed")]
    ResultsClosed,

    #[error("sink writer exited without reporting completion")]
    WriterLost,
}
