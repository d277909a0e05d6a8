//! sluice-core
//!
//! A bounded fan-out/fan-in pipeline: a fixed pool of workers drains a work
//! queue, each result goes through one result channel to a single sink
//! writer.
//!
//! # Modules
//! - **domain**: tasks, ids, result records
//! - **ports**: the `Processor` and `Sink` collaborators
//! - **queue**: the work queue and the result channel
//! - **app**: worker loop, worker pool, sink writer, coordinator
//! - **impls**: reference processors and sinks
//! - **config**: run parameters
//! - **error**: run-level errors

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod impls;
pub mod ports;
pub mod queue;

pub use app::{Pipeline, RunSummary, Stage, run_pipeline};
pub use config::{ConfigError, PipelineConfig};
pub use domain::{ResultRecord, Task, TaskId, WorkerId};
pub use error::PipelineError;
pub use ports::{ProcessError, Processor, Sink, SinkError, SinkFactory};
