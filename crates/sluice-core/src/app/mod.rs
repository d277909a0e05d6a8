//! App - the pipeline itself.
//!
//! # Components
//! - **WorkerLoop**: per-worker consume loop and the per-task fault boundary
//! - **WorkerPool**: spawns the workers, `PoolHandle` joins them
//! - **SinkWriter**: single consumer of the result channel
//! - **Pipeline**: the coordinator driving one run through its stages

pub mod coordinator;
pub mod pool;
pub mod worker_loop;
pub mod writer;

pub use self::coordinator::{Pipeline, RunSummary, Stage, run_pipeline};
pub use self::pool::{PoolHandle, PoolReport, WorkerPool};
pub use self::worker_loop::{Fault, WorkerReport, run_guarded, worker_loop};
pub use self::writer::{SinkWriter, WriterHandle, WriterReport};
