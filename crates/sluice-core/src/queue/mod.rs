//! The two bounded channels of the pipeline.
//!
//! - **Work queue**: one producer (the coordinator), many consumers (workers)
//! - **Result channel**: many producers (workers), one consumer (the writer)
//!
//! Both close the same way: once the producing side is closed, consumers
//! keep receiving buffered items and only then observe the end.

mod results;
mod work;

pub use results::{ResultReceiver, ResultSender, result_channel};
pub use work::{WorkQueue, WorkReceiver, work_queue};
