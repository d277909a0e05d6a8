//! Ports: the two external collaborators of the pipeline.
//!
//! - **Processor**: transforms a task into result text
//! - **Sink**: persists result lines

pub mod processor;
pub mod sink;

pub use self::processor::{ProcessError, Processor};
pub use self::sink::{Sink, SinkError, SinkFactory};
