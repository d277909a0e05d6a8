//! Sink port: the storage that receives finished result lines.
//!
//! A sink is owned by exactly one writer for its whole lifetime, so the
//! trait takes `&mut self` and needs no internal locking.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sink rejected write: {0}")]
    Rejected(String),
}

/// Opens a sink. Called once per run, by the sink writer.
#[async_trait]
pub trait SinkFactory: Send + Sync {
    async fn create(&self) -> Result<Box<dyn Sink>, SinkError>;

    /// Human-readable destination, used in logs.
    fn target(&self) -> String;
}

#[async_trait]
pub trait Sink: Send {
    /// Append one line. The sink adds the line terminator.
    async fn append(&mut self, line: &str) -> Result<(), SinkError>;

    /// Release the sink. Called exactly once.
    async fn close(self: Box<Self>) -> Result<(), SinkError>;
}
