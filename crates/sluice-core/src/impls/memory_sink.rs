//! In-memory sink for tests and dry runs.
//!
//! The factory and every sink it creates share one line buffer, so a test
//! can keep a clone of the factory and inspect what was written.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{Sink, SinkError, SinkFactory};

#[derive(Debug, Default)]
struct Shared {
    lines: Mutex<Vec<String>>,
    closes: AtomicUsize,
}

#[derive(Debug, Clone, Default)]
pub struct MemorySinkFactory {
    shared: Arc<Shared>,
    fail_create: bool,
    fail_containing: Option<String>,
}

impl MemorySinkFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create` fail.
    pub fn fail_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    /// Reject every appended line containing `needle`.
    pub fn fail_appends_containing(mut self, needle: impl Into<String>) -> Self {
        self.fail_containing = Some(needle.into());
        self
    }

    /// Lines written so far, in write order.
    pub fn lines(&self) -> Vec<String> {
        self.shared
            .lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// How many times a sink from this factory was closed.
    pub fn close_count(&self) -> usize {
        self.shared.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SinkFactory for MemorySinkFactory {
    async fn create(&self) -> Result<Box<dyn Sink>, SinkError> {
        if self.fail_create {
            return Err(SinkError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "memory sink configured to fail",
            )));
        }
        Ok(Box::new(MemorySink {
            shared: Arc::clone(&self.shared),
            fail_containing: self.fail_containing.clone(),
        }))
    }

    fn target(&self) -> String {
        "memory".to_string()
    }
}

pub struct MemorySink {
    shared: Arc<Shared>,
    fail_containing: Option<String>,
}

#[async_trait]
impl Sink for MemorySink {
    async fn append(&mut self, line: &str) -> Result<(), SinkError> {
        if let Some(needle) = &self.fail_containing
            && line.contains(needle.as_str())
        {
            return Err(SinkError::Rejected(line.to_string()));
        }
        self.shared
            .lines
            .lock()
            .map_err(|e| SinkError::Rejected(e.to_string()))?
            .push(line.to_string());
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), SinkError> {
        self.shared.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
