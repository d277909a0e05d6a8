//! File-backed sink.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::ports::{Sink, SinkError, SinkFactory};

/// Creates (or truncates) a file and appends one line per record.
///
/// Every append is flushed before it returns, so an I/O error is reported
/// against the line that caused it.
#[derive(Debug, Clone)]
pub struct FileSinkFactory {
    path: PathBuf,
}

impl FileSinkFactory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SinkFactory for FileSinkFactory {
    async fn create(&self) -> Result<Box<dyn Sink>, SinkError> {
        let file = File::create(&self.path).await?;
        Ok(Box::new(FileSink { out: file }))
    }

    fn target(&self) -> String {
        self.path.display().to_string()
    }
}

pub struct FileSink {
    out: File,
}

#[async_trait]
impl Sink for FileSink {
    async fn append(&mut self, line: &str) -> Result<(), SinkError> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        self.out.write_all(buf.as_bytes()).await?;
        self.out.flush().await?;
        Ok(())
    }

    async fn close(mut self: Box<Self>) -> Result<(), SinkError> {
        self.out.flush().await?;
        self.out.sync_all().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_lines_and_flushes_on_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let factory = FileSinkFactory::new(&path);

        let mut sink = factory.create().await.unwrap();
        sink.append("first").await.unwrap();
        sink.append("second").await.unwrap();
        sink.close().await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[tokio::test]
    async fn create_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "stale\n").unwrap();

        let sink = FileSinkFactory::new(&path).create().await.unwrap();
        sink.close().await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn append_reports_error_for_each_failed_line() {
        let mut sink = FileSinkFactory::new("/dev/full").create().await.unwrap();
        assert!(matches!(sink.append("first").await, Err(SinkError::Io(_))));
        assert!(matches!(sink.append("second").await, Err(SinkError::Io(_))));
    }

    #[tokio::test]
    async fn create_fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let factory = FileSinkFactory::new(dir.path().join("missing").join("out.txt"));
        let err = factory.create().await.err().unwrap();
        assert!(matches!(err, SinkError::Io(_)));
    }
}
