//! Impls - reference implementations of the ports.
//!
//! - **UppercaseProcessor** / **FaultInjector**: processors
//! - **FileSinkFactory**: writes result lines to a file
//! - **MemorySinkFactory**: keeps result lines in memory (tests, dry runs)

pub mod file_sink;
pub mod memory_sink;
pub mod processors;

pub use self::file_sink::{FileSink, FileSinkFactory};
pub use self::memory_sink::{MemorySink, MemorySinkFactory};
pub use self::processors::{FaultInjector, FaultMode, UppercaseProcessor};
