//! Sink module for durable crawl output
//!
//! The engine reports through an injected [`Sink`] capability instead of
//! writing files inline, so crawl logic stays testable without real I/O.
//! Two append-only streams exist: `Log` receives per-page crawl events,
//! `Results` receives the final email lines per website.

mod file;
mod memory;

pub use file::FileSink;
pub use memory::MemorySink;

use thiserror::Error;

/// Errors that can occur while appending to a sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to open sink file {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to append to sink: {0}")]
    Write(#[from] std::io::Error),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// The two output streams a sink carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkStream {
    /// Per-page crawl events and failures
    Log,
    /// Discovered emails, grouped per website
    Results,
}

/// Append-only line writer shared by concurrent workers
///
/// Implementations must tolerate concurrent `append_line` calls without
/// interleaving partial lines; each call appends exactly one full line.
pub trait Sink: Send + Sync {
    /// Appends one line to the given stream
    fn append_line(&self, stream: SinkStream, line: &str) -> SinkResult<()>;
}
