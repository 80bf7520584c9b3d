use crate::sink::{Sink, SinkError, SinkResult, SinkStream};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Append-only file sink with one file per stream
///
/// Files are opened in append mode at construction and kept open for the
/// process lifetime. Each stream has its own mutex, so concurrent workers
/// can append to the log while results are being written, but two lines
/// on the same stream can never interleave.
pub struct FileSink {
    log: Mutex<File>,
    results: Mutex<File>,
}

impl FileSink {
    /// Opens (creating if needed) the log and results files
    ///
    /// # Arguments
    ///
    /// * `log_path` - Path of the crawl-event log file
    /// * `results_path` - Path of the email results file
    pub fn open(log_path: &Path, results_path: &Path) -> SinkResult<Self> {
        Ok(Self {
            log: Mutex::new(open_append(log_path)?),
            results: Mutex::new(open_append(results_path)?),
        })
    }
}

fn open_append(path: &Path) -> SinkResult<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| SinkError::Open {
            path: path.display().to_string(),
            source,
        })
}

impl Sink for FileSink {
    fn append_line(&self, stream: SinkStream, line: &str) -> SinkResult<()> {
        let file = match stream {
            SinkStream::Log => &self.log,
            SinkStream::Results => &self.results,
        };

        let mut guard = file.lock().unwrap();
        writeln!(guard, "{}", line)?;
        guard.flush()?;
        Ok(())
    }
}
