use crate::sink::{Sink, SinkResult, SinkStream};
use std::sync::Mutex;

/// In-memory sink for tests
///
/// Records every appended line with its stream so engine tests can assert
/// on reported events without touching the filesystem.
#[derive(Default)]
pub struct MemorySink {
    lines: Mutex<Vec<(SinkStream, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded lines in append order
    pub fn lines(&self) -> Vec<(SinkStream, String)> {
        self.lines.lock().unwrap().clone()
    }

    /// Recorded lines for one stream, in append order
    pub fn lines_for(&self, stream: SinkStream) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| *s == stream)
            .map(|(_, line)| line.clone())
            .collect()
    }
}

impl Sink for MemorySink {
    fn append_line(&self, stream: SinkStream, line: &str) -> SinkResult<()> {
        self.lines.lock().unwrap().push((stream, line.to_string()));
        Ok(())
    }
}
