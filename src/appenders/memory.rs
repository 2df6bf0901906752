//! In-memory appender
//!
//! Clones share one buffer, so a handle kept by the caller sees every record
//! written through the copy registered with a context.

use crate::core::{Appender, ConsoleRecord, Result};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct MemoryAppender {
    records: Arc<Mutex<Vec<ConsoleRecord>>>,
    colored: bool,
}

impl MemoryAppender {
    /// Capture plain lines
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture colored lines from `lines()`
    pub fn with_colors(colored: bool) -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            colored,
        }
    }

    pub fn records(&self) -> Vec<ConsoleRecord> {
        self.records.lock().clone()
    }

    /// Captured lines, plain or colored depending on construction
    pub fn lines(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .map(|r| r.line(self.colored).to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Appender for MemoryAppender {
    fn append(&mut self, record: &ConsoleRecord) -> Result<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

impl std::fmt::Debug for MemoryAppender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryAppender")
            .field("records", &self.len())
            .field("colored", &self.colored)
            .finish()
    }
}
