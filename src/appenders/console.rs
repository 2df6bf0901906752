//! Console appender implementation

use crate::core::{Appender, ConsoleRecord, Result};
use std::io::{self, Write};

/// Writes each record as one line (or multiline block) to standard output
pub struct ConsoleAppender {
    use_colors: bool,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    /// Colors are emitted only when enabled here and the terminal supports them
    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    pub fn uses_colors(&self) -> bool {
        self.use_colors && colored::control::SHOULD_COLORIZE.should_colorize()
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, record: &ConsoleRecord) -> Result<()> {
        let line = record.line(self.uses_colors());
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
