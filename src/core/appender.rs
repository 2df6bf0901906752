//! Appender trait for console-style output destinations

use super::{error::Result, event::LogEvent, level::Level};

/// One fully rendered console line, with and without ANSI colors
///
/// Format: `[LEVEL] [marker] [logger-name] message`. The marker segment is
/// omitted when the call carried no marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleRecord {
    pub level: Level,
    pub logger: String,
    pub plain: String,
    pub colored: String,
}

impl ConsoleRecord {
    pub fn from_event(event: &LogEvent) -> Self {
        let level = event.level();
        let markers = if event.markers().is_empty() {
            None
        } else {
            Some(
                event
                    .markers()
                    .iter()
                    .map(|m| m.name())
                    .collect::<Vec<_>>()
                    .join(", "),
            )
        };

        let mut plain = level.prefix();
        let mut colored = level.colored_prefix();
        if let Some(ref markers) = markers {
            plain.push_str(&format!(" [{}]", markers));
            colored.push_str(&format!(" [{}]", level.color().paint(markers)));
        }
        plain.push_str(&format!(" [{}] {}", event.logger_name(), event.formatted()));
        colored.push_str(&format!(" [{}] {}", event.logger_name(), event.decorated()));

        Self {
            level,
            logger: event.logger_name().to_string(),
            plain,
            colored,
        }
    }

    /// Pick the colored or plain rendering
    pub fn line(&self, colored: bool) -> &str {
        if colored {
            &self.colored
        } else {
            &self.plain
        }
    }
}

pub trait Appender: Send + Sync {
    fn append(&mut self, record: &ConsoleRecord) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
