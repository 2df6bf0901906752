//! Log level definitions

use super::color::ColorTag;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log call, ordered by weight (low = verbose)
///
/// `Exception` is a pseudo-level: it is never requested by name through the
/// per-level methods but is selected automatically whenever a call carries a
/// [`Throwable`](super::argument::Throwable) argument.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Level {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Exception,
}

impl Level {
    /// Every level, ordered by ascending weight
    pub const ALL: [Level; 6] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Exception,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Exception => "EXCEPTION",
        }
    }

    /// Filtering weight in the range 0..=1000
    pub const fn weight(&self) -> u16 {
        match self {
            Level::Trace => 0,
            Level::Debug => 200,
            Level::Info => 400,
            Level::Warn => 600,
            Level::Error => 800,
            Level::Exception => 1000,
        }
    }

    /// `true` iff this level passes the given threshold
    #[inline]
    pub const fn is_loggable(&self, threshold: Level) -> bool {
        threshold.weight() <= self.weight()
    }

    pub fn color(&self) -> ColorTag {
        match self {
            Level::Trace => ColorTag::BrightBlack,
            Level::Debug => ColorTag::Blue,
            Level::Info => ColorTag::Green,
            Level::Warn => ColorTag::Yellow,
            Level::Error => ColorTag::Red,
            Level::Exception => ColorTag::BrightRed,
        }
    }

    /// Console prefix without color, e.g. `[INFO]`
    pub fn prefix(&self) -> String {
        format!("[{}]", self.to_str())
    }

    /// Console prefix wrapped in the level's color
    pub fn colored_prefix(&self) -> String {
        format!("[{}]", self.color().paint(self.to_str()))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(Level::Trace),
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "ERROR" => Ok(Level::Error),
            "EXCEPTION" => Ok(Level::Exception),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_are_ordered() {
        for pair in Level::ALL.windows(2) {
            assert!(pair[0].weight() < pair[1].weight());
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(Level::Exception.weight(), 1000);
    }

    #[test]
    fn test_is_loggable() {
        assert!(Level::Warn.is_loggable(Level::Info));
        assert!(Level::Info.is_loggable(Level::Info));
        assert!(!Level::Debug.is_loggable(Level::Info));
        assert!(Level::Exception.is_loggable(Level::Exception));
        assert!(!Level::Error.is_loggable(Level::Exception));
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(Level::Warn.prefix(), "[WARN]");
        assert_eq!(Level::Warn.colored_prefix(), "[\x1b[33mWARN\x1b[0m]");
    }

    #[test]
    fn test_parse() {
        assert_eq!("warning".parse::<Level>(), Ok(Level::Warn));
        assert_eq!("Exception".parse::<Level>(), Ok(Level::Exception));
        assert!("verbose".parse::<Level>().is_err());
    }
}
