use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a [`Record`](crate::record::Record).
///
/// Ordered so that `Debug < Info < Warn < Error`; sinks and the process-wide
/// gate compare levels with `>=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// Level used when the configured integer has no mapping.
    pub const DEFAULT: Level = Level::Info;

    /// Map the integer configuration surface onto a level.
    ///
    /// | value | level |
    /// |-------|-------|
    /// | 5     | Debug |
    /// | 4     | Info  |
    /// | 3     | Warn  |
    /// | 2     | Error |
    ///
    /// Anything else is `None`.
    pub fn from_config(value: i64) -> Option<Level> {
        match value {
            5 => Some(Level::Debug),
            4 => Some(Level::Info),
            3 => Some(Level::Warn),
            2 => Some(Level::Error),
            _ => None,
        }
    }

    /// Like [`Level::from_config`] but falls back to [`Level::DEFAULT`].
    pub fn from_config_or_default(value: i64) -> Level {
        Level::from_config(value).unwrap_or(Level::DEFAULT)
    }

    /// Inverse of [`Level::from_config`].
    pub fn as_config(self) -> i64 {
        match self {
            Level::Debug => 5,
            Level::Info => 4,
            Level::Warn => 3,
            Level::Error => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    /// Three-letter tag used by the console renderer.
    pub fn short(self) -> &'static str {
        match self {
            Level::Debug => "DBG",
            Level::Info => "INF",
            Level::Warn => "WRN",
            Level::Error => "ERR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        if level == tracing::Level::ERROR {
            Level::Error
        } else if level == tracing::Level::WARN {
            Level::Warn
        } else if level == tracing::Level::INFO {
            Level::Info
        } else {
            Level::Debug
        }
    }
}
