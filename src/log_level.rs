use std::fmt;
use std::str::FromStr;

use crate::error::LoggerError;

/// Severity of a log record, and the threshold a sink filters on.
///
/// Variants are declared from most to least urgent, so the derived ordering
/// puts `Error` lowest: `Error < Warning < Info < Debug`. A sink with minimum
/// level `m` accepts a record of level `l` when `l <= m`.
///
/// # Examples
///
/// ```
/// # use sink_logger::LogLevel;
/// assert!(LogLevel::Error < LogLevel::Debug);
/// assert!(LogLevel::Warning.admits(LogLevel::Error));
/// assert!(!LogLevel::Warning.admits(LogLevel::Info));
/// assert_eq!(LogLevel::Warning.to_string(), "Warning");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogLevel {
    /// Failures the application could not recover from locally.
    Error = 0,
    /// Unexpected situations that did not stop the current operation.
    Warning = 1,
    /// Coarse progress reporting.
    Info = 2,
    /// Detail useful only while debugging.
    Debug = 3,
}

impl LogLevel {
    /// All levels, most severe first.
    pub const ALL: [LogLevel; 4] = [
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Info,
        LogLevel::Debug,
    ];

    /// The name written between brackets in a formatted line.
    pub const fn name(self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warning => "Warning",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
        }
    }

    /// Returns true when a sink thresholded at `self` should emit a record
    /// of level `record`, i.e. the record is at least as severe.
    #[inline]
    pub fn admits(self, record: LogLevel) -> bool {
        record <= self
    }

    /// The `log` crate filter that lets every record this level admits through.
    ///
    /// `Debug` opens the filter up to `Trace`, since trace records fold into `Debug`.
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warning => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Trace,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            _ => Err(LoggerError::UnknownLevel(s.to_string())),
        }
    }
}

impl TryFrom<u8> for LogLevel {
    type Error = LoggerError;

    fn try_from(tag: u8) -> Result<Self, LoggerError> {
        LogLevel::ALL
            .get(usize::from(tag))
            .copied()
            .ok_or_else(|| LoggerError::UnknownLevel(format!("tag {tag}")))
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warning,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug | log::Level::Trace => LogLevel::Debug,
        }
    }
}
