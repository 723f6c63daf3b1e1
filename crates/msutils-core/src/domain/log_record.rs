//! Log record types

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

const TEXT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TEXT_SEPARATOR: &str = " | ";

/// Log level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Critical,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }

    /// Upper-case name written into text log lines
    pub fn label(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }

    /// Parse a level name. Case and surrounding whitespace are ignored and
    /// `warning` is accepted for `warn`.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "critical" => Ok(Self::Critical),
            _ => Err(Error::InvalidLevel(s.to_string())),
        }
    }

    /// File stream the level is written to
    pub fn stream(&self) -> LogStream {
        match self {
            Self::Debug | Self::Info => LogStream::Access,
            Self::Warn | Self::Error | Self::Critical => LogStream::Error,
        }
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination file of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogStream {
    /// debug and info
    Access,
    /// warn, error and critical
    Error,
}

impl LogStream {
    pub const ALL: [LogStream; 2] = [LogStream::Access, LogStream::Error];
}

/// On-disk line format
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// `2026-01-22 10:15:00 | INFO | message`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(other.to_string()),
        }
    }
}

/// Single log entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogRecord {
    #[serde(rename = "ts")]
    pub timestamp: DateTime<Local>,

    #[serde(rename = "lvl")]
    pub level: LogLevel,

    #[serde(rename = "msg")]
    pub message: String,
}

impl LogRecord {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            message: message.into(),
        }
    }

    /// Render the record as a single line, without the trailing newline
    pub fn format_line(&self, format: LogFormat) -> Result<String> {
        match format {
            LogFormat::Text => Ok(format!(
                "{}{sep}{}{sep}{}",
                self.timestamp.format(TEXT_TIMESTAMP_FORMAT),
                self.level.label(),
                escape_message(&self.message),
                sep = TEXT_SEPARATOR,
            )),
            LogFormat::Json => Ok(serde_json::to_string(self)?),
        }
    }

    /// Parse a line written by [`LogRecord::format_line`]
    pub fn parse_line(line: &str, format: LogFormat) -> Option<Self> {
        match format {
            LogFormat::Text => {
                let mut parts = line.splitn(3, TEXT_SEPARATOR);
                let timestamp = parts.next()?;
                let level = parts.next()?;
                let message = parts.next()?;

                let naive = NaiveDateTime::parse_from_str(timestamp, TEXT_TIMESTAMP_FORMAT).ok()?;
                Some(Self {
                    timestamp: Local.from_local_datetime(&naive).earliest()?,
                    level: LogLevel::parse(level).ok()?,
                    message: unescape_message(message),
                })
            }
            LogFormat::Json => serde_json::from_str(line).ok(),
        }
    }
}

// One record, one line
fn escape_message(message: &str) -> String {
    let mut escaped = String::with_capacity(message.len());
    for c in message.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn unescape_message(message: &str) -> String {
    let mut unescaped = String::with_capacity(message.len());
    let mut chars = message.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => unescaped.push('\n'),
            Some('r') => unescaped.push('\r'),
            Some('\\') => unescaped.push('\\'),
            Some(other) => {
                unescaped.push('\\');
                unescaped.push(other);
            }
            None => unescaped.push('\\'),
        }
    }
    unescaped
}
