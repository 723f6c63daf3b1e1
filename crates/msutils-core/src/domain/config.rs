//! Logger configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::log_record::{LogFormat, LogStream};
use crate::error::{Error, Result};

/// Environment variables read by [`LoggerConfig::from_env`]
pub mod env_keys {
    pub const DIR: &str = "MSUTILS_LOG_DIR";
    pub const ACCESS_FILE: &str = "MSUTILS_LOG_ACCESS_FILE";
    pub const ERROR_FILE: &str = "MSUTILS_LOG_ERROR_FILE";
    pub const ROTATION: &str = "MSUTILS_LOG_ROTATION";
    pub const MAX_BYTES: &str = "MSUTILS_LOG_MAX_BYTES";
    pub const MAX_FILES: &str = "MSUTILS_LOG_MAX_FILES";
    pub const COMPRESS: &str = "MSUTILS_LOG_COMPRESS";
    pub const FILE_MODE: &str = "MSUTILS_LOG_FILE_MODE";
    pub const DIR_MODE: &str = "MSUTILS_LOG_DIR_MODE";
    pub const FORMAT: &str = "MSUTILS_LOG_FORMAT";
    pub const FALLBACKS: &str = "MSUTILS_LOG_FALLBACKS";
    pub const APP_NAME: &str = "MSUTILS_LOG_APP_NAME";
}

pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// When the active log file is archived
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RotationPolicy {
    /// Archive before a write would push the file past `max_bytes`
    Size { max_bytes: u64 },
    /// Archive on the first write of a new calendar day
    Daily,
    /// Never archive
    Never,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self::Size {
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

/// Configuration for [`FileLogger`](crate::FileLogger)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggerConfig {
    /// Directory holding the log files
    pub log_dir: PathBuf,

    /// File name for debug and info records
    pub access_file: String,

    /// File name for warn, error and critical records
    pub error_file: String,

    pub rotation: RotationPolicy,

    /// Maximum number of archived files kept per stream
    pub max_files: usize,

    /// Gzip archived files
    pub compress: bool,

    /// Permission bits for log files (unix only)
    pub file_mode: u32,

    /// Permission bits for the log directory (unix only)
    pub dir_mode: u32,

    pub format: LogFormat,

    /// Try alternative directories and file names instead of failing
    pub fallbacks: bool,

    /// Used to name fallback directories
    pub app_name: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            access_file: "access.log".to_string(),
            error_file: "error.log".to_string(),
            rotation: RotationPolicy::default(),
            max_files: 30,
            compress: false,
            file_mode: 0o664,
            dir_mode: 0o775,
            format: LogFormat::Text,
            fallbacks: false,
            app_name: "msutils".to_string(),
        }
    }
}

impl LoggerConfig {
    /// Defaults with a different log directory
    pub fn with_dir(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            ..Self::default()
        }
    }

    pub fn file_name(&self, stream: LogStream) -> &str {
        match stream {
            LogStream::Access => &self.access_file,
            LogStream::Error => &self.error_file,
        }
    }

    /// Build a config from `MSUTILS_LOG_*` environment variables, loading a
    /// `.env` file first when one is present
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup; unset keys keep defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(env_keys::DIR) {
            config.log_dir = PathBuf::from(dir);
        }
        if let Some(name) = lookup(env_keys::ACCESS_FILE) {
            config.access_file = name;
        }
        if let Some(name) = lookup(env_keys::ERROR_FILE) {
            config.error_file = name;
        }

        let max_bytes = lookup(env_keys::MAX_BYTES)
            .map(|v| parse_number::<u64>(env_keys::MAX_BYTES, &v))
            .transpose()?;
        config.rotation = match lookup(env_keys::ROTATION) {
            Some(kind) => match kind.trim().to_lowercase().as_str() {
                "size" => RotationPolicy::Size {
                    max_bytes: max_bytes.unwrap_or(DEFAULT_MAX_BYTES),
                },
                "daily" => RotationPolicy::Daily,
                "never" => RotationPolicy::Never,
                _ => {
                    return Err(Error::Config {
                        key: env_keys::ROTATION,
                        value: kind,
                    })
                }
            },
            None => RotationPolicy::Size {
                max_bytes: max_bytes.unwrap_or(DEFAULT_MAX_BYTES),
            },
        };

        if let Some(v) = lookup(env_keys::MAX_FILES) {
            config.max_files = parse_number(env_keys::MAX_FILES, &v)?;
        }
        if let Some(v) = lookup(env_keys::COMPRESS) {
            config.compress = parse_bool(env_keys::COMPRESS, &v)?;
        }
        if let Some(v) = lookup(env_keys::FILE_MODE) {
            config.file_mode = parse_mode(env_keys::FILE_MODE, &v)?;
        }
        if let Some(v) = lookup(env_keys::DIR_MODE) {
            config.dir_mode = parse_mode(env_keys::DIR_MODE, &v)?;
        }
        if let Some(v) = lookup(env_keys::FORMAT) {
            config.format = v.parse().map_err(|value| Error::Config {
                key: env_keys::FORMAT,
                value,
            })?;
        }
        if let Some(v) = lookup(env_keys::FALLBACKS) {
            config.fallbacks = parse_bool(env_keys::FALLBACKS, &v)?;
        }
        if let Some(name) = lookup(env_keys::APP_NAME) {
            config.app_name = name;
        }

        Ok(config)
    }
}

fn parse_number<N: std::str::FromStr>(key: &'static str, value: &str) -> Result<N> {
    value.trim().parse().map_err(|_| Error::Config {
        key,
        value: value.to_string(),
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config {
            key,
            value: value.to_string(),
        }),
    }
}

// Octal, with or without a 0o prefix
fn parse_mode(key: &'static str, value: &str) -> Result<u32> {
    let digits = value.trim().trim_start_matches("0o");
    match u32::from_str_radix(digits, 8) {
        Ok(mode) if mode <= 0o7777 => Ok(mode),
        _ => Err(Error::Config {
            key,
            value: value.to_string(),
        }),
    }
}
