//! Error types shared by the response and logging halves of the crate

use std::path::{Path, PathBuf};

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong when building envelopes or writing logs
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The envelope payload could not be encoded as JSON
    #[error("failed to serialize response envelope: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A log level string did not name a known level
    #[error("invalid log level '{0}' (expected debug, info, warn, error or critical)")]
    InvalidLevel(String),

    /// A filesystem operation failed
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration value could not be interpreted
    #[error("invalid value for {key}: '{value}'")]
    Config { key: &'static str, value: String },
}

impl Error {
    /// True when the error came from the filesystem
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Attach the failing action and path to an `io::Result`
pub(crate) trait IoContext<T> {
    fn io_context(self, action: &'static str, path: &Path) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn io_context(self, action: &'static str, path: &Path) -> Result<T> {
        self.map_err(|source| Error::Io {
            action,
            path: path.to_path_buf(),
            source,
        })
    }
}
