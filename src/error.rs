//! Structured error types for cmdstat
//!
//! Library code returns [`StatError`]; the binaries wrap it in `anyhow` for
//! context and reporting.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// All errors produced by the store, query and render layers.
#[derive(Error, Debug)]
pub enum StatError {
    /// The stats file exists and has content, but it is not a command list.
    #[error("stats file {} is corrupt: {}", .path.display(), .source)]
    StoreCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Another process held the store lock for longer than the allowed wait.
    #[error("timed out after {}ms waiting for the lock on {}", .waited.as_millis(), .path.display())]
    LockTimeout { path: PathBuf, waited: Duration },

    #[error("invalid column name `{0}'")]
    UnknownColumn(String),

    #[error("invalid sort column `{0}'")]
    UnknownSortKey(String),

    #[error("invalid bar color: {0}")]
    InvalidColor(String),

    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize stats: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StatError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        StatError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Convenience Result type using [`StatError`]
pub type Result<T> = std::result::Result<T, StatError>;
