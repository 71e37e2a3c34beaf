//! Error types for kvf
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using KvfError
pub type Result<T> = std::result::Result<T, KvfError>;

/// Unified error type for kvf operations
#[derive(Debug, Error)]
pub enum KvfError {
    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    #[error("key is empty")]
    EmptyKey,

    #[error("invalid line: {line}")]
    MalformedLine { line: String },

    #[error("key not found: {key}")]
    KeyNotFound { key: String },

    // -------------------------------------------------------------------------
    // File Errors
    // -------------------------------------------------------------------------
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("cannot access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Lock Errors
    // -------------------------------------------------------------------------
    #[error("timed out acquiring lock for {} after {attempts} attempts", path.display())]
    LockTimeout { path: PathBuf, attempts: u32 },

    #[error("lock failed for {}: {source}", path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl KvfError {
    /// Map an error from opening `path` to `FileNotFound` or `FileAccess`
    pub(crate) fn from_open(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            KvfError::FileNotFound { path }
        } else {
            KvfError::FileAccess { path, source: err }
        }
    }

    /// True for errors caused by the target file not existing
    pub fn is_file_not_found(&self) -> bool {
        matches!(self, KvfError::FileNotFound { .. })
    }

    /// True for a lookup that found no matching entry
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, KvfError::KeyNotFound { .. })
    }
}
