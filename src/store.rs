//! Store Module
//!
//! Process-wide entry point that ties configuration, locking, and files.
//!
//! ## Responsibilities
//! - Validate configuration
//! - Create the shared lock directory once, at startup
//! - Hand out adapters and repositories bound to target files

use std::path::{Path, PathBuf};

use crate::adapter::FileAdapter;
use crate::config::Config;
use crate::error::Result;
use crate::lock::LockManager;
use crate::repository::{ReadMode, Repository};

/// Opened store context
///
/// Holds no per-file state: every repository call reads the file afresh
/// and coordinates with other processes only through the lock directory.
/// Cheap to clone and safe to share across threads.
#[derive(Debug, Clone)]
pub struct Store {
    /// Store configuration
    config: Config,

    /// Shared cross-process locks
    locks: LockManager,
}

impl Store {
    /// Open a store with the given config
    ///
    /// On startup:
    /// 1. Validate the config
    /// 2. Create the lock directory if it doesn't exist
    pub fn open(config: Config) -> Result<Self> {
        // Step 1: Reject unusable settings before touching the filesystem
        config.validate()?;

        // Step 2: Lock directory (shared by every process on the host)
        let locks = LockManager::open(&config.lock_dir, config.lock_retry)?;

        tracing::debug!(lock_dir = %config.lock_dir.display(), "store opened");

        Ok(Self { config, locks })
    }

    /// Open with a lock directory (convenience method)
    ///
    /// Uses default config with the specified lock directory
    pub fn open_with_lock_dir(lock_dir: &Path) -> Result<Self> {
        Self::open(Config::builder().lock_dir(lock_dir).build())
    }

    /// Adapter for raw locked line access to `path`
    pub fn adapter(&self, path: impl Into<PathBuf>) -> FileAdapter {
        FileAdapter::new(path, self.locks.clone())
    }

    /// Repository over `path` with strict missing-file handling
    pub fn repository(&self, path: impl Into<PathBuf>) -> Repository {
        Repository::new(self.adapter(path))
    }

    /// Repository over `path` with the given missing-file handling
    pub fn repository_with_mode(&self, path: impl Into<PathBuf>, mode: ReadMode) -> Repository {
        self.repository(path).with_read_mode(mode)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the lock manager
    pub fn locks(&self) -> &LockManager {
        &self.locks
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
