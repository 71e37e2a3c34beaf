//! Lock guard
//!
//! Holds an acquired lock file and releases it on drop.

use std::fs::File;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{KvfError, Result};

/// An exclusive lock on one target path
///
/// The lock is automatically released when this guard is dropped, so it is
/// released even if the caller's critical section panics or returns early.
#[derive(Debug)]
pub struct FileLock {
    /// Companion lock file
    lock_path: PathBuf,

    /// Target file this lock protects
    target: PathBuf,

    /// Open lock file with the OS lock held; `None` once released
    file: Option<File>,
}

impl FileLock {
    pub(crate) fn new(lock_path: PathBuf, target: PathBuf, file: File) -> Self {
        Self {
            lock_path,
            target,
            file: Some(file),
        }
    }

    /// Check if the lock is currently held.
    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    /// Path of the companion lock file
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Path of the file this lock protects
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Release the lock explicitly.
    ///
    /// Safe to call more than once; only the first call unlocks.
    pub fn release(&mut self) -> Result<()> {
        if let Some(file) = self.file.take() {
            file.unlock().map_err(|source| KvfError::Lock {
                path: self.lock_path.clone(),
                source,
            })?;
            tracing::debug!(target_file = %self.target.display(), "lock released");
        }
        Ok(())
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Closing the handle drops the OS lock as well
        if let Some(file) = self.file.take() {
            let _ = file.unlock();
            tracing::debug!(target_file = %self.target.display(), "lock released on drop");
        }
    }
}
