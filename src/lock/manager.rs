//! Lock Manager
//!
//! Owns the shared lock directory and hands out [`FileLock`] guards.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use fs2::FileExt;

use crate::config::LockRetryPolicy;
use crate::error::{KvfError, Result};

use super::FileLock;

/// Acquires per-path locks inside one shared directory
///
/// Cheap to clone; clones share the same directory and policy.
#[derive(Debug, Clone)]
pub struct LockManager {
    /// Directory holding `<id>.lock` files
    dir: Arc<PathBuf>,

    /// Backoff used while a lock is held elsewhere
    policy: LockRetryPolicy,
}

impl LockManager {
    /// Open the lock directory, creating it if absent
    ///
    /// Meant to run once at startup; a failure here means no operation
    /// can be locked at all.
    pub fn open(dir: impl Into<PathBuf>, policy: LockRetryPolicy) -> Result<Self> {
        let dir = dir.into();
        policy.validate()?;

        fs::create_dir_all(&dir).map_err(|source| KvfError::Lock {
            path: dir.clone(),
            source,
        })?;

        tracing::debug!(lock_dir = %dir.display(), "lock directory ready");

        Ok(Self {
            dir: Arc::new(dir),
            policy,
        })
    }

    /// The shared lock directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The retry policy used by [`acquire`](Self::acquire)
    pub fn policy(&self) -> &LockRetryPolicy {
        &self.policy
    }

    /// Companion lock file for `target`
    pub fn lock_path(&self, target: &Path) -> PathBuf {
        self.dir.join(format!("{}.lock", lock_id(target)))
    }

    /// Acquire the lock for `target`, retrying with backoff while it is held
    ///
    /// # Errors
    ///
    /// - [`KvfError::LockTimeout`] once every attempt found the lock held
    /// - [`KvfError::Lock`] if the lock file cannot be opened or the OS
    ///   lock call fails for any reason other than contention; this is
    ///   not retried
    pub fn acquire(&self, target: &Path) -> Result<FileLock> {
        let lock_path = self.lock_path(target);
        let file = open_lock_file(&lock_path)?;
        let max_attempts = self.policy.max_attempts;

        for attempt in 0..max_attempts {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    tracing::debug!(
                        target_file = %target.display(),
                        lock_file = %lock_path.display(),
                        attempts = attempt + 1,
                        "lock acquired"
                    );
                    return Ok(FileLock::new(lock_path, target.to_path_buf(), file));
                }
                Err(e) if is_contended(&e) => {
                    if attempt + 1 < max_attempts {
                        let delay = self.policy.backoff_delay(attempt);
                        tracing::trace!(
                            target_file = %target.display(),
                            attempt = attempt + 1,
                            ?delay,
                            "lock held elsewhere, backing off"
                        );
                        thread::sleep(delay);
                    }
                }
                Err(source) => {
                    return Err(KvfError::Lock {
                        path: lock_path,
                        source,
                    })
                }
            }
        }

        tracing::warn!(
            target_file = %target.display(),
            attempts = max_attempts,
            "gave up waiting for lock"
        );
        Err(KvfError::LockTimeout {
            path: target.to_path_buf(),
            attempts: max_attempts,
        })
    }

    /// Try to acquire the lock once without waiting.
    ///
    /// Returns `Ok(None)` if another holder has it.
    pub fn try_acquire(&self, target: &Path) -> Result<Option<FileLock>> {
        let lock_path = self.lock_path(target);
        let file = open_lock_file(&lock_path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(FileLock::new(lock_path, target.to_path_buf(), file))),
            Err(e) if is_contended(&e) => Ok(None),
            Err(source) => Err(KvfError::Lock {
                path: lock_path,
                source,
            }),
        }
    }
}

/// Stable numeric identity of a target path
///
/// CRC32 of the absolute (not canonicalized) path, so `./a.env` and
/// `a.env` share a lock while the file does not need to exist yet.
pub fn lock_id(target: &Path) -> u32 {
    let absolute = std::path::absolute(target).unwrap_or_else(|_| target.to_path_buf());
    crc32fast::hash(absolute.as_os_str().as_encoded_bytes())
}

fn open_lock_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|source| KvfError::Lock {
            path: path.to_path_buf(),
            source,
        })
}

/// "Held by someone else", as opposed to a real failure
fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}
