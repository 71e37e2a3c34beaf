//! File Adapter
//!
//! Locked reads and read-modify-write updates of a single file.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use bytes::{BufMut, BytesMut};

use crate::error::{KvfError, Result};
use crate::lock::LockManager;

use super::UpdateTransaction;

/// Line-oriented access to one target file, serialized through its lock
#[derive(Debug, Clone)]
pub struct FileAdapter {
    /// Target file
    path: PathBuf,

    /// Source of the target's cross-process lock
    locks: LockManager,
}

impl FileAdapter {
    pub fn new(path: impl Into<PathBuf>, locks: LockManager) -> Self {
        Self {
            path: path.into(),
            locks,
        }
    }

    /// The target file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Feed every line of an existing file to `visit` under the lock
    ///
    /// Fails with `FileNotFound` if the file does not exist. Stops at the
    /// first error returned by `visit` or by I/O.
    pub fn read_by_line<F>(&self, visit: F) -> Result<()>
    where
        F: FnMut(&str) -> Result<()>,
    {
        self.locked(|| {
            let file = File::open(&self.path).map_err(|e| KvfError::from_open(&self.path, e))?;
            visit_lines(&file, visit)
        })
    }

    /// Like [`read_by_line`](Self::read_by_line), creating an empty file
    /// first if it does not exist
    pub fn ensure_read_by_line<F>(&self, visit: F) -> Result<()>
    where
        F: FnMut(&str) -> Result<()>,
    {
        self.locked(|| {
            let file = self.open_or_create_for_read()?;
            visit_lines(&file, visit)
        })
    }

    /// Run `tx` as one read → mutate → write critical section
    ///
    /// Steps:
    /// 1. Acquire the target's lock
    /// 2. Open the file read-write, creating it if absent
    /// 3. Feed existing lines to `tx.read_line`
    /// 4. Call `tx.mutate`
    /// 5. Serialize `tx.write_to` into memory
    /// 6. Rewind and write the buffer
    /// 7. Truncate to the buffer length and sync
    /// 8. Release the lock, whatever happened above
    pub fn ensure_update<T>(&self, tx: &mut T) -> Result<()>
    where
        T: UpdateTransaction + ?Sized,
    {
        self.locked(|| {
            let written = self.update_locked(tx)?;
            tracing::debug!(path = %self.path.display(), bytes = written, "file rewritten");
            Ok(())
        })
    }

    /// Steps 2-7 of `ensure_update`; the caller holds the lock
    fn update_locked<T>(&self, tx: &mut T) -> Result<u64>
    where
        T: UpdateTransaction + ?Sized,
    {
        // Step 2: Open or create for read-write, keeping existing content
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|e| KvfError::from_open(&self.path, e))?;

        // Step 3: Stream existing lines into the transaction
        for line in BufReader::new(&file).lines() {
            tx.read_line(&line?)?;
        }

        // Step 4: Mutate
        tx.mutate()?;

        // Step 5: Build the complete new content before touching the file
        let mut writer = BytesMut::new().writer();
        tx.write_to(&mut writer)?;
        let content = writer.into_inner().freeze();

        // Step 6: Rewind and overwrite
        file.seek(SeekFrom::Start(0))?;
        file.write_all(&content)?;

        // Step 7: Cut off whatever the old, longer content left behind
        let len = content.len() as u64;
        file.set_len(len)?;
        file.sync_all()?;

        Ok(len)
    }

    /// Run `op` with the target's lock held, releasing it on every path
    fn locked<R>(&self, op: impl FnOnce() -> Result<R>) -> Result<R> {
        let mut lock = self.locks.acquire(&self.path)?;
        let result = op();
        // The guard's Drop covers panics in `op`; here a release failure
        // is reported only if `op` itself succeeded
        let released = lock.release();
        let value = result?;
        released?;
        Ok(value)
    }

    fn open_or_create_for_read(&self) -> Result<File> {
        match File::open(&self.path) {
            Ok(file) => Ok(file),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "creating missing file");
                OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create(true)
                    .truncate(false)
                    .open(&self.path)
                    .map_err(|e| KvfError::from_open(&self.path, e))
            }
            Err(e) => Err(KvfError::from_open(&self.path, e)),
        }
    }
}

fn visit_lines<F>(file: &File, mut visit: F) -> Result<()>
where
    F: FnMut(&str) -> Result<()>,
{
    for line in BufReader::new(file).lines() {
        visit(&line?)?;
    }
    Ok(())
}
