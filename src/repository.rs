//! Repository
//!
//! Keyed get/find/set over the records of one store file.
//!
//! ## Responsibilities
//! - Reject empty keys before any I/O
//! - Look keys up with a locked full scan (first match wins)
//! - Upsert entries while keeping comments, blank lines, order, and quotes
//!
//! Values are never logged; only keys and file paths are.

use std::io::Write;
use std::path::Path;

use crate::adapter::{FileAdapter, UpdateTransaction};
use crate::error::{KvfError, Result};
use crate::record::{Entry, RecordCollection};

/// How reads treat a target file that does not exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    /// Missing file is a `FileNotFound` error
    #[default]
    Strict,

    /// Missing file reads as empty
    SkipMissing,

    /// Missing file is created empty, then read
    Create,
}

/// Keyed view of one store file
#[derive(Debug, Clone)]
pub struct Repository {
    adapter: FileAdapter,
    read_mode: ReadMode,
}

impl Repository {
    pub fn new(adapter: FileAdapter) -> Self {
        Self {
            adapter,
            read_mode: ReadMode::default(),
        }
    }

    /// Set how reads handle a missing file
    pub fn with_read_mode(mut self, mode: ReadMode) -> Self {
        self.read_mode = mode;
        self
    }

    /// The store file
    pub fn path(&self) -> &Path {
        self.adapter.path()
    }

    pub fn read_mode(&self) -> ReadMode {
        self.read_mode
    }

    /// Every record of the file, in file order
    pub fn records(&self) -> Result<RecordCollection> {
        let mut collection = RecordCollection::new();
        let visit = |line: &str| collection.push_line(line);

        let result = match self.read_mode {
            ReadMode::Strict => self.adapter.read_by_line(visit),
            ReadMode::SkipMissing => match self.adapter.read_by_line(visit) {
                Err(e) if e.is_file_not_found() => {
                    tracing::debug!(path = %self.path().display(), "missing file read as empty");
                    Ok(())
                }
                other => other,
            },
            ReadMode::Create => self.adapter.ensure_read_by_line(visit),
        };

        result?;
        Ok(collection)
    }

    /// Entry with `key`, or `KeyNotFound`
    pub fn get(&self, key: &str) -> Result<Entry> {
        if key.is_empty() {
            return Err(KvfError::EmptyKey);
        }

        self.lookup(key)?.ok_or_else(|| KvfError::KeyNotFound {
            key: key.to_string(),
        })
    }

    /// Entry with `key`, or a new unquoted entry holding `default`
    ///
    /// The file is never modified.
    pub fn find(&self, key: &str, default: &str) -> Result<Entry> {
        if key.is_empty() {
            return Err(KvfError::EmptyKey);
        }

        match self.lookup(key)? {
            Some(entry) => Ok(entry),
            None => Entry::new(key, default),
        }
    }

    /// Insert or update `entry` in the file, creating the file if needed
    ///
    /// An existing key keeps its line and quote style; a new key is
    /// appended after all existing lines.
    pub fn set(&self, entry: Entry) -> Result<()> {
        if entry.key.is_empty() {
            return Err(KvfError::EmptyKey);
        }

        let mut tx = UpsertTransaction::new(entry);
        self.adapter.ensure_update(&mut tx)
    }

    /// Shorthand for `set(Entry::new(key, value)?)`
    pub fn set_value(&self, key: &str, value: &str) -> Result<()> {
        self.set(Entry::new(key, value)?)
    }

    fn lookup(&self, key: &str) -> Result<Option<Entry>> {
        let records = self.records()?;
        Ok(records.find(key).cloned())
    }
}

/// Parse every line, upsert one entry, write every record back
struct UpsertTransaction {
    records: RecordCollection,
    incoming: Option<Entry>,
}

impl UpsertTransaction {
    fn new(entry: Entry) -> Self {
        Self {
            records: RecordCollection::new(),
            incoming: Some(entry),
        }
    }
}

impl UpdateTransaction for UpsertTransaction {
    fn read_line(&mut self, line: &str) -> Result<()> {
        self.records.push_line(line)
    }

    fn mutate(&mut self) -> Result<()> {
        if let Some(entry) = self.incoming.take() {
            let key = entry.key.clone();
            let outcome = self.records.upsert(entry);
            tracing::debug!(key = %key, ?outcome, "entry upserted");
        }
        Ok(())
    }

    fn write_to(&mut self, out: &mut dyn Write) -> Result<()> {
        self.records.write_to(out)?;
        Ok(())
    }
}
