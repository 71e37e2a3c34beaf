//! Record collection
//!
//! Ordered, file-order list of records with upsert.

use std::io::{BufRead, Write};

use crate::error::Result;

use super::{parse_line, Entry, Record};

/// Outcome of [`RecordCollection::upsert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// An existing entry had its value replaced in place
    Updated,

    /// No entry had the key; a new one was appended
    Inserted,
}

/// Records of one file, in file order
///
/// Built fresh for every operation and dropped when it returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordCollection {
    records: Vec<Record>,
}

impl RecordCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every line of `reader`, failing on the first malformed one
    pub fn parse_from<R: BufRead>(reader: R) -> Result<Self> {
        let mut collection = Self::new();
        for line in reader.lines() {
            collection.push_line(&line?)?;
        }
        Ok(collection)
    }

    /// Parse one line and append the resulting record
    pub fn push_line(&mut self, line: &str) -> Result<()> {
        self.records.push(parse_line(line)?);
        Ok(())
    }

    /// Append a record at the end
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, blanks and comments included
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Entry records only, in file order
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.records.iter().filter_map(Record::as_entry)
    }

    /// First entry with `key` (blanks and comments are skipped)
    ///
    /// Duplicate keys are not collapsed; later duplicates are unreachable.
    pub fn find(&self, key: &str) -> Option<&Entry> {
        self.entries().find(|entry| entry.key == key)
    }

    /// Replace the value of the first entry with the same key, or append
    ///
    /// An updated entry keeps its position and its original quote style.
    pub fn upsert(&mut self, incoming: Entry) -> Upsert {
        let existing = self.records.iter_mut().find_map(|record| match record {
            Record::Entry(entry) if entry.key == incoming.key => Some(entry),
            _ => None,
        });

        match existing {
            Some(entry) => {
                entry.value = incoming.value;
                Upsert::Updated
            }
            None => {
                self.records.push(Record::Entry(incoming));
                Upsert::Inserted
            }
        }
    }

    /// Serialize every record, returning the number of bytes written
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<u64> {
        let mut written = 0u64;
        for record in &self.records {
            let line = record.to_line();
            writer.write_all(line.as_bytes())?;
            written += line.len() as u64;
        }
        Ok(written)
    }

    /// Serialize the whole collection to a string
    pub fn to_text(&self) -> String {
        self.records.iter().map(Record::to_line).collect()
    }
}

impl IntoIterator for RecordCollection {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl FromIterator<Record> for RecordCollection {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
