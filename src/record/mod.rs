//! Record Module
//!
//! Typed view of a single line of a store file.
//!
//! ## Responsibilities
//! - Parse a text line into a blank, comment, or entry record
//! - Remember the quote style of each entry
//! - Serialize records back to their textual form
//! - Keep records in file order for position-preserving updates
//!
//! ## Line Format
//! ```text
//! ┌──────────────────────────────┬──────────────────────────┐
//! │ Source line                  │ Record                   │
//! ├──────────────────────────────┼──────────────────────────┤
//! │ (whitespace only)            │ Blank                    │
//! │ # any text                   │ Comment("any text")      │
//! │ key=value                    │ Entry { quote: None }    │
//! │ key="value"                  │ Entry { quote: Double }  │
//! │ key='value'                  │ Entry { quote: Single }  │
//! └──────────────────────────────┴──────────────────────────┘
//! ```
//!
//! No I/O and no locking happens here.

mod parser;
mod collection;

pub use parser::parse_line;
pub use collection::{RecordCollection, Upsert};

use crate::error::{KvfError, Result};

/// Quote character wrapped around an entry's value on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    /// Bare value
    #[default]
    None,

    /// `"value"`
    Double,

    /// `'value'`
    Single,
}

impl QuoteStyle {
    /// The quote character as written to disk (empty for `None`)
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStyle::None => "",
            QuoteStyle::Double => "\"",
            QuoteStyle::Single => "'",
        }
    }
}

/// A key-value line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
    pub quote: QuoteStyle,
}

impl Entry {
    /// Create a new unquoted entry, rejecting an empty key
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(KvfError::EmptyKey);
        }
        Ok(Self {
            key,
            value: value.into(),
            quote: QuoteStyle::None,
        })
    }

    /// Set the quote style used when the entry is written
    pub fn with_quote(mut self, quote: QuoteStyle) -> Self {
        self.quote = quote;
        self
    }

    /// Serialize as `key=<q>value<q>\n`
    pub fn to_line(&self) -> String {
        let q = self.quote.as_str();
        format!("{}={}{}{}\n", self.key, q, self.value, q)
    }
}

/// One logical line of a store file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// Empty or whitespace-only line
    Blank,

    /// `#` line; holds the text after the markers
    Comment(String),

    /// `key=value` line
    Entry(Entry),
}

impl Record {
    /// Serialize the record back to a single newline-terminated line
    pub fn to_line(&self) -> String {
        match self {
            Record::Blank => "\n".to_string(),
            Record::Comment(text) if text.is_empty() => "#\n".to_string(),
            Record::Comment(text) => format!("# {}\n", text),
            Record::Entry(entry) => entry.to_line(),
        }
    }

    /// The entry, if this record is one
    pub fn as_entry(&self) -> Option<&Entry> {
        match self {
            Record::Entry(entry) => Some(entry),
            _ => None,
        }
    }

    /// The key, if this record is an entry
    pub fn key(&self) -> Option<&str> {
        self.as_entry().map(|entry| entry.key.as_str())
    }
}

impl From<Entry> for Record {
    fn from(entry: Entry) -> Self {
        Record::Entry(entry)
    }
}
