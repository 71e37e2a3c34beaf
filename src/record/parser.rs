//! Line parser
//!
//! Turns one line of text into a [`Record`].

use crate::error::{KvfError, Result};

use super::{Entry, QuoteStyle, Record};

/// Parse a single line (with or without its terminator)
///
/// Surrounding whitespace is trimmed first. The split point of an entry is
/// the first `=`; later `=` characters belong to the value. An empty key is
/// accepted here, only [`Entry::new`] rejects it.
pub fn parse_line(line: &str) -> Result<Record> {
    let line = line.trim();

    if line.is_empty() {
        return Ok(Record::Blank);
    }

    if line.starts_with('#') {
        let text = line.trim_start_matches('#').trim();
        return Ok(Record::Comment(text.to_string()));
    }

    let (key, value) = line.split_once('=').ok_or_else(|| KvfError::MalformedLine {
        line: line.to_string(),
    })?;

    let (value, quote) = unquote(value.trim());

    Ok(Record::Entry(Entry {
        key: key.trim().to_string(),
        value: value.to_string(),
        quote,
    }))
}

/// Strip one matching pair of `"` or `'` around a value
fn unquote(value: &str) -> (&str, QuoteStyle) {
    for (ch, style) in [('"', QuoteStyle::Double), ('\'', QuoteStyle::Single)] {
        // A lone quote character is a bare value, not an empty quoted one
        if value.len() >= 2 && value.starts_with(ch) && value.ends_with(ch) {
            return (&value[1..value.len() - 1], style);
        }
    }
    (value, QuoteStyle::None)
}
