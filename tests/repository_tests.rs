//! Tests for the keyed repository
//!
//! These tests verify:
//! - get / find lookups, including quotes and defaults
//! - Upsert keeps position, quotes, comments, and blank lines
//! - No stale bytes after shrinking a value
//! - Missing-file handling per read mode
//! - Malformed files fail the whole read

use std::fs;
use std::path::{Path, PathBuf};

use kvf::{Config, Entry, KvfError, QuoteStyle, ReadMode, Repository, Store};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

const SAMPLE: &str = "key1=value1
key2=\"value2\"

# This is a comment

key3='value3'
";

fn setup_store() -> (TempDir, Store) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .lock_dir(temp_dir.path().join("locks"))
        .build();
    let store = Store::open(config).unwrap();
    (temp_dir, store)
}

fn setup_repo(content: &str) -> (TempDir, Repository, PathBuf) {
    let (temp, store) = setup_store();
    let path = temp.path().join("store.env");
    fs::write(&path, content).unwrap();
    let repo = store.repository(&path);
    (temp, repo, path)
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

// =============================================================================
// Lookup Tests
// =============================================================================

#[test]
fn test_get_values_with_every_quote_style() {
    let (_temp, repo, _path) = setup_repo(SAMPLE);

    let plain = repo.get("key1").unwrap();
    assert_eq!(plain.value, "value1");
    assert_eq!(plain.quote, QuoteStyle::None);

    let double = repo.get("key2").unwrap();
    assert_eq!(double.value, "value2");
    assert_eq!(double.quote, QuoteStyle::Double);

    let single = repo.get("key3").unwrap();
    assert_eq!(single.value, "value3");
    assert_eq!(single.quote, QuoteStyle::Single);
}

#[test]
fn test_get_missing_key() {
    let (_temp, repo, _path) = setup_repo(SAMPLE);

    let err = repo.get("missing").unwrap_err();

    assert!(err.is_key_not_found());
    assert_eq!(err.to_string(), "key not found: missing");
}

#[test]
fn test_get_empty_key_fails_before_io() {
    let (temp, store) = setup_store();
    let repo = store.repository(temp.path().join("does-not-exist.env"));

    assert!(matches!(repo.get("").unwrap_err(), KvfError::EmptyKey));
    assert!(matches!(repo.find("", "x").unwrap_err(), KvfError::EmptyKey));
}

#[test]
fn test_get_ignores_commented_out_key() {
    let (_temp, repo, _path) = setup_repo("# secret=hidden\n");
    assert!(repo.get("secret").unwrap_err().is_key_not_found());
}

#[test]
fn test_get_returns_first_duplicate() {
    let (_temp, repo, _path) = setup_repo("dup=first\ndup=second\n");
    assert_eq!(repo.get("dup").unwrap().value, "first");
}

#[test]
fn test_find_existing_key_ignores_default() {
    let (_temp, repo, _path) = setup_repo(SAMPLE);
    assert_eq!(repo.find("key1", "fallback").unwrap().value, "value1");
}

#[test]
fn test_find_missing_key_returns_default_without_writing() {
    let (_temp, repo, path) = setup_repo(SAMPLE);

    let entry = repo.find("missing", "fallback").unwrap();

    assert_eq!(entry, Entry::new("missing", "fallback").unwrap());
    assert_eq!(read(&path), SAMPLE);
}

#[test]
fn test_malformed_file_fails_every_read() {
    let (_temp, repo, _path) = setup_repo("key1=value1\nkey2\nkey3='value3'\n");

    for err in [
        repo.get("key1").unwrap_err(),
        repo.find("key1", "x").unwrap_err(),
        repo.records().unwrap_err(),
    ] {
        assert_eq!(err.to_string(), "invalid line: key2");
    }
}

#[test]
fn test_malformed_file_rejects_set() {
    let (_temp, repo, path) = setup_repo("key1=value1\nkey2\n");

    let err = repo.set_value("key1", "changed").unwrap_err();

    assert!(matches!(err, KvfError::MalformedLine { .. }));
    assert_eq!(read(&path), "key1=value1\nkey2\n");
}

// =============================================================================
// Upsert Tests
// =============================================================================

#[test]
fn test_set_creates_file() {
    let (temp, store) = setup_store();
    let path = temp.path().join("new.env");

    store.repository(&path).set_value("key2", "value2").unwrap();

    assert_eq!(read(&path), "key2=value2\n");
}

#[test]
fn test_set_preserves_structure_and_quote() {
    let (_temp, repo, path) = setup_repo("key1=value1\n\n# comment\n\nkey2='value2'\n\n");

    repo.set(Entry::new("key2", "value333").unwrap()).unwrap();

    assert_eq!(read(&path), "key1=value1\n\n# comment\n\nkey2='value333'\n\n");
}

#[test]
fn test_set_appends_missing_key_after_trailing_blanks() {
    let (_temp, repo, path) = setup_repo("key1=value1\n\n");

    repo.set_value("key9", "v9").unwrap();

    assert_eq!(read(&path), "key1=value1\n\nkey9=v9\n");
}

#[test]
fn test_set_shorter_value_leaves_no_stale_bytes() {
    let (_temp, repo, path) = setup_repo("key=\"foo bar\"\n");

    repo.set_value("key", "foo").unwrap();

    assert_eq!(fs::read(&path).unwrap(), b"key=\"foo\"\n");
}

#[test]
fn test_repeated_sets_keep_single_line() {
    let (_temp, repo, path) = setup_repo("");

    for value in ["first value", "second", "a much longer third value", "4"] {
        repo.set_value("key", value).unwrap();
    }

    assert_eq!(read(&path), "key=4\n");
}

#[test]
fn test_override_value() {
    let (_temp, repo, path) = setup_repo("");

    repo.set_value("key", "first value").unwrap();
    assert_eq!(read(&path).trim(), "key=first value");

    repo.set_value("key", "second value").unwrap();
    assert_eq!(read(&path).trim(), "key=second value");
}

#[test]
fn test_set_updates_only_first_duplicate() {
    let (_temp, repo, path) = setup_repo("dup=1\nother=x\ndup=2\n");

    repo.set_value("dup", "new").unwrap();

    assert_eq!(read(&path), "dup=new\nother=x\ndup=2\n");
}

#[test]
fn test_set_normalizes_whitespace_but_keeps_content() {
    let (_temp, repo, path) = setup_repo("  a =  1 \n   #   note  \n   \n");

    repo.set_value("b", "2").unwrap();

    assert_eq!(read(&path), "a=1\n# note\n\nb=2\n");
}

#[test]
fn test_set_then_get() {
    let (_temp, repo, _path) = setup_repo(SAMPLE);

    repo.set_value("key3", "new=value").unwrap();

    let entry = repo.get("key3").unwrap();
    assert_eq!(entry.value, "new=value");
    assert_eq!(entry.quote, QuoteStyle::Single);
}

#[test]
fn test_set_rejects_empty_key() {
    let (_temp, repo, path) = setup_repo(SAMPLE);
    let entry = Entry {
        key: String::new(),
        value: "v".to_string(),
        quote: QuoteStyle::None,
    };

    assert!(matches!(repo.set(entry).unwrap_err(), KvfError::EmptyKey));
    assert!(matches!(repo.set_value("", "v").unwrap_err(), KvfError::EmptyKey));
    assert_eq!(read(&path), SAMPLE);
}

// =============================================================================
// Read Mode Tests
// =============================================================================

#[test]
fn test_strict_mode_missing_file() {
    let (temp, store) = setup_store();
    let repo = store.repository(temp.path().join("missing.env"));

    assert_eq!(repo.read_mode(), ReadMode::Strict);
    assert!(repo.get("key").unwrap_err().is_file_not_found());
    assert!(repo.find("key", "d").unwrap_err().is_file_not_found());
}

#[test]
fn test_skip_missing_mode_reads_as_empty() {
    let (temp, store) = setup_store();
    let path = temp.path().join("missing.env");
    let repo = store.repository_with_mode(&path, ReadMode::SkipMissing);

    assert!(repo.get("key").unwrap_err().is_key_not_found());
    assert_eq!(repo.find("key", "d").unwrap().value, "d");
    assert!(repo.records().unwrap().is_empty());
    assert!(!path.exists());
}

#[test]
fn test_create_mode_creates_empty_file() {
    let (temp, store) = setup_store();
    let path = temp.path().join("missing.env");
    let repo = store.repository_with_mode(&path, ReadMode::Create);

    assert!(repo.get("key").unwrap_err().is_key_not_found());
    assert!(path.exists());
    assert_eq!(read(&path), "");
}

#[test]
fn test_records_keep_file_order() {
    let (_temp, repo, _path) = setup_repo(SAMPLE);

    let records = repo.records().unwrap();
    let keys: Vec<_> = records.entries().map(|e| e.key.as_str()).collect();

    assert_eq!(records.len(), 6);
    assert_eq!(keys, vec!["key1", "key2", "key3"]);
    assert_eq!(records.to_text(), SAMPLE);
}
