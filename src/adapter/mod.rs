//! Adapter Module
//!
//! Lock-guarded, line-oriented access to one target file.
//!
//! ## Responsibilities
//! - Stream a file's lines to a visitor while holding its lock
//! - Run read → mutate → write as a single critical section
//! - Never leave stale bytes past the new end of file
//!
//! ## Update Critical Section
//! ```text
//!  acquire lock ─► open/create ─► read_line* ─► mutate ─► write_to(buffer)
//!                                                              │
//!  release lock ◄── sync ◄── set_len(buffer.len) ◄── write ◄── rewind
//! ```
//!
//! The new content is serialized into memory before the file is touched,
//! so a failing transaction leaves the old content in place. The file is
//! rewritten in place (not replaced via rename) and keeps its identity.

mod file;
mod transaction;

pub use file::FileAdapter;
pub use transaction::UpdateTransaction;
