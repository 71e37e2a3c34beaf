//! Lock Module
//!
//! Cross-process exclusive locks keyed by target file path.
//!
//! ## Responsibilities
//! - Map a target path to a stable companion lock file
//! - Acquire an exclusive advisory lock with bounded exponential backoff
//! - Release the lock on every exit path (RAII guard)
//!
//! ## Layout
//! ```text
//!   target: /etc/app/secrets.env
//!              │
//!              │ crc32(absolute path)
//!              ▼
//!   {lock_dir}/2902351862.lock   ◄── flock / LockFileEx held here
//! ```
//!
//! The target file itself is never locked, so rewriting or truncating it
//! cannot interfere with lock state. Locks are advisory: only processes
//! going through [`LockManager`] are excluded.
//!
//! Two different paths whose hashes collide share one lock file. This only
//! costs some extra serialization and is accepted.

mod guard;
mod manager;

pub use guard::FileLock;
pub use manager::{lock_id, LockManager};
