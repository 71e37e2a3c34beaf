//! # kvf
//!
//! A flat-file key-value store for configuration and secrets with:
//! - Comment, blank line, and quote-style preserving updates
//! - Cross-process exclusive locking through companion lock files
//! - Read-modify-write that never leaves stale bytes behind
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      kvf CLI / callers                       │
//! │                 (many concurrent processes)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Repository                               │
//! │              get / find / set (upsert)                       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌──────────────┐
//!   │   Record    │          │ FileAdapter  │
//!   │ parse/line  │          │ read/update  │
//!   └─────────────┘          └──────┬───────┘
//!                                   │
//!                                   ▼
//!                           ┌──────────────┐
//!                           │ LockManager  │
//!                           │ {dir}/N.lock │
//!                           └──────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod lock;
pub mod adapter;
pub mod repository;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvfError, Result};
pub use config::{Config, LockRetryPolicy};
pub use record::{Entry, QuoteStyle, Record, RecordCollection};
pub use repository::{ReadMode, Repository};
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kvf
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
