//! User record store.
//!
//! # Data Flow
//! ```text
//! data.json (key → record)
//!     → records.rs (wholesale read + parse)
//!     → RecordStore snapshot (per request, never cached)
//!     → validation stage (email lookups)
//! ```
//!
//! # Design Decisions
//! - Read-only: nothing in the service writes the store
//! - I/O failures and parse failures are distinct errors
//! - Blocking and async reads share the same parser

pub mod records;

pub use records::{FileRecordSource, RecordSource, RecordStore, StoreError, UserRecord};
