//! # Roster Core
//!
//! Core library for Roster - a keyed record store with a ports-style
//! request/response bridge.
//!
//! This crate provides the storage abstraction, the record data model
//! and the bridge adapter, independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **store**: Record store trait and backends (in-memory, SQLite)
//! - **record**: Record keys, typed record parsing, list summaries
//! - **bridge**: Request/response adapter between a UI-facing caller
//!   and the store
//!
//! Records are JSON strings filed under canonical lowercase UUID keys.
//! Keys outside that form cohabit in the same namespace but never show
//! up in summary enumeration.

pub mod bridge;
pub mod error;
pub mod record;
pub mod store;

pub use bridge::{Bridge, DialogHost, NullDialogHost, Outbound, Request, Response};
pub use error::{Result, RosterError};
pub use record::{parse_record, Record, RecordKey, Summary};
pub use store::{MemoryStore, RecordStore, SqliteStore};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
