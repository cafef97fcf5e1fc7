//! Storage backends for the flat record namespace.

mod memory;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, StoreMetadata};
pub use traits::RecordStore;
