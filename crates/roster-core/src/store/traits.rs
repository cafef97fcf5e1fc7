//! Record store trait definition.
//!
//! The `RecordStore` trait defines the interface that all storage
//! backends must implement. The store is an injected abstraction over a
//! flat string-keyed namespace; callers never touch the namespace
//! directly, which keeps backends swappable and makes test doubles
//! trivial.

use tracing::warn;

use crate::error::Result;
use crate::record::{parse_record, RecordKey, Summary};

/// Storage interface over a flat string-keyed namespace.
///
/// All implementations must ensure:
/// - `get` returns `Ok(None)` for an absent key, never an error
/// - `set` fully overwrites any existing value
/// - `remove` is idempotent: removing an absent key succeeds
/// - `keys` enumerates every key in the namespace, in no particular order
///
/// The contract is single-threaded and synchronous; implementations are
/// not required to be `Sync`, and callers that introduce sharing must
/// provide their own mutual exclusion.
pub trait RecordStore {
    /// Get the raw stored string for `key`, or `None` if absent.
    ///
    /// No parsing is performed; the value comes back exactly as stored.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, overwriting any existing value.
    ///
    /// The value is a pre-serialized string; its shape is not validated.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete `key` if present. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Every key currently in the namespace, in unspecified order.
    fn keys(&self) -> Result<Vec<String>>;

    /// Enumerate record summaries.
    ///
    /// Scans every key in the namespace, keeps those in canonical
    /// record-key form, parses each value and yields its key paired with
    /// `demographics.name`. Keys outside the canonical form cohabit
    /// silently and are never listed.
    ///
    /// Malformed values (invalid JSON or missing `demographics.name`)
    /// are skipped with a warning naming the offending key, so one
    /// corrupt record cannot blank the entire listing.
    fn list_summaries(&self) -> Result<Vec<Summary>> {
        let mut summaries = Vec::new();
        for raw_key in self.keys()? {
            let key = match RecordKey::parse(&raw_key) {
                Ok(key) => key,
                Err(_) => continue,
            };
            // The key may vanish between keys() and get(); treat that as absent.
            let value = match self.get(&raw_key)? {
                Some(value) => value,
                None => continue,
            };
            match parse_record(&value) {
                Ok(record) => summaries.push(Summary {
                    key,
                    name: record.demographics.name,
                }),
                Err(err) => {
                    warn!(key = %raw_key, error = %err, "skipping malformed record");
                }
            }
        }
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_is_object_safe() {
        fn _accepts_dyn_store(_store: &dyn RecordStore) {}
    }
}
