//! Core data types for the record layer.
//!
//! A record is a JSON object stored as a raw string under a canonical
//! UUID key. The only shape the store relies on is the
//! `demographics.name` path, extracted when building list summaries;
//! everything else is carried through untouched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, RosterError};

/// Canonical-form record key.
///
/// Only the canonical textual UUID form is accepted: 32 lowercase hex
/// digits grouped 8-4-4-4-12 with hyphens. Braced, simple, URN and
/// uppercase renderings are rejected, so keys that do not follow the
/// convention (configuration blobs sharing the namespace, for example)
/// never masquerade as records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordKey(Uuid);

impl RecordKey {
    /// Parse a key, accepting only the canonical form.
    ///
    /// # Errors
    ///
    /// Returns `RosterError::InvalidKey` if `raw` is not a lowercase
    /// hyphenated UUID.
    pub fn parse(raw: &str) -> Result<Self> {
        let uuid = Uuid::try_parse(raw)
            .map_err(|e| RosterError::InvalidKey(format!("{}: {}", raw, e)))?;
        // Uuid::try_parse is permissive; demand the exact canonical rendering.
        if raw != uuid.as_hyphenated().to_string() {
            return Err(RosterError::InvalidKey(format!(
                "{}: not in canonical lowercase hyphenated form",
                raw
            )));
        }
        Ok(Self(uuid))
    }

    /// Whether `raw` is a canonical-form key.
    pub fn matches(raw: &str) -> bool {
        Self::parse(raw).is_ok()
    }

    /// Generate a fresh random key.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.as_hyphenated().fmt(f)
    }
}

impl FromStr for RecordKey {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RecordKey {
    type Error = RosterError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<RecordKey> for String {
    fn from(key: RecordKey) -> Self {
        key.to_string()
    }
}

/// Demographic fields of a record.
///
/// Only `name` is required; any other demographic fields are preserved
/// through the flattened map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    /// Display name used for list summaries
    pub name: String,

    /// Remaining demographic fields, passed through unvalidated
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A parsed record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Demographic block; the only part the store inspects
    pub demographics: Demographics,

    /// Remaining top-level fields, passed through unvalidated
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Parse a raw stored string into a typed record.
///
/// # Errors
///
/// Returns `RosterError::Malformed` if the string is not valid JSON or
/// the `demographics.name` path is absent.
pub fn parse_record(raw: &str) -> Result<Record> {
    let record: Record = serde_json::from_str(raw)?;
    Ok(record)
}

/// Derived (key, name) pair used to populate list views without
/// loading full records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Record key
    pub key: RecordKey,

    /// Value of `demographics.name` at enumeration time
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_key() {
        let key = RecordKey::parse("11111111-1111-1111-1111-111111111111").unwrap();
        assert_eq!(key.to_string(), "11111111-1111-1111-1111-111111111111");
    }

    #[test]
    fn test_reject_uppercase_key() {
        assert!(RecordKey::parse("11111111-1111-1111-1111-11111111111A").is_err());
    }

    #[test]
    fn test_reject_simple_form() {
        assert!(RecordKey::parse("11111111111111111111111111111111").is_err());
    }

    #[test]
    fn test_reject_braced_and_urn_forms() {
        assert!(RecordKey::parse("{11111111-1111-1111-1111-111111111111}").is_err());
        assert!(RecordKey::parse("urn:uuid:11111111-1111-1111-1111-111111111111").is_err());
    }

    #[test]
    fn test_reject_non_uuid_key() {
        assert!(!RecordKey::matches("config"));
        assert!(!RecordKey::matches(""));
    }

    #[test]
    fn test_generated_key_is_canonical() {
        let key = RecordKey::generate();
        assert!(RecordKey::matches(&key.to_string()));
    }

    #[test]
    fn test_parse_record_extracts_name() {
        let record = parse_record(r#"{"demographics":{"name":"Ada","age":36},"notes":[]}"#)
            .expect("record should parse");
        assert_eq!(record.demographics.name, "Ada");
        assert_eq!(record.demographics.extra["age"], 36);
        assert!(record.extra.contains_key("notes"));
    }

    #[test]
    fn test_parse_record_round_trips_extra_fields() {
        let raw = r#"{"demographics":{"name":"Ada"},"visits":[{"date":"2024-01-01"}]}"#;
        let record = parse_record(raw).unwrap();
        let reserialized = serde_json::to_string(&record).unwrap();
        let reparsed = parse_record(&reserialized).unwrap();
        assert_eq!(record, reparsed);
    }

    #[test]
    fn test_parse_record_rejects_invalid_json() {
        assert!(parse_record("not json").is_err());
    }

    #[test]
    fn test_parse_record_rejects_missing_name() {
        assert!(parse_record(r#"{"demographics":{}}"#).is_err());
        assert!(parse_record(r#"{"name":"Ada"}"#).is_err());
    }

    #[test]
    fn test_key_serde_uses_string_form() {
        let key: RecordKey =
            serde_json::from_str(r#""11111111-1111-1111-1111-111111111111""#).unwrap();
        assert_eq!(
            serde_json::to_string(&key).unwrap(),
            r#""11111111-1111-1111-1111-111111111111""#
        );
        // Non-canonical forms are rejected on the wire too.
        assert!(serde_json::from_str::<RecordKey>(
            r#""11111111111111111111111111111111""#
        )
        .is_err());
    }
}
