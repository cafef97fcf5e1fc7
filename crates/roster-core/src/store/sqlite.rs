//! SQLite-backed record store.
//!
//! Persists the flat namespace as a single `records` table in a SQLite
//! file, alongside a small `meta` table describing the store itself.
//! Values are stored verbatim; the schema knows nothing about record
//! shape, so record keys and unrelated keys cohabit freely.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};

use crate::error::{Result, RosterError};
use crate::store::traits::RecordStore;

/// Metadata for a store file.
#[derive(Debug, Clone)]
pub struct StoreMetadata {
    /// Format version (e.g., "0.1")
    pub format_version: String,

    /// When this store was created
    pub created_at: DateTime<Utc>,
}

/// SQLite-backed store persisted at a filesystem path.
pub struct SqliteStore {
    #[allow(dead_code)]
    path: PathBuf,
    conn: Connection,
}

impl SqliteStore {
    const FORMAT_VERSION: &'static str = "0.1";

    fn sqlite_error(err: rusqlite::Error) -> RosterError {
        RosterError::Storage(format!("SQLite error: {}", err))
    }

    /// Open the store at `path`, creating the file and schema on first use.
    ///
    /// # Errors
    ///
    /// Returns `RosterError::Storage` if the file cannot be opened or
    /// the schema cannot be initialized.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(Self::sqlite_error)?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS records (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )
        .map_err(Self::sqlite_error)?;

        // First open stamps the store; reopens leave the stamp alone.
        let created_at = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT OR IGNORE INTO meta (key, value) VALUES (?, ?)",
            ["format_version", Self::FORMAT_VERSION],
        )
        .map_err(Self::sqlite_error)?;
        conn.execute(
            "INSERT OR IGNORE INTO meta (key, value) VALUES (?, ?)",
            ["created_at", &created_at],
        )
        .map_err(Self::sqlite_error)?;

        Ok(Self {
            path: path.to_path_buf(),
            conn,
        })
    }

    /// Get store metadata.
    pub fn metadata(&self) -> Result<StoreMetadata> {
        let format_version: String = self
            .conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'format_version'",
                [],
                |row| row.get(0),
            )
            .map_err(Self::sqlite_error)?;

        let created_at_str: String = self
            .conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'created_at'",
                [],
                |row| row.get(0),
            )
            .map_err(Self::sqlite_error)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| RosterError::Storage(format!("Invalid created_at timestamp: {}", e)))?
            .with_timezone(&Utc);

        Ok(StoreMetadata {
            format_version,
            created_at,
        })
    }

    /// Check store integrity.
    ///
    /// Verifies the SQLite file passes `quick_check` and the metadata
    /// table carries its required keys.
    ///
    /// # Errors
    ///
    /// Returns `RosterError::Storage` describing the first problem found.
    pub fn check_integrity(&self) -> Result<()> {
        let check: String = self
            .conn
            .query_row("PRAGMA quick_check", [], |row| row.get(0))
            .map_err(Self::sqlite_error)?;
        if check != "ok" {
            return Err(RosterError::Storage(format!(
                "SQLite quick_check failed: {}",
                check
            )));
        }

        let metadata_count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM meta WHERE key IN ('format_version', 'created_at')",
                [],
                |row| row.get(0),
            )
            .map_err(Self::sqlite_error)?;
        if metadata_count < 2 {
            return Err(RosterError::Storage(
                "Metadata table missing required keys".to_string(),
            ));
        }

        Ok(())
    }
}

impl RecordStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM records WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(Self::sqlite_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO records (key, value) VALUES (?, ?)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value
                "#,
                [key, value],
            )
            .map_err(Self::sqlite_error)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM records WHERE key = ?", [key])
            .map_err(Self::sqlite_error)?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM records")
            .map_err(Self::sqlite_error)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(Self::sqlite_error)?;

        let mut keys = Vec::new();
        for row in rows {
            keys.push(row.map_err(Self::sqlite_error)?);
        }
        Ok(keys)
    }
}
