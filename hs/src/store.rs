//! Core Store implementation

use eyre::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::now_ms;
use crate::record::Record;

/// File name of the SQLite database inside the store directory
pub const DB_FILE_NAME: &str = "habitstore.db";

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS entries (
    collection TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (collection, key)
);
";

/// Durable key-value store backing habits, logs and metadata
pub struct Store {
    conn: Connection,
    /// Directory holding the database (None for in-memory stores)
    base_path: Option<PathBuf>,
}

impl Store {
    /// Open or create a store in the given directory
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).context("Failed to create store directory")?;

        let db_path = base_path.join(DB_FILE_NAME);
        let conn = Connection::open(&db_path).context(format!("Failed to open database: {}", db_path.display()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("Failed to apply pragmas")?;

        let store = Self {
            conn,
            base_path: Some(base_path),
        };
        store.apply_schema()?;
        debug!(db_path = %db_path.display(), "Opened habit store");
        Ok(store)
    }

    /// Open a throwaway store that lives only in memory
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        let store = Self { conn, base_path: None };
        store.apply_schema()?;
        Ok(store)
    }

    fn apply_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(SCHEMA_SQL)
            .context("Failed to apply store schema")?;
        Ok(())
    }

    /// Directory the store was opened in
    pub fn base_path(&self) -> Option<&Path> {
        self.base_path.as_deref()
    }

    // === Typed records ===

    /// Insert or replace a record by id
    pub fn put<T: Record>(&mut self, record: &T) -> Result<()> {
        let value = serde_json::to_value(record).context("Failed to serialize record")?;
        self.set_value(T::collection_name(), record.id(), &value)
    }

    /// Fetch a record by id
    pub fn get<T: Record>(&self, id: &str) -> Result<Option<T>> {
        match self.get_value(T::collection_name(), id)? {
            Some(value) => {
                let record = serde_json::from_value(value)
                    .context(format!("Corrupt {} record: {}", T::collection_name(), id))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// List every record of a collection in insertion order, skipping corrupt ones
    pub fn list<T: Record>(&self) -> Result<Vec<T>> {
        let collection = T::collection_name();
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM entries WHERE collection = ?1 ORDER BY rowid")?;
        let rows = stmt.query_map(params![collection], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (key, raw) = row?;
            match serde_json::from_str::<T>(&raw) {
                Ok(record) => records.push(record),
                Err(e) => warn!(collection, %key, error = %e, "Skipping corrupt record"),
            }
        }
        Ok(records)
    }

    /// Delete a record by id, returning whether it existed
    pub fn delete<T: Record>(&mut self, id: &str) -> Result<bool> {
        self.remove(T::collection_name(), id)
    }

    // === Raw key/value access ===

    /// Read a raw value
    pub fn get_value(&self, collection: &str, key: &str) -> Result<Option<Value>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM entries WHERE collection = ?1 AND key = ?2",
                params![collection, key],
                |row| row.get(0),
            )
            .optional()
            .context(format!("Failed to read {}/{}", collection, key))?;

        match raw {
            Some(raw) => {
                let value = serde_json::from_str(&raw).context(format!("Corrupt value at {}/{}", collection, key))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Write a raw value, replacing any previous one
    pub fn set_value(&mut self, collection: &str, key: &str, value: &Value) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.conn
            .execute(
                "INSERT INTO entries (collection, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (collection, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![collection, key, raw, now_ms()],
            )
            .context(format!("Failed to write {}/{}", collection, key))?;
        debug!(collection, key, "set_value: written");
        Ok(())
    }

    /// Remove a raw value, returning whether it existed
    pub fn remove(&mut self, collection: &str, key: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute(
                "DELETE FROM entries WHERE collection = ?1 AND key = ?2",
                params![collection, key],
            )
            .context(format!("Failed to delete {}/{}", collection, key))?;
        if removed > 0 {
            info!(collection, key, "Deleted entry");
        }
        Ok(removed > 0)
    }

    /// Keys of a collection in insertion order
    pub fn keys(&self, collection: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM entries WHERE collection = ?1 ORDER BY rowid")?;
        let keys = stmt
            .query_map(params![collection], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(keys)
    }

    /// Number of entries in a collection
    pub fn count(&self, collection: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM entries WHERE collection = ?1",
            params![collection],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Names of all non-empty collections
    pub fn collections(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT collection FROM entries ORDER BY collection")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }
}
