//! SQLite-backed timer store.
//!
//! Records live in a single `kv` table keyed by the session storage key,
//! with the record serialized as JSON.

use std::path::Path;

use rusqlite::{params, Connection};

use super::{data_dir, SessionKey, TimerRecord, TimerStore};
use crate::error::{Result, StorageError};

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the store at `<data_dir>/hunt-timer.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened.
    pub fn open() -> Result<Self> {
        let dir = data_dir()?;
        Ok(Self::open_at(&dir.join("hunt-timer.db"))?)
    }

    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

impl TimerStore for SqliteStore {
    fn load(&self, key: &SessionKey) -> Result<Option<TimerRecord>, StorageError> {
        self.kv_get(key.storage_key())?
            .map(|json| TimerRecord::from_json(key, &json))
            .transpose()
    }

    fn save(&self, key: &SessionKey, record: &TimerRecord) -> Result<(), StorageError> {
        self.kv_set(key.storage_key(), &record.to_json(key)?)
    }

    fn remove(&self, key: &SessionKey) -> Result<(), StorageError> {
        self.kv_delete(key.storage_key())
    }
}
