//! Local persistence for volunteer records.
//!
//! Records live in a flat key-value store, one key per record kind, each
//! value a JSON array of every volunteer's records:
//!
//! ```text
//! <root>/store.sqlite
//!   entries(key, value)
//!     volunteerObservations  [ {..}, {..} ]
//!     volunteerFollowUps     [ {..} ]
//!     volunteerHistoryLogs   [ {..} ]
//! ```
//!
//! Owner filtering happens in memory on every read; see [`Repository`].

#[cfg(test)]
mod memory;
mod repository;

use std::{fs, path::PathBuf};

use rusqlite::{Connection, OptionalExtension};

#[cfg(test)]
pub use memory::MemoryStore;
pub use repository::Repository;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// Opaque string values under string keys.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// `SQLite`-backed key-value store.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Opens (or creates) the store at the given file path.
    ///
    /// Parent directories are created if they don't exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS entries (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
             );",
        )?;
        tracing::debug!(path = %path.display(), "opened store");
        Ok(Self { conn })
    }

    /// Returns the default store path: `~/.elderconnect/store.sqlite`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".elderconnect").join("store.sqlite"))
    }
}

impl KeyValueStore for Storage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM entries WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }
}
