use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::app_dirs::AppDirs;

/// Keys written by the program. Values are plain strings.
pub mod keys {
    pub const WORKOUT_PROGRESS: &str = "workoutProgress";
    pub const DAY_PROGRESS: &str = "dayProgress";
    pub const WEEK_PROGRESS: &str = "weekProgress";
    pub const IS_WORKOUT_DONE: &str = "isWorkoutDone";
    pub const DAILY_CHANGE: &str = "dailyChange";
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create store directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Flat string key-value persistence
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Key-value store in a single SQLite table
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the store at its default location
    pub fn open_default() -> Result<Self, StoreError> {
        let path = AppDirs::store_path().unwrap_or_else(|| PathBuf::from("luminate_progress.db"));
        Self::open(path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened progress store");
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;

        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            r#"
            INSERT INTO kv (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn set_get_remove() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get(keys::DAY_PROGRESS).unwrap(), None);

        store.set(keys::DAY_PROGRESS, "3").unwrap();
        assert_eq!(store.get(keys::DAY_PROGRESS).unwrap().as_deref(), Some("3"));

        store.set(keys::DAY_PROGRESS, "4").unwrap();
        assert_eq!(store.get(keys::DAY_PROGRESS).unwrap().as_deref(), Some("4"));

        store.remove(keys::DAY_PROGRESS).unwrap();
        assert_eq!(store.get(keys::DAY_PROGRESS).unwrap(), None);
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("progress.db");

        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.set(keys::IS_WORKOUT_DONE, "Yes").unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(
            store.get(keys::IS_WORKOUT_DONE).unwrap().as_deref(),
            Some("Yes")
        );
    }
}
