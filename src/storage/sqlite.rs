/// SQLite implementation of the document storage interface
///
/// This module provides the concrete SQLite key/value table used to persist
/// the profile, the habit list and the smoke-free days.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::storage::{migrations, DocumentStore, StorageError};

/// SQLite-based storage implementation
///
/// The connection sits behind a mutex so one handle can be shared between
/// threads; every operation holds the lock for its whole duration.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open (or create) a database file and bring its schema up to date
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::from_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// In-memory database, mostly useful for tests
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        migrations::initialize_database(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Connection("Database lock poisoned".to_string()))
    }
}

impl DocumentStore for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM documents WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put_many(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let now = Utc::now().to_rfc3339();

        for (key, value) in entries {
            tx.execute(
                "INSERT INTO documents (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE
                 SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, now],
            )?;
        }
        tx.commit()?;

        tracing::debug!("Persisted {} document(s)", entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_put_and_get() {
        let storage = SqliteStorage::open_in_memory().unwrap();

        assert_eq!(storage.get("habits").unwrap(), None);

        storage.put("habits", "[]").unwrap();
        assert_eq!(storage.get("habits").unwrap().as_deref(), Some("[]"));

        storage.put("habits", "[1]").unwrap();
        assert_eq!(storage.get("habits").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_put_many_writes_every_entry() {
        let storage = SqliteStorage::open_in_memory().unwrap();

        storage
            .put_many(&[("userProfile", "{}"), ("smokingFreeDays", "[]")])
            .unwrap();
        assert_eq!(storage.get("userProfile").unwrap().as_deref(), Some("{}"));
        assert_eq!(storage.get("smokingFreeDays").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_documents_survive_reopen() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("tracker.db");

        {
            let storage = SqliteStorage::new(&db_path).unwrap();
            storage.put("smokingFreeDays", "[\"2026-10-19T00:00:00Z\"]").unwrap();
        }

        let storage = SqliteStorage::new(&db_path).unwrap();
        assert_eq!(
            storage.get("smokingFreeDays").unwrap().as_deref(),
            Some("[\"2026-10-19T00:00:00Z\"]")
        );
    }
}
