/// Storage layer for persisting tracker state
///
/// State is kept as independently (de)serializable JSON documents under fixed
/// keys. The SQLite implementation provides the key/value table; the
/// `documents` module maps domain types to and from their persisted shape.

pub mod documents;
pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use sqlite::*;

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stored document '{key}' has an unexpected shape: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the document storage interface
///
/// Values are opaque JSON text. `put_many` must apply all writes or none.
pub trait DocumentStore {
    /// Read the raw document stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the document stored under `key`
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.put_many(&[(key, value)])
    }

    /// Replace several documents in one atomic write
    fn put_many(&self, entries: &[(&str, &str)]) -> Result<(), StorageError>;
}
