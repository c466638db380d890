//! Failures surfaced by the key store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// RocksDB rejected a read, write or open
    #[error("backend failure: {0}")]
    Backend(String),

    #[error("cannot encode record: {0}")]
    Encode(String),

    /// Stored bytes no longer match the record layout
    #[error("cannot decode record: {0}")]
    Decode(String),

    #[error("no such column family: {0}")]
    UnknownColumnFamily(String),

    /// Batch commit failed; nothing in the batch was written
    #[error("commit failed: {0}")]
    CommitFailed(String),

    #[error("filesystem: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rocksdb::Error> for StorageError {
    fn from(err: rocksdb::Error) -> Self {
        StorageError::Backend(err.into_string())
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
