//! RocksDB-backed key store.

use crate::{
    column_families::all_column_families,
    errors::{Result, StorageError},
    traits::{deserialize_value, serialize_key, serialize_value, Batch, Storage},
};
use async_trait::async_trait;
use rocksdb::{Direction, IteratorMode, Options, WriteBatch, DB};
use serde::{de::DeserializeOwned, Serialize};
use std::{path::Path, sync::Arc};
use tempfile::TempDir;
use tracing::debug;

/// Registry key store over a single RocksDB instance
pub struct RocksDbStorage {
    db: Arc<DB>,
}

impl RocksDbStorage {
    /// Open (or create) the key store rooted at `path`, with every registry
    /// column family present.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let db = DB::open_cf(&opts, &path, all_column_families())?;
        debug!(path = %path.as_ref().display(), "Key store opened");

        Ok(Self { db: Arc::new(db) })
    }

    /// Open a database in a fresh temporary directory
    ///
    /// The directory is removed when the returned [`TempDir`] is dropped, so
    /// callers must keep it alive as long as the storage is in use.
    pub fn open_temporary() -> Result<(Self, TempDir)> {
        let temp_dir = TempDir::new()?;
        let storage = Self::open(temp_dir.path())?;
        Ok((storage, temp_dir))
    }

    fn cf_handle(&self, cf: &str) -> Result<&rocksdb::ColumnFamily> {
        column_family(&self.db, cf)
    }

    /// Iterate raw entries whose key starts with `prefix_bytes`
    fn scan_prefix(&self, cf: &str, prefix_bytes: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let cf_handle = self.cf_handle(cf)?;
        let iter = self
            .db
            .iterator_cf(cf_handle, IteratorMode::From(prefix_bytes, Direction::Forward));

        let mut entries = Vec::new();
        for item in iter {
            let (key, value) = item?;

            // Keys are sorted, so the first key without the prefix ends the scan
            if !key.starts_with(prefix_bytes) {
                break;
            }
            entries.push((key.to_vec(), value.to_vec()));
        }

        Ok(entries)
    }
}

#[async_trait]
impl Storage for RocksDbStorage {
    async fn get<K, V>(&self, cf: &str, key: &K) -> Result<Option<V>>
    where
        K: Serialize + Send + Sync,
        V: DeserializeOwned,
    {
        let cf_handle = self.cf_handle(cf)?;
        let key_bytes = serialize_key(key)?;

        match self.db.get_pinned_cf(cf_handle, key_bytes)? {
            Some(bytes) => deserialize_value(&bytes).map(Some),
            None => Ok(None),
        }
    }

    async fn put<K, V>(&self, cf: &str, key: &K, value: &V) -> Result<()>
    where
        K: Serialize + Send + Sync,
        V: Serialize + Send + Sync,
    {
        let encoded = serialize_value(value)?;
        self.db
            .put_cf(self.cf_handle(cf)?, serialize_key(key)?, encoded)?;
        Ok(())
    }

    async fn delete<K>(&self, cf: &str, key: &K) -> Result<()>
    where
        K: Serialize + Send + Sync,
    {
        self.db.delete_cf(self.cf_handle(cf)?, serialize_key(key)?)?;
        Ok(())
    }

    async fn exists<K>(&self, cf: &str, key: &K) -> Result<bool>
    where
        K: Serialize + Send + Sync,
    {
        let cf_handle = self.cf_handle(cf)?;
        let key_bytes = serialize_key(key)?;

        Ok(self.db.get_pinned_cf(cf_handle, key_bytes)?.is_some())
    }

    async fn get_by_prefix<K, V>(&self, cf: &str, prefix: &K) -> Result<Vec<(Vec<u8>, V)>>
    where
        K: Serialize + Send + Sync,
        V: DeserializeOwned,
    {
        let prefix_bytes = serialize_key(prefix)?;

        self.scan_prefix(cf, &prefix_bytes)?
            .into_iter()
            .map(|(key, value)| Ok((key, deserialize_value(&value)?)))
            .collect()
    }

    async fn keys_by_prefix<K>(&self, cf: &str, prefix: &K) -> Result<Vec<Vec<u8>>>
    where
        K: Serialize + Send + Sync,
    {
        let prefix_bytes = serialize_key(prefix)?;

        Ok(self
            .scan_prefix(cf, &prefix_bytes)?
            .into_iter()
            .map(|(key, _)| key)
            .collect())
    }

    fn batch(&self) -> Box<dyn Batch> {
        Box::new(RocksDbBatch {
            db: Arc::clone(&self.db),
            write_batch: WriteBatch::default(),
        })
    }
}

fn column_family<'a>(db: &'a DB, cf: &str) -> Result<&'a rocksdb::ColumnFamily> {
    db.cf_handle(cf)
        .ok_or_else(|| StorageError::UnknownColumnFamily(cf.to_owned()))
}

/// Staged writes applied by one `DB::write` on commit
pub struct RocksDbBatch {
    db: Arc<DB>,
    write_batch: WriteBatch,
}

#[async_trait]
impl Batch for RocksDbBatch {
    fn put_raw(&mut self, cf: &str, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        let handle = column_family(&self.db, cf)?;
        self.write_batch.put_cf(handle, key, value);
        Ok(())
    }

    fn delete_raw(&mut self, cf: &str, key: Vec<u8>) -> Result<()> {
        let handle = column_family(&self.db, cf)?;
        self.write_batch.delete_cf(handle, key);
        Ok(())
    }

    fn len(&self) -> usize {
        self.write_batch.len()
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let operations = self.write_batch.len();
        self.db
            .write(self.write_batch)
            .map_err(|e| StorageError::CommitFailed(e.to_string()))?;

        debug!(operations, "Batch committed");
        Ok(())
    }

    fn rollback(self: Box<Self>) {
        debug!(operations = self.write_batch.len(), "Batch rolled back");
    }
}
