//! Typed key-value access to the registry key store.

use crate::errors::{Result, StorageError};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

/// Column-family keyed store shared by every registry service
///
/// Keys and values are serialized with bincode. Composite keys are tuples;
/// because bincode writes tuple fields back to back, serializing the leading
/// field alone yields a byte prefix of every composite key that starts with it.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read one record; `Ok(None)` when the key is absent
    async fn get<K, V>(&self, cf: &str, key: &K) -> Result<Option<V>>
    where
        K: Serialize + Send + Sync,
        V: DeserializeOwned;

    /// Overwrite the record at `key`
    async fn put<K, V>(&self, cf: &str, key: &K, value: &V) -> Result<()>
    where
        K: Serialize + Send + Sync,
        V: Serialize + Send + Sync;

    async fn delete<K>(&self, cf: &str, key: &K) -> Result<()>
    where
        K: Serialize + Send + Sync;

    async fn exists<K>(&self, cf: &str, key: &K) -> Result<bool>
    where
        K: Serialize + Send + Sync;

    /// Get all key-value pairs whose key starts with the serialized prefix
    ///
    /// Results are in ascending raw key order.
    async fn get_by_prefix<K, V>(&self, cf: &str, prefix: &K) -> Result<Vec<(Vec<u8>, V)>>
    where
        K: Serialize + Send + Sync,
        V: DeserializeOwned;

    /// Get the raw keys that start with the serialized prefix
    ///
    /// Used to stage cascading deletes into a [`Batch`].
    async fn keys_by_prefix<K>(&self, cf: &str, prefix: &K) -> Result<Vec<Vec<u8>>>
    where
        K: Serialize + Send + Sync;

    /// Start an empty write batch
    fn batch(&self) -> Box<dyn Batch>;
}

/// Writes staged for a single atomic commit
///
/// All staged writes become visible together on [`Batch::commit`], or not at
/// all. Works with pre-serialized bytes to stay object safe; see [`BatchExt`]
/// for typed helpers.
#[async_trait]
pub trait Batch: Send {
    /// Stage an encoded put
    fn put_raw(&mut self, cf: &str, key: Vec<u8>, value: Vec<u8>) -> Result<()>;

    /// Stage an encoded delete
    fn delete_raw(&mut self, cf: &str, key: Vec<u8>) -> Result<()>;

    /// Number of staged operations
    fn len(&self) -> usize;

    /// Whether nothing has been staged
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply every staged write, or none of them
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Discard the staged writes
    fn rollback(self: Box<Self>);
}

/// Typed staging on top of [`Batch`]
pub trait BatchExt: Batch {
    fn put<K, V>(&mut self, cf: &str, key: &K, value: &V) -> Result<()>
    where
        K: Serialize,
        V: Serialize,
    {
        self.put_raw(cf, serialize_key(key)?, serialize_value(value)?)
    }

    fn delete<K>(&mut self, cf: &str, key: &K) -> Result<()>
    where
        K: Serialize,
    {
        self.delete_raw(cf, serialize_key(key)?)
    }
}

impl<T: Batch + ?Sized> BatchExt for T {}

/// Serialize a key
pub fn serialize_key<K: Serialize + ?Sized>(key: &K) -> Result<Vec<u8>> {
    bincode::serialize(key).map_err(|e| StorageError::Encode(e.to_string()))
}

/// Serialize a value
pub fn serialize_value<V: Serialize + ?Sized>(value: &V) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| StorageError::Encode(e.to_string()))
}

/// Deserialize a value
pub fn deserialize_value<V: DeserializeOwned>(bytes: &[u8]) -> Result<V> {
    bincode::deserialize(bytes).map_err(|e| StorageError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_field_is_key_prefix() {
        let leading = serialize_key(&("tenant-a".to_string(), 7u64)).unwrap();
        let prefix = serialize_key(&"tenant-a".to_string()).unwrap();
        assert!(leading.starts_with(&prefix));
    }

    #[test]
    fn test_value_round_trip() {
        let bytes = serialize_value(&vec![1u8, 2, 3]).unwrap();
        let value: Vec<u8> = deserialize_value(&bytes).unwrap();
        assert_eq!(value, vec![1, 2, 3]);
    }

    #[test]
    fn test_deserialize_garbage() {
        let result: Result<String> = deserialize_value(&[0xff]);
        assert!(matches!(result, Err(StorageError::Decode(_))));
    }
}
