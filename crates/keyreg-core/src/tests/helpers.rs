//! Test helpers for registry service tests.

use crate::*;
use async_trait::async_trait;
use keyreg_crypto::{base64_encode, derive_address, sign_message, Ed25519KeyPair, HashAlgorithm};
use keyreg_storage::{Batch, RocksDbStorage, Storage, StorageError, CF_TENANTS};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

pub const TENANT: &str = "tenant-a";

pub type TestRegistry = RegistryService<RocksDbStorage>;

/// Helper to create test storage
pub fn create_test_storage() -> (Arc<RocksDbStorage>, TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let db = RocksDbStorage::open(temp_dir.path()).unwrap();
    (Arc::new(db), temp_dir)
}

/// Helper to create a registry with the default configuration
pub fn create_test_registry() -> (TestRegistry, TempDir) {
    let (storage, temp_dir) = create_test_storage();
    (RegistryService::new(storage, RegistryConfig::default()), temp_dir)
}

/// Deterministic caller keypair
pub fn caller(seed: u8) -> Ed25519KeyPair {
    Ed25519KeyPair::from_seed(&[seed; 32]).unwrap()
}

/// Base64 address of a keypair under `algorithm`
pub fn address_with(keypair: &Ed25519KeyPair, algorithm: HashAlgorithm) -> String {
    base64_encode(&derive_address(&keypair.public_key_bytes(), algorithm))
}

/// Base64 SHA3-256 address of a keypair
pub fn address(keypair: &Ed25519KeyPair) -> String {
    address_with(keypair, HashAlgorithm::Sha3_256)
}

/// Signature assertion over `text` made with `keypair`
pub fn assertion(keypair: &Ed25519KeyPair, text: &str) -> SignatureAssertion {
    SignatureAssertion {
        public_key: base64_encode(&keypair.public_key_bytes()),
        string_to_sign: text.to_string(),
        signature: base64_encode(&sign_message(keypair, text.as_bytes())),
    }
}

/// Registration request binding `keypair`'s address to `customer_id`
pub fn register_request(customer_id: &str, keypair: &Ed25519KeyPair) -> RegisterRequest {
    RegisterRequest {
        customer_id: customer_id.to_string(),
        address: address(keypair),
    }
}

/// Register `keypair` for `customer_id` under [`TENANT`]
pub async fn register<S: Storage + 'static>(
    registry: &RegistryService<S>,
    customer_id: &str,
    keypair: &Ed25519KeyPair,
) -> Result<IdentityKeys> {
    registry
        .register(
            TENANT,
            register_request(customer_id, keypair),
            &assertion(keypair, "register"),
        )
        .await
}

/// Storage wrapper whose batches can be made to fail on commit
///
/// Reads and single writes go to the inner RocksDB instance.
pub struct FailingCommitStorage {
    inner: RocksDbStorage,
    fail_commits: AtomicBool,
}

impl FailingCommitStorage {
    pub fn new(inner: RocksDbStorage) -> Self {
        Self {
            inner,
            fail_commits: AtomicBool::new(false),
        }
    }

    pub fn set_fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Storage for FailingCommitStorage {
    async fn get<K, V>(&self, cf: &str, key: &K) -> keyreg_storage::Result<Option<V>>
    where
        K: Serialize + Send + Sync,
        V: DeserializeOwned,
    {
        self.inner.get(cf, key).await
    }

    async fn put<K, V>(&self, cf: &str, key: &K, value: &V) -> keyreg_storage::Result<()>
    where
        K: Serialize + Send + Sync,
        V: Serialize + Send + Sync,
    {
        self.inner.put(cf, key, value).await
    }

    async fn delete<K>(&self, cf: &str, key: &K) -> keyreg_storage::Result<()>
    where
        K: Serialize + Send + Sync,
    {
        self.inner.delete(cf, key).await
    }

    async fn exists<K>(&self, cf: &str, key: &K) -> keyreg_storage::Result<bool>
    where
        K: Serialize + Send + Sync,
    {
        self.inner.exists(cf, key).await
    }

    async fn get_by_prefix<K, V>(
        &self,
        cf: &str,
        prefix: &K,
    ) -> keyreg_storage::Result<Vec<(Vec<u8>, V)>>
    where
        K: Serialize + Send + Sync,
        V: DeserializeOwned,
    {
        self.inner.get_by_prefix(cf, prefix).await
    }

    async fn keys_by_prefix<K>(&self, cf: &str, prefix: &K) -> keyreg_storage::Result<Vec<Vec<u8>>>
    where
        K: Serialize + Send + Sync,
    {
        self.inner.keys_by_prefix(cf, prefix).await
    }

    fn batch(&self) -> Box<dyn Batch> {
        if self.fail_commits.load(Ordering::SeqCst) {
            Box::new(FailingBatch { staged: 0 })
        } else {
            self.inner.batch()
        }
    }
}

/// Batch that accepts writes and then refuses to commit them
struct FailingBatch {
    staged: usize,
}

#[async_trait]
impl Batch for FailingBatch {
    fn put_raw(&mut self, _cf: &str, _key: Vec<u8>, _value: Vec<u8>) -> keyreg_storage::Result<()> {
        self.staged += 1;
        Ok(())
    }

    fn delete_raw(&mut self, _cf: &str, _key: Vec<u8>) -> keyreg_storage::Result<()> {
        self.staged += 1;
        Ok(())
    }

    fn len(&self) -> usize {
        self.staged
    }

    async fn commit(self: Box<Self>) -> keyreg_storage::Result<()> {
        Err(StorageError::CommitFailed(format!(
            "injected failure with {} staged operations",
            self.staged
        )))
    }

    fn rollback(self: Box<Self>) {}
}

/// Storage wrapper that counts committed tenant config writes
pub struct TenantWriteCounter {
    inner: RocksDbStorage,
    committed: Arc<AtomicUsize>,
}

impl TenantWriteCounter {
    pub fn new(inner: RocksDbStorage) -> Self {
        Self {
            inner,
            committed: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn committed_tenant_writes(&self) -> usize {
        self.committed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for TenantWriteCounter {
    async fn get<K, V>(&self, cf: &str, key: &K) -> keyreg_storage::Result<Option<V>>
    where
        K: Serialize + Send + Sync,
        V: DeserializeOwned,
    {
        self.inner.get(cf, key).await
    }

    async fn put<K, V>(&self, cf: &str, key: &K, value: &V) -> keyreg_storage::Result<()>
    where
        K: Serialize + Send + Sync,
        V: Serialize + Send + Sync,
    {
        self.inner.put(cf, key, value).await
    }

    async fn delete<K>(&self, cf: &str, key: &K) -> keyreg_storage::Result<()>
    where
        K: Serialize + Send + Sync,
    {
        self.inner.delete(cf, key).await
    }

    async fn exists<K>(&self, cf: &str, key: &K) -> keyreg_storage::Result<bool>
    where
        K: Serialize + Send + Sync,
    {
        self.inner.exists(cf, key).await
    }

    async fn get_by_prefix<K, V>(
        &self,
        cf: &str,
        prefix: &K,
    ) -> keyreg_storage::Result<Vec<(Vec<u8>, V)>>
    where
        K: Serialize + Send + Sync,
        V: DeserializeOwned,
    {
        self.inner.get_by_prefix(cf, prefix).await
    }

    async fn keys_by_prefix<K>(&self, cf: &str, prefix: &K) -> keyreg_storage::Result<Vec<Vec<u8>>>
    where
        K: Serialize + Send + Sync,
    {
        self.inner.keys_by_prefix(cf, prefix).await
    }

    fn batch(&self) -> Box<dyn Batch> {
        Box::new(CountingBatch {
            inner: self.inner.batch(),
            tenant_puts: 0,
            committed: Arc::clone(&self.committed),
        })
    }
}

struct CountingBatch {
    inner: Box<dyn Batch>,
    tenant_puts: usize,
    committed: Arc<AtomicUsize>,
}

#[async_trait]
impl Batch for CountingBatch {
    fn put_raw(&mut self, cf: &str, key: Vec<u8>, value: Vec<u8>) -> keyreg_storage::Result<()> {
        if cf == CF_TENANTS {
            self.tenant_puts += 1;
        }
        self.inner.put_raw(cf, key, value)
    }

    fn delete_raw(&mut self, cf: &str, key: Vec<u8>) -> keyreg_storage::Result<()> {
        self.inner.delete_raw(cf, key)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    async fn commit(self: Box<Self>) -> keyreg_storage::Result<()> {
        let CountingBatch {
            inner,
            tenant_puts,
            committed,
        } = *self;
        inner.commit().await?;
        committed.fetch_add(tenant_puts, Ordering::SeqCst);
        Ok(())
    }

    fn rollback(self: Box<Self>) {
        self.inner.rollback();
    }
}
