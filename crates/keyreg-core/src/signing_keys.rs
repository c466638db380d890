//! Signing key lifecycle.
//!
//! Each identity owns an append-only history of Ed25519 keypairs stored under
//! `(identity_id, sequence)`. The current key is the row with the highest
//! sequence. Sequence numbers are assigned while holding the identity's lock,
//! so they grow strictly in creation order.

use crate::{errors::*, locks::IdentityLocks, types::SigningKeyRecord};
use keyreg_crypto::{
    base64_encode, current_timestamp_millis, decode_private_key, derive_public_key,
    generate_keypair,
};
use keyreg_storage::{Batch, BatchExt, Storage, CF_SIGNING_KEYS};
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;
use tracing::{error, info};
use uuid::Uuid;

/// Issues, rotates and looks up signing keys
pub struct SigningKeyService<S: Storage> {
    storage: Arc<S>,
    locks: IdentityLocks<Uuid>,
}

impl<S: Storage + 'static> SigningKeyService<S> {
    /// Create a signing key service over `storage`
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            locks: IdentityLocks::new(),
        }
    }

    /// Take the identity's key lock
    ///
    /// Callers that also hold a natural-key lock must take it first.
    pub async fn lock(&self, identity_id: Uuid) -> OwnedMutexGuard<()> {
        self.locks.acquire(&identity_id).await
    }

    /// Full key history in creation order
    pub async fn history(&self, identity_id: Uuid) -> Result<Vec<SigningKeyRecord>> {
        let rows: Vec<(Vec<u8>, SigningKeyRecord)> = self
            .storage
            .get_by_prefix(CF_SIGNING_KEYS, &identity_id)
            .await?;

        // Sequence is little-endian in the key, so raw order is not numeric order
        let mut records: Vec<SigningKeyRecord> = rows.into_iter().map(|(_, r)| r).collect();
        records.sort_by_key(|r| r.sequence);
        Ok(records)
    }

    /// Most recently issued key, if any
    pub async fn latest(&self, identity_id: Uuid) -> Result<Option<SigningKeyRecord>> {
        Ok(self.history(identity_id).await?.pop())
    }

    /// Stage a fresh key with the next sequence number
    ///
    /// Returns the base64 private key. The caller must hold [`Self::lock`]
    /// until the batch commits.
    pub(crate) async fn issue(&self, batch: &mut dyn Batch, identity_id: Uuid) -> Result<String> {
        let sequence = match self.latest(identity_id).await? {
            Some(record) => record.sequence + 1,
            None => 0,
        };

        let keypair = generate_keypair()?;
        let record = SigningKeyRecord {
            identity_id,
            sequence,
            created_at: current_timestamp_millis(),
            private_key: keypair.private_key_bytes().to_vec(),
        };
        batch.put(CF_SIGNING_KEYS, &(identity_id, sequence), &record)?;

        Ok(record.encoded_private_key())
    }

    /// Append a new key and make it current
    ///
    /// The caller must hold the identity's natural-key lock so a concurrent
    /// delete cannot leave the new row orphaned.
    pub(crate) async fn rotate(&self, identity_id: Uuid) -> Result<String> {
        let _guard = self.lock(identity_id).await;

        let mut batch = self.storage.batch();
        let sign_key = self.issue(&mut *batch, identity_id).await?;
        batch.commit().await?;

        info!(%identity_id, "Signing key rotated");
        Ok(sign_key)
    }

    /// Current private key, minting the first one if the identity has none
    pub(crate) async fn current(&self, identity_id: Uuid) -> Result<String> {
        if let Some(record) = self.latest(identity_id).await? {
            return Ok(record.encoded_private_key());
        }

        let _guard = self.lock(identity_id).await;

        // Another caller may have minted while we waited
        if let Some(record) = self.latest(identity_id).await? {
            return Ok(record.encoded_private_key());
        }

        let mut batch = self.storage.batch();
        let sign_key = self.issue(&mut *batch, identity_id).await?;
        batch.commit().await?;

        info!(%identity_id, "Initial signing key issued");
        Ok(sign_key)
    }

    /// Public key of the current signing key
    ///
    /// `None` only when the identity has no key at all.
    pub async fn current_public_key(&self, identity_id: Uuid) -> Result<Option<String>> {
        let Some(record) = self.latest(identity_id).await? else {
            return Ok(None);
        };

        let private_key = decode_private_key(&record.private_key).map_err(|e| {
            error!(%identity_id, sequence = record.sequence, error = %e, "Stored signing key is corrupt");
            RegistryError::CorruptSigningKey(identity_id)
        })?;

        Ok(Some(base64_encode(derive_public_key(&private_key).as_bytes())))
    }

    /// Stage deletion of the identity's whole key history
    ///
    /// Returns the number of rows staged. The caller must hold [`Self::lock`].
    pub(crate) async fn stage_delete_all(&self, batch: &mut dyn Batch, identity_id: Uuid) -> Result<usize> {
        let keys = self
            .storage
            .keys_by_prefix(CF_SIGNING_KEYS, &identity_id)
            .await?;

        let count = keys.len();
        for key in keys {
            batch.delete_raw(CF_SIGNING_KEYS, key)?;
        }

        Ok(count)
    }

    /// Delete the identity's whole key history
    ///
    /// Same locking contract as [`Self::rotate`].
    pub(crate) async fn delete_all(&self, identity_id: Uuid) -> Result<usize> {
        let _guard = self.lock(identity_id).await;

        let mut batch = self.storage.batch();
        let count = self.stage_delete_all(&mut *batch, identity_id).await?;
        batch.commit().await?;

        info!(%identity_id, count, "Signing key history deleted");
        Ok(count)
    }
}
