//! Administrative operations: delete and explicit key rotation.

use crate::errors::*;
use keyreg_storage::{
    Batch, BatchExt, Storage, CF_ADDRESSES, CF_IDENTITIES, CF_IDENTITIES_BY_CUSTOMER,
};
use tracing::info;

use super::{natural_key, validate_ids, RegistryService};

impl<S: Storage + 'static> RegistryService<S> {
    /// Delete the identity, its addresses and its key history in one batch
    pub(crate) async fn delete_internal(&self, tenant_id: &str, customer_id: &str) -> Result<bool> {
        validate_ids(tenant_id, customer_id)?;

        let _natural = self.locks.acquire(&natural_key(tenant_id, customer_id)).await;

        let Some(identity) = self.find_identity(tenant_id, customer_id).await? else {
            return Ok(false);
        };
        let identity_id = identity.identity_id;

        let _keys = self.signing_keys.lock(identity_id).await;
        let mut batch = self.storage.batch();

        let key_count = self
            .signing_keys
            .stage_delete_all(&mut *batch, identity_id)
            .await?;

        let address_keys = self
            .storage
            .keys_by_prefix(CF_ADDRESSES, &identity_id)
            .await?;
        let address_count = address_keys.len();
        for key in address_keys {
            batch.delete_raw(CF_ADDRESSES, key)?;
        }

        batch.delete(CF_IDENTITIES_BY_CUSTOMER, &(tenant_id, customer_id))?;
        batch.delete(CF_IDENTITIES, &identity_id)?;

        batch.commit().await?;

        info!(
            tenant_id,
            customer_id,
            %identity_id,
            key_count,
            address_count,
            "Identity deleted"
        );
        Ok(true)
    }

    /// Rotate the current signing key of an existing identity
    pub(crate) async fn rotate_sign_key_internal(
        &self,
        tenant_id: &str,
        customer_id: &str,
    ) -> Result<Option<String>> {
        validate_ids(tenant_id, customer_id)?;

        let _natural = self.locks.acquire(&natural_key(tenant_id, customer_id)).await;

        match self.find_identity(tenant_id, customer_id).await? {
            Some(identity) => Ok(Some(self.signing_keys.rotate(identity.identity_id).await?)),
            None => Ok(None),
        }
    }
}
