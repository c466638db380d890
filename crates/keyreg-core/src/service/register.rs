//! Identity registration.

use crate::{
    errors::*,
    types::*,
    verify::{verify_address_binding, verify_assertion},
};
use keyreg_crypto::{base64_decode, base64_encode, current_timestamp_millis};
use keyreg_storage::{
    Batch, BatchExt, Storage, CF_ADDRESSES, CF_IDENTITIES, CF_IDENTITIES_BY_CUSTOMER,
};
use std::collections::BTreeSet;
use tracing::{debug, info};
use uuid::Uuid;

use super::{natural_key, validate_ids, RegistryService};

impl<S: Storage + 'static> RegistryService<S> {
    /// Register `request.address` for the customer
    ///
    /// Both guards run before any state is read under the lock. All writes
    /// of one registration land in a single batch.
    pub(crate) async fn register_internal(
        &self,
        tenant_id: &str,
        request: RegisterRequest,
        assertion: &SignatureAssertion,
    ) -> Result<IdentityKeys> {
        validate_ids(tenant_id, &request.customer_id)?;
        verify_assertion(assertion)?;
        verify_address_binding(
            &request.address,
            &assertion.public_key,
            self.config.address_hash,
        )?;

        let address = base64_decode(&request.address)?;
        let customer_id = request.customer_id.as_str();

        let _natural = self.locks.acquire(&natural_key(tenant_id, customer_id)).await;

        match self.find_identity(tenant_id, customer_id).await? {
            None => self.create_identity(tenant_id, customer_id, address).await,
            Some(identity) => self.add_address(identity, address).await,
        }
    }

    /// First registration: tenant config, identity, index, address and first key
    async fn create_identity(
        &self,
        tenant_id: &str,
        customer_id: &str,
        address: Vec<u8>,
    ) -> Result<IdentityKeys> {
        let now = current_timestamp_millis();
        let identity = Identity {
            identity_id: Uuid::new_v4(),
            tenant_id: tenant_id.to_string(),
            customer_id: customer_id.to_string(),
            created_at: now,
        };
        let identity_id = identity.identity_id;

        let _tenant = self.tenants.lock(tenant_id).await;
        let _keys = self.signing_keys.lock(identity_id).await;
        let mut batch = self.storage.batch();

        self.tenants.stage_if_absent(&mut *batch, tenant_id).await?;
        batch.put(CF_IDENTITIES, &identity_id, &identity)?;
        batch.put(
            CF_IDENTITIES_BY_CUSTOMER,
            &(tenant_id, customer_id),
            &identity_id,
        )?;
        let encoded = stage_address(&mut *batch, identity_id, address, now)?;
        let sign_key = self.signing_keys.issue(&mut *batch, identity_id).await?;

        batch.commit().await?;

        info!(tenant_id, customer_id, %identity_id, "Identity registered");
        Ok(IdentityKeys {
            addresses: BTreeSet::from([encoded]),
            sign_key,
        })
    }

    /// Repeat registration: add the address if new, keep the current key
    async fn add_address(&self, identity: Identity, address: Vec<u8>) -> Result<IdentityKeys> {
        let identity_id = identity.identity_id;

        let _keys = self.signing_keys.lock(identity_id).await;
        let mut batch = self.storage.batch();

        let mut addresses = self.addresses(identity_id).await?;
        if !addresses.contains(&base64_encode(&address)) {
            let encoded = stage_address(&mut *batch, identity_id, address, current_timestamp_millis())?;
            addresses.insert(encoded);
        }

        let sign_key = match self.signing_keys.latest(identity_id).await? {
            Some(record) => record.encoded_private_key(),
            None => self.signing_keys.issue(&mut *batch, identity_id).await?,
        };

        if batch.is_empty() {
            batch.rollback();
            debug!(
                tenant_id = %identity.tenant_id,
                customer_id = %identity.customer_id,
                "Registration already up to date"
            );
        } else {
            batch.commit().await?;
            info!(
                tenant_id = %identity.tenant_id,
                customer_id = %identity.customer_id,
                address_count = addresses.len(),
                "Address added to identity"
            );
        }

        Ok(IdentityKeys {
            addresses,
            sign_key,
        })
    }
}

/// Stage an address membership row, returning its base64 form
fn stage_address(
    batch: &mut dyn Batch,
    identity_id: Uuid,
    address: Vec<u8>,
    added_at: u64,
) -> Result<String> {
    let record = AddressRecord { address, added_at };
    batch.put(CF_ADDRESSES, &(identity_id, &record.address), &record)?;
    Ok(record.encoded())
}
