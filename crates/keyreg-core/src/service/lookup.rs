//! Identity reads.

use crate::{
    errors::*,
    types::*,
    verify::{address_of, verify_assertion},
};
use keyreg_storage::Storage;
use tracing::warn;

use super::{natural_key, validate_ids, RegistryService};

impl<S: Storage + 'static> RegistryService<S> {
    pub(crate) async fn get_internal(
        &self,
        tenant_id: &str,
        customer_id: &str,
        assertion: &SignatureAssertion,
    ) -> Result<Option<IdentityKeys>> {
        validate_ids(tenant_id, customer_id)?;
        verify_assertion(assertion)?;
        let caller_address = address_of(&assertion.public_key, self.config.address_hash)?;

        // Held so a lazily minted key cannot outlive a concurrent delete
        let _natural = self.locks.acquire(&natural_key(tenant_id, customer_id)).await;

        let Some(identity) = self.find_identity(tenant_id, customer_id).await? else {
            return Ok(None);
        };

        let addresses = self.addresses(identity.identity_id).await?;
        if !addresses.contains(&caller_address) {
            warn!(tenant_id, customer_id, "Caller address is not a member");
            return Err(RegistryError::NotAMember);
        }

        let sign_key = self.signing_keys.current(identity.identity_id).await?;

        Ok(Some(IdentityKeys {
            addresses,
            sign_key,
        }))
    }

    pub(crate) async fn public_key_internal(
        &self,
        tenant_id: &str,
        customer_id: &str,
    ) -> Result<Option<String>> {
        validate_ids(tenant_id, customer_id)?;

        match self.find_identity(tenant_id, customer_id).await? {
            Some(identity) => self.signing_keys.current_public_key(identity.identity_id).await,
            None => Ok(None),
        }
    }
}
