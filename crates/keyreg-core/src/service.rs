//! Identity registry service implementation.

mod admin;
mod lookup;
mod register;

use crate::{
    errors::*, locks::IdentityLocks, signing_keys::SigningKeyService, tenants::TenantConfigs,
    traits::*, types::*,
};
use async_trait::async_trait;
use keyreg_storage::{Storage, CF_ADDRESSES, CF_IDENTITIES, CF_IDENTITIES_BY_CUSTOMER};
use std::collections::BTreeSet;
use std::sync::Arc;
use uuid::Uuid;

/// Identity registry backed by a [`Storage`] engine
pub struct RegistryService<S: Storage> {
    storage: Arc<S>,
    signing_keys: SigningKeyService<S>,
    tenants: TenantConfigs<S>,
    locks: IdentityLocks<(String, String)>,
    config: RegistryConfig,
}

impl<S: Storage + 'static> RegistryService<S> {
    /// Create a new registry service
    pub fn new(storage: Arc<S>, config: RegistryConfig) -> Self {
        Self {
            signing_keys: SigningKeyService::new(Arc::clone(&storage)),
            tenants: TenantConfigs::new(Arc::clone(&storage)),
            storage,
            locks: IdentityLocks::new(),
            config,
        }
    }

    /// Registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Signing key history, read-only outside the crate
    pub fn signing_keys(&self) -> &SigningKeyService<S> {
        &self.signing_keys
    }

    /// Tenant config store
    pub fn tenants(&self) -> &TenantConfigs<S> {
        &self.tenants
    }

    /// Look up an identity by its natural key
    pub async fn find_identity(&self, tenant_id: &str, customer_id: &str) -> Result<Option<Identity>> {
        let identity_id: Option<Uuid> = self
            .storage
            .get(CF_IDENTITIES_BY_CUSTOMER, &(tenant_id, customer_id))
            .await?;

        match identity_id {
            Some(identity_id) => Ok(self.storage.get(CF_IDENTITIES, &identity_id).await?),
            None => Ok(None),
        }
    }

    /// All addresses of an identity, base64 encoded
    pub async fn addresses(&self, identity_id: Uuid) -> Result<BTreeSet<String>> {
        let records: Vec<(Vec<u8>, AddressRecord)> = self
            .storage
            .get_by_prefix(CF_ADDRESSES, &identity_id)
            .await?;

        Ok(records.iter().map(|(_, record)| record.encoded()).collect())
    }
}

/// Reject empty tenant or customer IDs before doing any work
fn validate_ids(tenant_id: &str, customer_id: &str) -> Result<()> {
    if tenant_id.trim().is_empty() {
        return Err(RegistryError::InvalidRequest("tenant ID is empty".to_string()));
    }
    if customer_id.trim().is_empty() {
        return Err(RegistryError::InvalidRequest("customer ID is empty".to_string()));
    }
    Ok(())
}

fn natural_key(tenant_id: &str, customer_id: &str) -> (String, String) {
    (tenant_id.to_string(), customer_id.to_string())
}

#[async_trait]
impl<S: Storage + 'static> IdentityRegistry for RegistryService<S> {
    async fn register(
        &self,
        tenant_id: &str,
        request: RegisterRequest,
        assertion: &SignatureAssertion,
    ) -> Result<IdentityKeys> {
        self.register_internal(tenant_id, request, assertion).await
    }

    async fn get(
        &self,
        tenant_id: &str,
        customer_id: &str,
        assertion: &SignatureAssertion,
    ) -> Result<Option<IdentityKeys>> {
        self.get_internal(tenant_id, customer_id, assertion).await
    }

    async fn delete(&self, tenant_id: &str, customer_id: &str) -> Result<bool> {
        self.delete_internal(tenant_id, customer_id).await
    }

    async fn public_key(&self, tenant_id: &str, customer_id: &str) -> Result<Option<String>> {
        self.public_key_internal(tenant_id, customer_id).await
    }

    async fn rotate_sign_key(&self, tenant_id: &str, customer_id: &str) -> Result<Option<String>> {
        self.rotate_sign_key_internal(tenant_id, customer_id).await
    }
}
