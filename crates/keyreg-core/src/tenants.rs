//! Tenant configuration store.

use crate::{errors::*, locks::IdentityLocks, types::TenantConfig};
use keyreg_crypto::current_timestamp_millis;
use keyreg_storage::{Batch, BatchExt, Storage, CF_TENANTS};
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;
use tracing::debug;

/// Reads and creates per-tenant configuration
pub struct TenantConfigs<S: Storage> {
    storage: Arc<S>,
    locks: IdentityLocks<String>,
}

impl<S: Storage + 'static> TenantConfigs<S> {
    /// Create a tenant config store over `storage`
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            locks: IdentityLocks::new(),
        }
    }

    /// Take the tenant's config lock
    ///
    /// Lock order is natural key, then tenant, then identity.
    pub async fn lock(&self, tenant_id: &str) -> OwnedMutexGuard<()> {
        self.locks.acquire(&tenant_id.to_string()).await
    }

    /// Get a tenant's configuration
    pub async fn get(&self, tenant_id: &str) -> Result<Option<TenantConfig>> {
        Ok(self.storage.get(CF_TENANTS, &tenant_id).await?)
    }

    /// Stage a default configuration if the tenant has none yet
    ///
    /// Returns true if a config was staged. Nothing is written until the
    /// batch commits, and the caller must hold [`Self::lock`] until then.
    pub async fn stage_if_absent(&self, batch: &mut dyn Batch, tenant_id: &str) -> Result<bool> {
        if self.storage.exists(CF_TENANTS, &tenant_id).await? {
            return Ok(false);
        }

        let config = TenantConfig {
            tenant_id: tenant_id.to_string(),
            created_at: current_timestamp_millis(),
        };
        batch.put(CF_TENANTS, &tenant_id, &config)?;

        debug!(tenant_id, "Staged tenant config");
        Ok(true)
    }
}
