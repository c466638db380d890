//! Identity registry trait definitions.

use crate::{errors::Result, types::*};
use async_trait::async_trait;

/// Identity registry
///
/// Operations are scoped to a tenant. Authorization of the tenant itself is
/// the transport layer's concern.
#[async_trait]
pub trait IdentityRegistry: Send + Sync {
    /// Register an address for a customer, creating the identity on first use
    ///
    /// The assertion must verify and its public key must hash to
    /// `request.address`. A new identity gets a fresh signing key; an
    /// existing one keeps its current key.
    async fn register(
        &self,
        tenant_id: &str,
        request: RegisterRequest,
        assertion: &SignatureAssertion,
    ) -> Result<IdentityKeys>;

    /// Get a customer's addresses and current signing key
    ///
    /// The caller's address (derived from the assertion key) must be one of
    /// the identity's addresses. `None` if the identity does not exist.
    async fn get(
        &self,
        tenant_id: &str,
        customer_id: &str,
        assertion: &SignatureAssertion,
    ) -> Result<Option<IdentityKeys>>;

    /// Delete an identity with its addresses and key history
    ///
    /// Returns false if there was nothing to delete.
    async fn delete(&self, tenant_id: &str, customer_id: &str) -> Result<bool>;

    /// Public key of the identity's current signing key
    async fn public_key(&self, tenant_id: &str, customer_id: &str) -> Result<Option<String>>;

    /// Issue a new signing key for an existing identity
    async fn rotate_sign_key(&self, tenant_id: &str, customer_id: &str) -> Result<Option<String>>;
}
