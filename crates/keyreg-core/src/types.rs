//! Registry data types.

use keyreg_crypto::{base64_encode, HashAlgorithm};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;
use zeroize::Zeroize;

/// Per-tenant configuration, created with the tenant's first identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantConfig {
    pub tenant_id: String,
    pub created_at: u64,
}

/// Identity record, unique per (tenant_id, customer_id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub identity_id: Uuid,
    pub tenant_id: String,
    pub customer_id: String,
    pub created_at: u64,
}

/// Address membership of one identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    /// Raw address bytes (hash of a public key)
    pub address: Vec<u8>,
    pub added_at: u64,
}

impl AddressRecord {
    /// External (base64) form of the address
    pub fn encoded(&self) -> String {
        base64_encode(&self.address)
    }
}

/// One entry of an identity's signing key history
///
/// Rows are append-only; the row with the highest sequence is the current key.
#[derive(Clone, Serialize, Deserialize)]
pub struct SigningKeyRecord {
    pub identity_id: Uuid,
    pub sequence: u64,
    pub created_at: u64,
    /// Ed25519 private key seed
    pub private_key: Vec<u8>,
}

impl SigningKeyRecord {
    /// Private key in its external (base64) form
    pub fn encoded_private_key(&self) -> String {
        base64_encode(&self.private_key)
    }
}

impl fmt::Debug for SigningKeyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKeyRecord")
            .field("identity_id", &self.identity_id)
            .field("sequence", &self.sequence)
            .field("created_at", &self.created_at)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl Drop for SigningKeyRecord {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}

/// Proof that the caller holds the private key for `public_key`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureAssertion {
    /// Base64 public key
    pub public_key: String,
    pub string_to_sign: String,
    /// Base64 signature over `string_to_sign`
    pub signature: String,
}

/// Registration request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub customer_id: String,
    /// Base64 address claimed by the caller
    pub address: String,
}

/// Addresses of an identity together with its current signing key
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityKeys {
    pub addresses: BTreeSet<String>,
    /// Base64 private key of the current signing keypair
    pub sign_key: String,
}

impl fmt::Debug for IdentityKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityKeys")
            .field("addresses", &self.addresses)
            .field("sign_key", &"<redacted>")
            .finish()
    }
}

/// Registry configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Hash used to derive addresses from public keys
    pub address_hash: HashAlgorithm,
}
