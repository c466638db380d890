//! Registry error types.

use keyreg_crypto::CryptoError;
use keyreg_storage::StorageError;
use thiserror::Error;
use uuid::Uuid;

/// Identity registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Missing or malformed request field
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Public key, signature or address could not be decoded
    #[error("Encoding is incorrect: {0}")]
    Encoding(String),

    /// Signature does not verify against the plaintext and public key
    #[error("Signature does not match plaintext")]
    SignatureMismatch {
        string_to_sign: String,
        signature: String,
    },

    /// Claimed address is not the hash of the presented public key
    #[error("Public key does not match the address provided")]
    AddressMismatch,

    /// Caller address is not registered for the identity
    #[error("Address is not a member")]
    NotAMember,

    /// Configured address hash algorithm is unavailable
    #[error("Hash algorithm unavailable: {0}")]
    HashAlgorithm(String),

    /// Signing keypair could not be generated
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    /// Stored private key bytes do not decode
    #[error("Stored signing key for identity {0} is corrupt")]
    CorruptSigningKey(Uuid),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl RegistryError {
    /// Whether the caller can fix the request and retry
    ///
    /// Everything else is a processing fault on the registry side.
    pub fn is_caller_fault(&self) -> bool {
        matches!(
            self,
            RegistryError::InvalidRequest(_)
                | RegistryError::Encoding(_)
                | RegistryError::SignatureMismatch { .. }
                | RegistryError::AddressMismatch
                | RegistryError::NotAMember
        )
    }
}

impl From<CryptoError> for RegistryError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::KeyGenerationFailed(reason) => RegistryError::KeyGeneration(reason),
            CryptoError::UnsupportedHashAlgorithm(name) => RegistryError::HashAlgorithm(name),
            other => RegistryError::Encoding(other.to_string()),
        }
    }
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
