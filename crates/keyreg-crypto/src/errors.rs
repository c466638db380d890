//! Cryptographic error types.

use thiserror::Error;

/// Cryptographic operation errors
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Input is not valid base64
    #[error("Invalid base64 encoding: {0}")]
    InvalidEncoding(String),

    /// Invalid key size
    #[error("Invalid key size: expected {expected}, got {actual}")]
    InvalidKeySize {
        /// Expected key size in bytes
        expected: usize,
        /// Actual key size in bytes
        actual: usize,
    },

    /// Invalid signature size
    #[error("Invalid signature size: expected {expected}, got {actual}")]
    InvalidSignatureSize {
        /// Expected signature size in bytes
        expected: usize,
        /// Actual signature size in bytes
        actual: usize,
    },

    /// Key bytes do not describe a valid public key
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Keypair generation failed
    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    /// Unknown or unavailable hash algorithm
    #[error("Unsupported hash algorithm: {0}")]
    UnsupportedHashAlgorithm(String),
}

impl CryptoError {
    /// Whether the error was caused by malformed caller input
    pub fn is_encoding(&self) -> bool {
        matches!(
            self,
            CryptoError::InvalidEncoding(_)
                | CryptoError::InvalidKeySize { .. }
                | CryptoError::InvalidSignatureSize { .. }
                | CryptoError::InvalidPublicKey(_)
        )
    }
}

/// Result type for cryptographic operations
pub type Result<T> = std::result::Result<T, CryptoError>;
