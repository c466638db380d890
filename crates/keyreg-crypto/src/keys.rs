//! Signing key generation and decoding.

use crate::{constants::*, errors::*};
use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::RngCore;
use zeroize::{Zeroize, Zeroizing};

/// Ed25519 signing key pair
#[derive(Clone)]
pub struct Ed25519KeyPair {
    /// Private signing key (32 bytes)
    private_key: SigningKey,
    /// Public verification key (32 bytes)
    public_key: VerifyingKey,
}

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519KeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

impl Ed25519KeyPair {
    /// Generate a fresh key pair from the thread-local CSPRNG
    pub fn generate() -> Result<Self> {
        let mut seed = Zeroizing::new([0u8; PRIVATE_KEY_SIZE]);
        rand::thread_rng()
            .try_fill_bytes(&mut seed[..])
            .map_err(|e| CryptoError::KeyGenerationFailed(e.to_string()))?;
        Self::from_seed(&seed)
    }

    /// Build a key pair from a 32-byte seed
    pub fn from_seed(seed: &[u8; PRIVATE_KEY_SIZE]) -> Result<Self> {
        let private_key = SigningKey::from_bytes(seed);
        let public_key = private_key.verifying_key();

        Ok(Self {
            private_key,
            public_key,
        })
    }

    /// Rebuild a key pair from stored private key bytes
    pub fn from_private_key_bytes(bytes: &[u8]) -> Result<Self> {
        let private_key = decode_private_key(bytes)?;
        let public_key = derive_public_key(&private_key);
        Ok(Self {
            private_key,
            public_key,
        })
    }

    /// Get the public key bytes
    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.public_key.to_bytes()
    }

    /// Get the private key bytes
    ///
    /// # Security
    ///
    /// The returned buffer is zeroized on drop. Never log these bytes.
    pub fn private_key_bytes(&self) -> Zeroizing<[u8; PRIVATE_KEY_SIZE]> {
        Zeroizing::new(self.private_key.to_bytes())
    }

    /// Get a reference to the private key
    pub fn private_key(&self) -> &SigningKey {
        &self.private_key
    }

    /// Get a reference to the public key
    pub fn public_key(&self) -> &VerifyingKey {
        &self.public_key
    }
}

/// Generate a fresh signing key pair
pub fn generate_keypair() -> Result<Ed25519KeyPair> {
    Ed25519KeyPair::generate()
}

/// Decode raw public key bytes
///
/// Fails on a wrong length or on bytes that are not a valid curve point.
pub fn decode_public_key(bytes: &[u8]) -> Result<VerifyingKey> {
    let array: [u8; PUBLIC_KEY_SIZE] =
        bytes.try_into().map_err(|_| CryptoError::InvalidKeySize {
            expected: PUBLIC_KEY_SIZE,
            actual: bytes.len(),
        })?;

    VerifyingKey::from_bytes(&array).map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
}

/// Decode raw private key (seed) bytes
pub fn decode_private_key(bytes: &[u8]) -> Result<SigningKey> {
    let mut array: [u8; PRIVATE_KEY_SIZE] =
        bytes.try_into().map_err(|_| CryptoError::InvalidKeySize {
            expected: PRIVATE_KEY_SIZE,
            actual: bytes.len(),
        })?;

    let key = SigningKey::from_bytes(&array);
    array.zeroize();
    Ok(key)
}

/// Derive the public key belonging to a private key
pub fn derive_public_key(private_key: &SigningKey) -> VerifyingKey {
    private_key.verifying_key()
}
