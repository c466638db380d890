//! Address hashing using SHA3-256 or BLAKE3.

use crate::{constants::*, errors::*};
use blake3::Hasher as Blake3Hasher;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::fmt;
use std::str::FromStr;
use subtle::ConstantTimeEq;

/// Hash algorithm used to derive addresses from public keys
///
/// The algorithm is a deployment-wide setting: addresses registered under one
/// algorithm never match public keys hashed under another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// SHA3-256 (FIPS 202)
    #[default]
    Sha3_256,
    /// BLAKE3 with 256-bit output
    Blake3,
}

impl HashAlgorithm {
    /// Hash data with this algorithm
    pub fn digest(&self, data: &[u8]) -> [u8; ADDRESS_SIZE] {
        match self {
            HashAlgorithm::Sha3_256 => sha3_256(data),
            HashAlgorithm::Blake3 => blake3_hash(data),
        }
    }

    /// Canonical configuration name
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha3_256 => "sha3-256",
            HashAlgorithm::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha3-256" | "sha3_256" | "sha3" => Ok(HashAlgorithm::Sha3_256),
            "blake3" => Ok(HashAlgorithm::Blake3),
            other => Err(CryptoError::UnsupportedHashAlgorithm(other.to_string())),
        }
    }
}

/// Hash data using SHA3-256
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash data using BLAKE3
pub fn blake3_hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake3Hasher::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Derive the address of a public key
///
/// The address is the digest of the raw public key bytes, so it is
/// reproducible by any party holding the key.
pub fn derive_address(public_key: &[u8], algorithm: HashAlgorithm) -> [u8; ADDRESS_SIZE] {
    algorithm.digest(public_key)
}

/// Check whether `address` is the address of `public_key`, in constant time
pub fn address_matches(address: &[u8], public_key: &[u8], algorithm: HashAlgorithm) -> bool {
    let expected = derive_address(public_key, algorithm);
    constant_time_compare(address, &expected)
}

/// Securely compare two byte slices in constant time
///
/// Slices of different length compare unequal without inspecting contents.
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
