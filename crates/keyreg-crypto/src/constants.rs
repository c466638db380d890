//! Cryptographic constants.
//!
//! Sizes are fixed by the Ed25519 and 256-bit digest choices and MUST NOT
//! change without migrating stored addresses and signing keys.

/// Size of Ed25519 public keys in bytes
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Size of Ed25519 private keys (seeds) in bytes
pub const PRIVATE_KEY_SIZE: usize = 32;

/// Size of Ed25519 signatures in bytes
pub const SIGNATURE_SIZE: usize = 64;

/// Size of an address (256-bit digest of a public key) in bytes
pub const ADDRESS_SIZE: usize = 32;

/// Name of the default address hash algorithm
pub const DEFAULT_ADDRESS_HASH: &str = "sha3-256";
