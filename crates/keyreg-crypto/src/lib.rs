//! # keyreg-crypto
//!
//! Cryptographic primitives for the keyreg identity registry.
//!
//! This crate provides:
//! - Ed25519 keypair generation, signing and verification
//! - Address derivation (SHA3-256 by default, BLAKE3 selectable)
//! - Strict base64 encoding used at every external boundary
//!
//! ## Security Properties
//!
//! - Private key material is zeroized after use
//! - Address comparison is constant-time
//! - No unsafe code

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod constants;
pub mod encoding;
pub mod errors;
pub mod hashing;
pub mod keys;
pub mod signatures;
pub mod utils;

pub use constants::*;
pub use encoding::*;
pub use errors::{CryptoError, Result};
pub use hashing::*;
pub use keys::*;
pub use signatures::*;
pub use utils::*;
