//! # keyreg-core
//!
//! Multi-tenant identity registry.
//!
//! Binds a tenant-scoped customer ID to a set of addresses (hashes of public
//! keys) and keeps an append-only history of signing keys per identity:
//! - Signature assertion and address binding checks gate every mutation
//! - Registration writes persist in a single atomic batch
//! - The current signing key is the most recently issued one

#![warn(clippy::all)]

pub mod errors;
pub mod locks;
pub mod service;
pub mod signing_keys;
pub mod tenants;
pub mod traits;
pub mod types;
pub mod verify;


pub use errors::{RegistryError, Result};
pub use locks::IdentityLocks;
pub use service::RegistryService;
pub use signing_keys::SigningKeyService;
pub use tenants::TenantConfigs;
pub use traits::IdentityRegistry;
pub use types::*;
