/*!
 * Command implementations
 */

pub mod admin;
pub mod identity;
pub mod keys;

use anyhow::{Context, Result};
use keyreg_core::RegistryService;
use keyreg_storage::RocksDbStorage;
use std::sync::Arc;
use tracing::debug;

use crate::config::Config;

/// Open the registry database named by the configuration
pub fn open_registry(config: &Config) -> Result<RegistryService<RocksDbStorage>> {
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let storage = RocksDbStorage::open(&config.database_path).with_context(|| {
        format!("Failed to open database at {}", config.database_path.display())
    })?;

    debug!(
        path = %config.database_path.display(),
        hash = %config.registry.address_hash,
        "Registry opened"
    );
    Ok(RegistryService::new(Arc::new(storage), config.registry))
}
