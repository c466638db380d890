use anyhow::{Context, Result};
use keyreg_core::RegistryConfig;
use keyreg_crypto::{HashAlgorithm, DEFAULT_ADDRESS_HASH};
use std::path::PathBuf;

const DEFAULT_DATABASE_PATH: &str = "./data/keyreg.db";

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to RocksDB database
    pub database_path: PathBuf,

    /// Registry settings
    pub registry: RegistryConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(
            std::env::var("DATABASE_PATH").ok(),
            std::env::var("ADDRESS_HASH_ALGORITHM").ok(),
        )
    }

    fn from_vars(database_path: Option<String>, address_hash: Option<String>) -> Result<Self> {
        let database_path = database_path
            .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string())
            .into();

        let address_hash: HashAlgorithm = address_hash
            .as_deref()
            .unwrap_or(DEFAULT_ADDRESS_HASH)
            .parse()
            .context("Invalid ADDRESS_HASH_ALGORITHM")?;

        Ok(Config {
            database_path,
            registry: RegistryConfig { address_hash },
        })
    }

    /// Apply command line overrides
    pub fn with_overrides(mut self, database: Option<PathBuf>, hash: Option<HashAlgorithm>) -> Self {
        if let Some(database) = database {
            self.database_path = database;
        }
        if let Some(hash) = hash {
            self.registry.address_hash = hash;
        }
        self
    }
}
