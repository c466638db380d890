/*!
 * Admin-scoped identity commands
 */

use anyhow::Result;
use colored::*;
use keyreg_core::IdentityRegistry;
use tracing::info;

use super::open_registry;
use crate::config::Config;

pub async fn delete(config: &Config, tenant_id: &str, customer_id: &str) -> Result<()> {
    let registry = open_registry(config)?;

    let deleted = registry.delete(tenant_id, customer_id).await?;
    info!(tenant_id, customer_id, deleted, "Delete requested");

    if deleted {
        println!("{}", format!("✓ Deleted {}", customer_id).green().bold());
    } else {
        println!("{}", format!("No identity for {}", customer_id).yellow());
    }

    Ok(())
}

pub async fn public_key(config: &Config, tenant_id: &str, customer_id: &str) -> Result<()> {
    let registry = open_registry(config)?;

    match registry.public_key(tenant_id, customer_id).await? {
        Some(public_key) => println!("{}", public_key),
        None => println!("{}", format!("No signing key for {}", customer_id).yellow()),
    }

    Ok(())
}

pub async fn rotate(config: &Config, tenant_id: &str, customer_id: &str) -> Result<()> {
    let registry = open_registry(config)?;

    match registry.rotate_sign_key(tenant_id, customer_id).await? {
        Some(sign_key) => {
            info!(tenant_id, customer_id, "Rotation requested");
            println!("{}", "✓ Signing key rotated".green().bold());
            println!("  Sign Key: {}", sign_key.yellow());
        }
        None => println!("{}", format!("No identity for {}", customer_id).yellow()),
    }

    Ok(())
}
