/*!
 * Caller-authenticated identity commands
 */

use anyhow::Result;
use colored::*;
use keyreg_core::{IdentityKeys, IdentityRegistry, RegisterRequest, SignatureAssertion};

use super::open_registry;
use crate::config::Config;
use tracing::{debug, info};

pub async fn register(
    config: &Config,
    tenant_id: &str,
    customer_id: &str,
    address: String,
    assertion: SignatureAssertion,
    json: bool,
) -> Result<()> {
    let registry = open_registry(config)?;

    let request = RegisterRequest {
        customer_id: customer_id.to_string(),
        address,
    };
    let keys = registry.register(tenant_id, request, &assertion).await?;
    info!(
        tenant_id,
        customer_id,
        address_count = keys.addresses.len(),
        "Registration accepted"
    );

    if !json {
        println!("{}", "✓ Address registered".green().bold());
    }
    print_identity_keys(customer_id, &keys, json)
}

pub async fn get(
    config: &Config,
    tenant_id: &str,
    customer_id: &str,
    assertion: SignatureAssertion,
    json: bool,
) -> Result<()> {
    let registry = open_registry(config)?;

    match registry.get(tenant_id, customer_id, &assertion).await? {
        Some(keys) => print_identity_keys(customer_id, &keys, json),
        None => {
            debug!(tenant_id, customer_id, "No identity to fetch");
            if json {
                println!("null");
            } else {
                println!("{}", format!("No identity for {}", customer_id).yellow());
            }
            Ok(())
        }
    }
}

fn print_identity_keys(customer_id: &str, keys: &IdentityKeys, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(keys)?);
        return Ok(());
    }

    println!("\n{}", format!("Identity {}", customer_id).bold());
    println!("  Addresses:");
    for address in &keys.addresses {
        println!("    {}", address);
    }
    println!("  Sign Key: {}", keys.sign_key.yellow());

    Ok(())
}
