/*!
 * Caller-side key commands
 */

use anyhow::{Context, Result};
use colored::*;
use keyreg_core::SignatureAssertion;
use keyreg_crypto::{
    base64_decode, base64_encode, derive_address, generate_keypair, sign_message, Ed25519KeyPair,
};

use crate::config::Config;
use tracing::debug;

pub fn keygen(config: &Config, json: bool) -> Result<()> {
    let keypair = generate_keypair().context("Failed to generate keypair")?;
    let public_key = keypair.public_key_bytes();
    let address = base64_encode(&derive_address(&public_key, config.registry.address_hash));

    if json {
        let output = serde_json::json!({
            "private_key": base64_encode(&keypair.private_key_bytes()[..]),
            "public_key": base64_encode(&public_key),
            "address": address,
            "hash": config.registry.address_hash.name(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "=== New Caller Keypair ===".bold().cyan());
    println!(
        "  Private Key: {}",
        base64_encode(&keypair.private_key_bytes()[..]).yellow()
    );
    println!("  Public Key:  {}", base64_encode(&public_key));
    println!(
        "  Address:     {} ({})",
        address.green(),
        config.registry.address_hash
    );
    println!("\n{}", "Keep the private key secret.".dimmed());

    Ok(())
}

pub fn sign(private_key: &str, message: &str, json: bool) -> Result<()> {
    let assertion = build_assertion(private_key, message)?;
    debug!(public_key = %assertion.public_key, "Assertion signed");

    if json {
        println!("{}", serde_json::to_string_pretty(&assertion)?);
        return Ok(());
    }

    println!("{}", "=== Signature Assertion ===".bold().cyan());
    println!("  --public-key {}", assertion.public_key);
    println!("  --string-to-sign {}", assertion.string_to_sign);
    println!("  --signature {}", assertion.signature);

    Ok(())
}

/// Sign `message` with a base64 private key
pub(crate) fn build_assertion(private_key: &str, message: &str) -> Result<SignatureAssertion> {
    let seed = base64_decode(private_key).context("Private key is not valid base64")?;
    let keypair = Ed25519KeyPair::from_private_key_bytes(&seed).context("Invalid private key")?;

    Ok(SignatureAssertion {
        public_key: base64_encode(&keypair.public_key_bytes()),
        string_to_sign: message.to_string(),
        signature: base64_encode(&sign_message(&keypair, message.as_bytes())),
    })
}
