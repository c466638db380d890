//! Signature assertion and address binding checks.
//!
//! Both checks are read-only and run before any state is touched.

use crate::{errors::*, types::SignatureAssertion};
use keyreg_crypto::{
    address_matches, base64_decode, base64_encode, decode_public_key, decode_signature,
    derive_address, verify, HashAlgorithm,
};
use tracing::warn;

/// Verify that the assertion's signature covers its plaintext under its public key
pub fn verify_assertion(assertion: &SignatureAssertion) -> Result<()> {
    let public_key = decode_public_key(&base64_decode(&assertion.public_key)?)?;
    let signature = decode_signature(&base64_decode(&assertion.signature)?)?;

    if !verify(&public_key, assertion.string_to_sign.as_bytes(), &signature) {
        warn!("Signature assertion rejected");
        return Err(RegistryError::SignatureMismatch {
            string_to_sign: assertion.string_to_sign.clone(),
            signature: assertion.signature.clone(),
        });
    }

    Ok(())
}

/// Verify that `claimed_address` is the hash of `public_key`
///
/// Both arguments are base64. The comparison is constant-time.
pub fn verify_address_binding(
    claimed_address: &str,
    public_key: &str,
    algorithm: HashAlgorithm,
) -> Result<()> {
    let address = base64_decode(claimed_address)?;
    let public_key = base64_decode(public_key)?;

    if !address_matches(&address, &public_key, algorithm) {
        warn!(algorithm = %algorithm, "Address binding rejected");
        return Err(RegistryError::AddressMismatch);
    }

    Ok(())
}

/// Address (base64) derived from a base64 public key
pub fn address_of(public_key: &str, algorithm: HashAlgorithm) -> Result<String> {
    let public_key = base64_decode(public_key)?;
    Ok(base64_encode(&derive_address(&public_key, algorithm)))
}
