//! Digital signature operations using Ed25519.

use crate::{constants::*, errors::*, keys::Ed25519KeyPair};
use ed25519_dalek::{Signature, Signer, Verifier, VerifyingKey};

/// Sign a message with Ed25519
///
/// # Returns
///
/// 64-byte Ed25519 signature
pub fn sign_message(keypair: &Ed25519KeyPair, message: &[u8]) -> [u8; SIGNATURE_SIZE] {
    let signature = keypair.private_key().sign(message);
    signature.to_bytes()
}

/// Decode raw signature bytes
pub fn decode_signature(bytes: &[u8]) -> Result<Signature> {
    let array: [u8; SIGNATURE_SIZE] =
        bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidSignatureSize {
                expected: SIGNATURE_SIZE,
                actual: bytes.len(),
            })?;
    Ok(Signature::from_bytes(&array))
}

/// Verify an Ed25519 signature
///
/// A signature that does not match is `false`, never an error. Malformed
/// keys and signatures are rejected earlier, by the decode functions.
pub fn verify(public_key: &VerifyingKey, message: &[u8], signature: &Signature) -> bool {
    public_key.verify(message, signature).is_ok()
}

/// Decode and verify raw public key, message and signature bytes
pub fn verify_signature(public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool> {
    let public_key = crate::keys::decode_public_key(public_key)?;
    let signature = decode_signature(signature)?;
    Ok(verify(&public_key, message, &signature))
}
