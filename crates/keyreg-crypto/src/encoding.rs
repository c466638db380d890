//! Base64 helpers for keys, signatures and addresses.
//!
//! Everything crossing the registry boundary uses the standard alphabet with
//! padding. Decoding is strict, so an address has exactly one accepted
//! spelling.

use crate::errors::*;
use base64::{engine::general_purpose::STANDARD, Engine};

/// Encode bytes as standard padded base64
pub fn base64_encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard padded base64
pub fn base64_decode(encoded: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| CryptoError::InvalidEncoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_rejects_garbage() {
        let err = base64_decode("not base64!!").unwrap_err();
        assert!(err.is_encoding());
    }

    #[test]
    fn test_decode_tolerates_surrounding_whitespace() {
        let encoded = format!(" {}\n", base64_encode(b"registry"));
        assert_eq!(base64_decode(&encoded).unwrap(), b"registry");
    }
}
