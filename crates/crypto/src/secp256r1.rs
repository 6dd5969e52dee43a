//! secp256r1 (P-256) ECDSA verification (`spec.md` §4.A row 2).

use p256::ecdsa::signature::hazmat::PrehashVerifier;
use p256::ecdsa::{Signature, VerifyingKey};

use crate::error::CryptoError;

/// Canonicalises a compressed or uncompressed SEC1 point to its
/// uncompressed (65-byte, `0x04`-prefixed) form.
pub fn normalise_uncompressed(raw_pub: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let key = VerifyingKey::from_sec1_bytes(raw_pub).map_err(|_| CryptoError::MalformedPublicKey)?;
    Ok(key.to_encoded_point(false).as_bytes().to_vec())
}

pub fn verify(pubkey_uncompressed: &[u8], digest: &[u8; 32], r: &[u8], s: &[u8]) -> Result<(), CryptoError> {
    let verifying_key =
        VerifyingKey::from_sec1_bytes(pubkey_uncompressed).map_err(|_| CryptoError::MalformedPublicKey)?;
    if r.len() > 32 || s.len() > 32 {
        return Err(CryptoError::MalformedSignature);
    }
    let mut bytes = [0u8; 64];
    bytes[32 - r.len()..32].copy_from_slice(r);
    bytes[64 - s.len()..].copy_from_slice(s);
    let signature = Signature::from_slice(&bytes).map_err(|_| CryptoError::MalformedSignature)?;
    verifying_key
        .verify_prehash(digest, &signature)
        .map_err(|_| CryptoError::VerificationFailed)
}
