//! Pure Ed25519 verification (`spec.md` §4.A row 3: "Pure Ed25519
//! verify of (R||S, digest)").

use ed25519_dalek::{Signature, VerifyingKey};

use crate::error::CryptoError;

pub fn verify(pubkey: &[u8], digest: &[u8; 32], r: &[u8], s: &[u8]) -> Result<(), CryptoError> {
    if pubkey.len() != 32 {
        return Err(CryptoError::MalformedPublicKey);
    }
    let mut pk = [0u8; 32];
    pk.copy_from_slice(pubkey);
    let verifying_key = VerifyingKey::from_bytes(&pk).map_err(|_| CryptoError::MalformedPublicKey)?;

    if r.len() != 32 || s.len() != 32 {
        return Err(CryptoError::MalformedSignature);
    }
    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(r);
    sig_bytes[32..].copy_from_slice(s);
    let signature = Signature::from_bytes(&sig_bytes);

    verifying_key
        .verify_strict(digest, &signature)
        .map_err(|_| CryptoError::VerificationFailed)
}
