//! BIP340 Schnorr verification over secp256k1, keyed by a 32-byte
//! x-only public key (`spec.md` §4.A row 4).

use k256::schnorr::{signature::Verifier, Signature, VerifyingKey};

use crate::error::CryptoError;

pub fn verify(pubkey_x_only: &[u8], digest: &[u8; 32], r: &[u8], s: &[u8]) -> Result<(), CryptoError> {
    if pubkey_x_only.len() != 32 || r.len() != 32 || s.len() != 32 {
        return Err(CryptoError::MalformedPublicKey);
    }
    let verifying_key = VerifyingKey::from_bytes(pubkey_x_only).map_err(|_| CryptoError::MalformedPublicKey)?;

    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(r);
    sig_bytes[32..].copy_from_slice(s);
    let signature = Signature::try_from(sig_bytes.as_slice()).map_err(|_| CryptoError::MalformedSignature)?;

    verifying_key
        .verify(digest, &signature)
        .map_err(|_| CryptoError::VerificationFailed)
}
