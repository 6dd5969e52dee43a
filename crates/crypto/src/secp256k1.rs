//! secp256k1 ECDSA: verification for the signer-scheme path and
//! recovery for the bootstrap exception (`spec.md` §4.A, §4.B step 4),
//! grounded in the teacher's `recover_address` in
//! `crates/common/types/transaction.rs`.

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};

use crate::error::CryptoError;
use crate::keccak::address_from_pubkey_tail;
use gtos_common::Address;

/// Verifies an ECDSA signature over `digest` against an uncompressed
/// (65-byte, `0x04`-prefixed) public key.
pub fn verify(pubkey_uncompressed: &[u8], digest: &[u8; 32], r: &[u8], s: &[u8]) -> Result<(), CryptoError> {
    use k256::ecdsa::signature::hazmat::PrehashVerifier;

    let verifying_key =
        VerifyingKey::from_sec1_bytes(pubkey_uncompressed).map_err(|_| CryptoError::MalformedPublicKey)?;
    let signature = signature_from_parts(r, s)?;
    verifying_key
        .verify_prehash(digest, &signature)
        .map_err(|_| CryptoError::VerificationFailed)
}

/// `ecrecover(hash, v, r, s) -> address` (`spec.md` §6 host primitive,
/// and the bootstrap-exception address recovery of §4.B step 4).
pub fn ecrecover(digest: &[u8; 32], recovery_id: u8, r: &[u8], s: &[u8]) -> Result<Address, CryptoError> {
    let signature = signature_from_parts(r, s)?;
    let recovery_id = RecoveryId::from_byte(recovery_id).ok_or(CryptoError::RecoveryFailed)?;
    let verifying_key = VerifyingKey::recover_from_prehash(digest, &signature, recovery_id)
        .map_err(|_| CryptoError::RecoveryFailed)?;
    let uncompressed = verifying_key.to_encoded_point(false);
    Ok(address_from_pubkey_tail(&uncompressed.as_bytes()[1..]))
}

fn signature_from_parts(r: &[u8], s: &[u8]) -> Result<Signature, CryptoError> {
    let mut bytes = [0u8; 64];
    if r.len() > 32 || s.len() > 32 {
        return Err(CryptoError::MalformedSignature);
    }
    bytes[32 - r.len()..32].copy_from_slice(r);
    bytes[64 - s.len()..].copy_from_slice(s);
    Signature::from_slice(&bytes).map_err(|_| CryptoError::MalformedSignature)
}

/// Canonicalises a compressed or uncompressed SEC1 point to its
/// uncompressed (65-byte, `0x04`-prefixed) form.
pub fn normalise_uncompressed(raw_pub: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let key = VerifyingKey::from_sec1_bytes(raw_pub).map_err(|_| CryptoError::MalformedPublicKey)?;
    Ok(key.to_encoded_point(false).as_bytes().to_vec())
}

/// Canonical address derivation: keccak(pubkey-without-prefix)
/// truncated to this chain's 32-byte address width.
pub fn derive_address(pubkey_uncompressed: &[u8]) -> Result<Address, CryptoError> {
    if pubkey_uncompressed.len() != 65 || pubkey_uncompressed[0] != 0x04 {
        return Err(CryptoError::MalformedPublicKey);
    }
    Ok(address_from_pubkey_tail(&pubkey_uncompressed[1..]))
}
