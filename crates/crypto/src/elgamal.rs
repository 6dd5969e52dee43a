//! Ristretto255 Elgamal signer scheme (`spec.md` §4.A row 5: "32 B
//! ristretto255 point" public key, "scheme-specific signature over
//! digest (R=32,S=32)"). This is a Schnorr-style signature over the
//! ristretto255 group — the same construction the private-balance
//! engine's additively-homomorphic ciphertexts are built on
//! (`spec.md` §7), just applied to transaction authentication instead
//! of to balances.

use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use sha2::Sha512;

use crate::error::CryptoError;

fn challenge(r_point: &CompressedRistretto, pubkey: &CompressedRistretto, digest: &[u8; 32]) -> Scalar {
    let mut input = Vec::with_capacity(32 + 32 + 32);
    input.extend_from_slice(r_point.as_bytes());
    input.extend_from_slice(pubkey.as_bytes());
    input.extend_from_slice(digest);
    Scalar::hash_from_bytes::<Sha512>(&input)
}

/// Verifies `s*G == R + challenge(R, pubkey, digest)*pubkey`.
pub fn verify(pubkey: &[u8], digest: &[u8; 32], r: &[u8], s: &[u8]) -> Result<(), CryptoError> {
    if pubkey.len() != 32 || r.len() != 32 || s.len() != 32 {
        return Err(CryptoError::MalformedPublicKey);
    }
    let mut pk_bytes = [0u8; 32];
    pk_bytes.copy_from_slice(pubkey);
    let pubkey_point = CompressedRistretto(pk_bytes);
    let pubkey_decompressed = pubkey_point
        .decompress()
        .ok_or(CryptoError::MalformedPublicKey)?;

    let mut r_bytes = [0u8; 32];
    r_bytes.copy_from_slice(r);
    let r_point = CompressedRistretto(r_bytes);
    let r_decompressed = r_point.decompress().ok_or(CryptoError::MalformedSignature)?;

    let mut s_bytes = [0u8; 32];
    s_bytes.copy_from_slice(s);
    let s_scalar = Scalar::from_canonical_bytes(s_bytes)
        .into_option()
        .ok_or(CryptoError::MalformedSignature)?;

    let c = challenge(&r_point, &pubkey_point, digest);
    let lhs: RistrettoPoint = s_scalar * RISTRETTO_BASEPOINT_POINT;
    let rhs = r_decompressed + c * pubkey_decompressed;

    if lhs.compress() == rhs.compress() {
        Ok(())
    } else {
        Err(CryptoError::VerificationFailed)
    }
}
