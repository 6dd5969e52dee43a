//! Additive combination of private-balance ciphertexts (`spec.md` §4.H
//! Transfer: "receiver PrivateBalance ← combine(receiver.ciphertext,
//! receiver_delta)"), via ristretto255 point addition on each of the
//! two ElGamal components — the same group `elgamal.rs` signs over.

use curve25519_dalek::ristretto::CompressedRistretto;

use crate::error::CryptoError;

/// Adds two compressed ristretto points component-wise. Used for both
/// the `commitment` and `handle` halves of a [`gtos_common::Ciphertext`]
/// since ElGamal ciphertexts combine homomorphically component-wise.
pub fn add_points(a: &[u8; 32], b: &[u8; 32]) -> Result<[u8; 32], CryptoError> {
    let a_point = CompressedRistretto(*a)
        .decompress()
        .ok_or(CryptoError::MalformedPublicKey)?;
    let b_point = CompressedRistretto(*b)
        .decompress()
        .ok_or(CryptoError::MalformedPublicKey)?;
    Ok((a_point + b_point).compress().to_bytes())
}
