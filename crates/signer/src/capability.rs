//! Component A: the per-scheme capability set `{normalise,
//! derive_address, verify}` (`spec.md` §4.A). An exhaustive `match` per
//! operation rather than a runtime registry, per `spec.md` §9's design
//! note — adding a scheme is a compile-time event that forces every
//! site below to be updated.

use gtos_common::{Address, Scheme};
use gtos_crypto::keccak::keccak256;

use crate::error::SignerError;

/// Validates and canonicalises a raw public key for `scheme`. For the
/// two ECDSA schemes this normalises compressed points to the
/// uncompressed SEC1 encoding; the others are already in their single
/// canonical form.
pub fn normalise(scheme: Scheme, raw_pub: &[u8]) -> Result<Vec<u8>, SignerError> {
    match scheme {
        Scheme::Secp256k1 => Ok(gtos_crypto::secp256k1::normalise_uncompressed(raw_pub)?),
        Scheme::Secp256r1 => Ok(gtos_crypto::secp256r1::normalise_uncompressed(raw_pub)?),
        Scheme::Ed25519 | Scheme::Schnorr | Scheme::Elgamal => {
            if raw_pub.len() != 32 {
                return Err(SignerError::InvalidPublicKey);
            }
            Ok(raw_pub.to_vec())
        }
        Scheme::Bls12381 => {
            if raw_pub.len() != 48 {
                return Err(SignerError::InvalidPublicKey);
            }
            Ok(raw_pub.to_vec())
        }
    }
}

/// Deterministic, bijective (per scheme) address derivation. Secp256k1
/// uses the plain digest of the key; every other scheme keccaks a
/// scheme-tagged preimage so the same raw bytes can never collide
/// across schemes (`spec.md` §4.A: "keccak of scheme-tagged pubkey").
pub fn derive_address(scheme: Scheme, canonical_pub: &[u8]) -> Address {
    match scheme {
        Scheme::Secp256k1 => Address(keccak256(&canonical_pub[1..]).0),
        other => {
            let mut preimage = Vec::with_capacity(canonical_pub.len() + 1);
            preimage.push(scheme_tag(other));
            preimage.extend_from_slice(canonical_pub);
            Address(keccak256(&preimage).0)
        }
    }
}

fn scheme_tag(scheme: Scheme) -> u8 {
    match scheme {
        Scheme::Secp256k1 => 0,
        Scheme::Secp256r1 => 1,
        Scheme::Ed25519 => 2,
        Scheme::Schnorr => 3,
        Scheme::Elgamal => 4,
        Scheme::Bls12381 => 5,
    }
}

/// `verify(scheme, pub, digest, R, S) -> bool`, no side effects.
pub fn verify(scheme: Scheme, public_key: &[u8], digest: &[u8; 32], r: &[u8], s: &[u8]) -> bool {
    let result = match scheme {
        Scheme::Secp256k1 => gtos_crypto::secp256k1::verify(public_key, digest, r, s),
        Scheme::Secp256r1 => gtos_crypto::secp256r1::verify(public_key, digest, r, s),
        Scheme::Ed25519 => gtos_crypto::ed25519::verify(public_key, digest, r, s),
        Scheme::Schnorr => gtos_crypto::schnorr::verify(public_key, digest, r, s),
        Scheme::Elgamal => gtos_crypto::elgamal::verify(public_key, digest, r, s),
        Scheme::Bls12381 => gtos_crypto::bls::verify(public_key, digest, r, s),
    };
    result.is_ok()
}
