//! Account-signer scheme tags and on-chain signer metadata (`spec.md` §3,
//! §4.A). `Scheme` is an exhaustive enum rather than a runtime registry,
//! per the design note in `spec.md` §9: adding a scheme is a
//! compile-time event that forces every `match` site to be updated.

use serde::{Deserialize, Serialize};

use crate::fixed::Address;

/// Supported account-signer schemes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scheme {
    Secp256k1,
    Secp256r1,
    Ed25519,
    Schnorr,
    Elgamal,
    Bls12381,
}

impl Scheme {
    /// Canonical public-key byte width for this scheme (`spec.md` §4.A).
    pub const fn public_key_len(self) -> usize {
        match self {
            Scheme::Secp256k1 => 65, // normalised to uncompressed
            Scheme::Secp256r1 => 65,
            Scheme::Ed25519 => 32,
            Scheme::Schnorr => 32,
            Scheme::Elgamal => 32,
            Scheme::Bls12381 => 48,
        }
    }

    /// Canonical (R, S) signature tuple widths for this scheme.
    pub const fn signature_widths(self) -> (usize, usize) {
        match self {
            Scheme::Secp256k1 => (32, 32),
            Scheme::Secp256r1 => (32, 32),
            Scheme::Ed25519 => (32, 32),
            Scheme::Schnorr => (32, 32),
            Scheme::Elgamal => (32, 32),
            Scheme::Bls12381 => (48, 48),
        }
    }

    /// Stable string identifier used as `Transaction::signer_type` and
    /// in system-action payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Secp256k1 => "Secp256k1",
            Scheme::Secp256r1 => "Secp256r1",
            Scheme::Ed25519 => "Ed25519",
            Scheme::Schnorr => "Schnorr",
            Scheme::Elgamal => "Elgamal",
            Scheme::Bls12381 => "BLS12381",
        }
    }

    pub fn from_str_id(s: &str) -> Option<Self> {
        Some(match s {
            "Secp256k1" => Scheme::Secp256k1,
            "Secp256r1" => Scheme::Secp256r1,
            "Ed25519" => Scheme::Ed25519,
            "Schnorr" => Scheme::Schnorr,
            "Elgamal" => Scheme::Elgamal,
            "BLS12381" => Scheme::Bls12381,
            _ => return None,
        })
    }
}

/// On-chain signer metadata for an address (`spec.md` §3). Stored at a
/// namespaced slot of the address; installed by `AccountSetSigner`
/// (`spec.md` §4.F) and never mutated except by that action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerMetadata {
    pub scheme: Scheme,
    /// Canonical public key bytes, width fixed by `scheme.public_key_len()`.
    pub public_key: Vec<u8>,
}

impl SignerMetadata {
    /// Invariant from `spec.md` §3: `address == derive(scheme, public_key)`.
    pub fn matches_address(&self, address: Address, derive: impl Fn(Scheme, &[u8]) -> Address) -> bool {
        derive(self.scheme, &self.public_key) == address
    }
}
