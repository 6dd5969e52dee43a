//! Encrypted account balances for the Shield/Transfer/Unshield engine
//! (`spec.md` §7, component G).
//!
//! A private balance is an additively-homomorphic ElGamal ciphertext
//! over ristretto255 (ElGamal scheme, `spec.md` §4.A): a `(commitment,
//! handle)` pair, each 32 bytes, plus a monotonic version counter that
//! every successful Shield/Transfer/Unshield bumps by exactly one so
//! replayed proofs bound to a stale version are rejected.

use serde::{Deserialize, Serialize};

use crate::fixed::Digest;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
    pub commitment: Digest,
    pub handle: Digest,
}

impl Ciphertext {
    pub const ZERO: Self = Self {
        commitment: Digest::ZERO,
        handle: Digest::ZERO,
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateBalance {
    pub ciphertext: Ciphertext,
    pub version: u64,
}

impl Default for PrivateBalance {
    fn default() -> Self {
        Self {
            ciphertext: Ciphertext::ZERO,
            version: 0,
        }
    }
}

impl PrivateBalance {
    /// Advances the version counter after a successful Shield/Transfer/
    /// Unshield, replacing the ciphertext with the caller-supplied
    /// homomorphic update. Returns `None` on version-counter overflow
    /// (`u64::MAX` reached — treated as an un-spendable terminal state
    /// rather than wrapping, since wrapping would let a stale proof
    /// become valid again).
    pub fn advance(&self, new_ciphertext: Ciphertext) -> Option<Self> {
        Some(Self {
            ciphertext: new_ciphertext,
            version: self.version.checked_add(1)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_bumps_version_by_one() {
        let balance = PrivateBalance::default();
        let next = balance
            .advance(Ciphertext {
                commitment: Digest([1u8; 32]),
                handle: Digest([2u8; 32]),
            })
            .expect("does not overflow");
        assert_eq!(next.version, 1);
    }

    #[test]
    fn advance_rejects_at_max_version() {
        let balance = PrivateBalance {
            ciphertext: Ciphertext::ZERO,
            version: u64::MAX,
        };
        assert!(balance.advance(Ciphertext::ZERO).is_none());
    }
}
