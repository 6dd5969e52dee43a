//! keccak-256, the workhorse digest for address derivation, storage
//! slot derivation and event topics (`spec.md` §4.A, §6).

use sha3::{Digest as _, Keccak256};

use gtos_common::Digest;

pub fn keccak256(data: &[u8]) -> Digest {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let out = hasher.finalize();
    Digest(out.into())
}

/// `keccak(pubkey-without-prefix)` used directly as the 32-byte address
/// (`spec.md` §4.A, Secp256k1 row): unlike Ethereum's 20-byte address,
/// this chain's address width equals the digest width, so no
/// truncation/padding step is needed.
pub fn address_from_pubkey_tail(pubkey_xy: &[u8]) -> gtos_common::Address {
    gtos_common::Address(keccak256(pubkey_xy).0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak_empty_matches_known_constant() {
        let digest = keccak256(&[]);
        assert_eq!(digest, gtos_common::account::EMPTY_CODE_HASH);
    }
}
