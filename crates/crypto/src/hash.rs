//! `sha256` and `ripemd160`, the two non-keccak digests exposed to
//! scripted contracts (`spec.md` §6: "Cryptographic primitives:
//! keccak256, sha256, ripemd160 (left-padded to 32 B)...").

use ripemd::Ripemd160;
use sha2::{Digest as _, Sha256};

pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// ripemd160 digest, left-padded into a 32-byte word per the host API
/// contract.
pub fn ripemd160_padded(data: &[u8]) -> [u8; 32] {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out[12..].copy_from_slice(&digest);
    out
}
