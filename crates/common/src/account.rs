//! On-chain account state (`spec.md` §3).

use serde::{Deserialize, Serialize};

use crate::fixed::{Digest, U256};

/// `{ nonce, balance, code_hash, storage_root }`. An EOA is an account
/// whose `code_hash` equals [`EMPTY_CODE_HASH`]. Mutation only ever
/// happens through the state transition (component E) — this type
/// itself has no setters beyond plain field access so that every
/// mutation site in the crate graph is visible to a reviewer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub nonce: u64,
    pub balance: U256,
    pub code_hash: Digest,
    pub storage_root: Digest,
}

/// keccak256(b"") — the code hash of an externally-owned account.
pub const EMPTY_CODE_HASH: Digest = Digest([
    0xc5, 0xd2, 0x46, 0x01, 0x86, 0xf7, 0x23, 0x3c, 0x92, 0x7e, 0x7d, 0xb2, 0xdc, 0xc7, 0x03, 0xc0,
    0xe5, 0x00, 0xb6, 0x53, 0xca, 0x82, 0x27, 0x3b, 0x7b, 0xfa, 0xd8, 0x04, 0x5d, 0x85, 0xa4, 0x70,
]);

impl Default for Account {
    fn default() -> Self {
        Self {
            nonce: 0,
            balance: U256::ZERO,
            code_hash: EMPTY_CODE_HASH,
            storage_root: Digest::ZERO,
        }
    }
}

impl Account {
    /// `spec.md` §4.E pre-check 1: "sender not a contract".
    pub fn is_eoa(&self) -> bool {
        self.code_hash == EMPTY_CODE_HASH
    }

    pub fn is_empty(&self) -> bool {
        self.nonce == 0 && self.balance == U256::ZERO && self.is_eoa()
    }
}
