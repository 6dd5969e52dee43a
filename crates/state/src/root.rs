//! Deterministic state commitment. On-disk trie encoding is an
//! explicit non-goal (`spec.md` Non-goals), so rather than a real
//! Merkle-Patricia trie this folds sorted `(address, account-digest)`
//! pairs through keccak — enough to let two executions of the same
//! block compare post-states byte-for-byte (`spec.md` §4.J's parallel-
//! vs-serial parity requirement), without committing to a trie layout.

use gtos_common::{Account, Address, Digest};
use gtos_crypto::keccak256;

use crate::db::StateDb;

impl StateDb {
    pub fn state_root(&self, touched: &[Address]) -> Digest {
        let mut entries: Vec<(Address, Account)> = touched
            .iter()
            .map(|&address| (address, self.get_account(address)))
            .collect();
        entries.sort_by_key(|(address, _)| address.0);
        entries.dedup_by_key(|(address, _)| *address);

        let mut preimage = Vec::with_capacity(entries.len() * 96);
        for (address, account) in entries {
            preimage.extend_from_slice(&address.0);
            preimage.extend_from_slice(&account.nonce.to_be_bytes());
            preimage.extend_from_slice(&account.balance.to_big_endian());
            preimage.extend_from_slice(&account.code_hash.0);
            preimage.extend_from_slice(&account.storage_root.0);
        }
        keccak256(&preimage)
    }
}
