//! The account/storage arena (`spec.md` §3) with copy-on-write
//! snapshot/revert, generalized from `ethrex_levm::db::{Database,
//! CachingDatabase}`'s `FxHashMap`-backed caching pattern — but since
//! on-disk trie persistence is an explicit non-goal here, this is the
//! *only* storage tier (no backing disk database to fall through to).

use rustc_hash::FxHashMap;

use gtos_common::{Account, Address, Digest, PrivateBalance, Scheme, SignerMetadata, StorageSlot, StorageWord, TtlRecord};
use gtos_crypto::keccak256;
use gtos_signer::SignerRegistry;

use crate::journal::{JournalEntry, Snapshot};

#[derive(Default)]
pub struct StateDb {
    accounts: FxHashMap<Address, Account>,
    storage: FxHashMap<(Address, StorageSlot), StorageWord>,
    code: FxHashMap<Digest, Vec<u8>>,
    private_balances: FxHashMap<Address, PrivateBalance>,
    signer_metadata: FxHashMap<Address, SignerMetadata>,
    /// `(code_hash, created_at, expire_at)` for the set-code/TTL path
    /// (`spec.md` §4.I); absent entry means "no code, no TTL".
    set_code: FxHashMap<Address, (Digest, u64, u64)>,
    ttl_kv: FxHashMap<(Address, Vec<u8>, Vec<u8>), TtlRecord>,
    journal: Vec<JournalEntry>,
}

impl StateDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.journal.len())
    }

    /// Undoes every journalled change recorded since `snapshot`, in
    /// reverse order (LIFO), restoring prior values or removing entries
    /// that did not exist before the snapshot.
    pub fn revert_to(&mut self, snapshot: Snapshot) {
        while self.journal.len() > snapshot.0 {
            let Some(entry) = self.journal.pop() else {
                break;
            };
            match entry {
                JournalEntry::Account { address, prev } => match prev {
                    Some(account) => {
                        self.accounts.insert(address, account);
                    }
                    None => {
                        self.accounts.remove(&address);
                    }
                },
                JournalEntry::Storage { address, slot, prev } => match prev {
                    Some(word) => {
                        self.storage.insert((address, slot), word);
                    }
                    None => {
                        self.storage.remove(&(address, slot));
                    }
                },
                JournalEntry::PrivateBalance { address, prev } => match prev {
                    Some(balance) => {
                        self.private_balances.insert(address, balance);
                    }
                    None => {
                        self.private_balances.remove(&address);
                    }
                },
                JournalEntry::SignerMetadata { address, prev } => match prev {
                    Some(metadata) => {
                        self.signer_metadata.insert(address, metadata);
                    }
                    None => {
                        self.signer_metadata.remove(&address);
                    }
                },
                JournalEntry::SetCode { address, prev } => match prev {
                    Some(entry) => {
                        self.set_code.insert(address, entry);
                    }
                    None => {
                        self.set_code.remove(&address);
                    }
                },
                JournalEntry::TtlKv {
                    address,
                    namespace,
                    key,
                    prev,
                } => match prev {
                    Some(record) => {
                        self.ttl_kv.insert((address, namespace, key), record);
                    }
                    None => {
                        self.ttl_kv.remove(&(address, namespace, key));
                    }
                },
            }
        }
    }

    /// Discards the journal back to (but not past) `snapshot`, making
    /// the changes since then permanent. There is no nested-substate
    /// bookkeeping to merge into a parent (see `journal.rs` doc
    /// comment), so commit is just "stop tracking for undo".
    pub fn commit(&mut self, snapshot: Snapshot) {
        self.journal.truncate(snapshot.0);
    }

    pub fn get_account(&self, address: Address) -> Account {
        self.accounts.get(&address).cloned().unwrap_or_default()
    }

    pub fn set_account(&mut self, address: Address, account: Account) {
        let prev = self.accounts.insert(address, account);
        self.journal.push(JournalEntry::Account { address, prev });
    }

    pub fn get_storage(&self, address: Address, slot: StorageSlot) -> StorageWord {
        self.storage.get(&(address, slot)).copied().unwrap_or(StorageWord::ZERO)
    }

    pub fn set_storage(&mut self, address: Address, slot: StorageSlot, value: StorageWord) {
        let prev = if value == StorageWord::ZERO {
            self.storage.remove(&(address, slot))
        } else {
            self.storage.insert((address, slot), value)
        };
        self.journal.push(JournalEntry::Storage { address, slot, prev });
    }

    pub fn get_code(&self, code_hash: Digest) -> Option<&[u8]> {
        self.code.get(&code_hash).map(Vec::as_slice)
    }

    /// Code is stored content-addressed and never mutated once present
    /// (identical bytes hash identically), so this is not journalled.
    pub fn install_code(&mut self, bytes: Vec<u8>) -> Digest {
        let hash = keccak256(&bytes);
        self.code.entry(hash).or_insert(bytes);
        hash
    }

    pub fn get_private_balance(&self, address: Address) -> PrivateBalance {
        self.private_balances.get(&address).copied().unwrap_or_default()
    }

    pub fn set_private_balance(&mut self, address: Address, balance: PrivateBalance) {
        let prev = self.private_balances.insert(address, balance);
        self.journal.push(JournalEntry::PrivateBalance { address, prev });
    }

    pub fn set_signer_metadata(&mut self, address: Address, scheme: Scheme, public_key: Vec<u8>) {
        let prev = self.signer_metadata.insert(address, SignerMetadata { scheme, public_key });
        self.journal.push(JournalEntry::SignerMetadata { address, prev });
    }

    pub fn get_signer_metadata(&self, address: Address) -> Option<SignerMetadata> {
        self.signer_metadata.get(&address).cloned()
    }

    /// Live set-code entry for `address` at block `now`, honoring lazy
    /// expiry (`spec.md` §4.I): an entry past `expire_at` is treated as
    /// absent without being physically removed.
    pub fn live_code_hash(&self, address: Address, now: u64) -> Option<Digest> {
        let (hash, _created_at, expire_at) = self.set_code.get(&address).copied()?;
        if now >= expire_at {
            None
        } else {
            Some(hash)
        }
    }

    pub fn set_code_with_ttl(&mut self, address: Address, code_hash: Digest, created_at: u64, expire_at: u64) {
        let prev = self.set_code.insert(address, (code_hash, created_at, expire_at));
        self.journal.push(JournalEntry::SetCode { address, prev });
    }

    pub fn get_ttl_kv(&self, address: Address, namespace: &[u8], key: &[u8], now: u64) -> Option<&[u8]> {
        self.ttl_kv
            .get(&(address, namespace.to_vec(), key.to_vec()))
            .and_then(|record| record.value_if_live(now))
    }

    pub fn put_ttl_kv(&mut self, address: Address, namespace: Vec<u8>, key: Vec<u8>, record: TtlRecord) {
        let map_key = (address, namespace.clone(), key.clone());
        let prev = self.ttl_kv.insert(map_key, record);
        self.journal.push(JournalEntry::TtlKv {
            address,
            namespace,
            key,
            prev,
        });
    }

    /// `spec.md` §4.F `KVDelete`: "mark record's length slot zero" —
    /// modeled here as an immediately-expired record rather than a
    /// physical removal, consistent with the no-physical-delete
    /// discipline the TTL path already uses.
    pub fn delete_ttl_kv(&mut self, address: Address, namespace: Vec<u8>, key: Vec<u8>, now: u64) {
        self.put_ttl_kv(address, namespace, key, TtlRecord::new(Vec::new(), now, 0));
    }
}

impl SignerRegistry for StateDb {
    fn get(&self, address: Address) -> Option<SignerMetadata> {
        self.signer_metadata.get(&address).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revert_restores_prior_account() {
        let mut db = StateDb::new();
        let addr = Address([1u8; 32]);
        db.set_account(addr, Account { nonce: 1, ..Default::default() });
        let snap = db.snapshot();
        db.set_account(addr, Account { nonce: 2, ..Default::default() });
        assert_eq!(db.get_account(addr).nonce, 2);
        db.revert_to(snap);
        assert_eq!(db.get_account(addr).nonce, 1);
    }

    #[test]
    fn revert_removes_account_created_after_snapshot() {
        let mut db = StateDb::new();
        let addr = Address([2u8; 32]);
        let snap = db.snapshot();
        db.set_account(addr, Account { nonce: 5, ..Default::default() });
        db.revert_to(snap);
        assert_eq!(db.get_account(addr), Account::default());
    }

    #[test]
    fn commit_makes_changes_permanent() {
        let mut db = StateDb::new();
        let addr = Address([3u8; 32]);
        let snap = db.snapshot();
        db.set_account(addr, Account { nonce: 9, ..Default::default() });
        db.commit(snap);
        let new_snap = db.snapshot();
        db.revert_to(new_snap);
        assert_eq!(db.get_account(addr).nonce, 9);
    }

    #[test]
    fn revert_restores_prior_signer_metadata() {
        let mut db = StateDb::new();
        let addr = Address([5u8; 32]);
        db.set_signer_metadata(addr, Scheme::Ed25519, vec![1, 2, 3]);
        let snap = db.snapshot();
        db.set_signer_metadata(addr, Scheme::Secp256k1, vec![4, 5, 6]);
        assert_eq!(db.get_signer_metadata(addr).expect("metadata set").scheme, Scheme::Secp256k1);
        db.revert_to(snap);
        assert_eq!(db.get_signer_metadata(addr).expect("metadata set").scheme, Scheme::Ed25519);
    }

    #[test]
    fn revert_removes_signer_metadata_set_after_snapshot() {
        let mut db = StateDb::new();
        let addr = Address([6u8; 32]);
        let snap = db.snapshot();
        db.set_signer_metadata(addr, Scheme::Ed25519, vec![1, 2, 3]);
        assert!(db.get_signer_metadata(addr).is_some());
        db.revert_to(snap);
        assert_eq!(db.get_signer_metadata(addr), None);
    }

    #[test]
    fn ttl_kv_lazy_expiry() {
        let mut db = StateDb::new();
        let addr = Address([4u8; 32]);
        db.put_ttl_kv(addr, b"ns".to_vec(), b"k".to_vec(), TtlRecord::new(vec![1, 2, 3], 100, 10));
        assert_eq!(db.get_ttl_kv(addr, b"ns", b"k", 105), Some(&[1u8, 2, 3][..]));
        assert_eq!(db.get_ttl_kv(addr, b"ns", b"k", 110), None);
    }
}
