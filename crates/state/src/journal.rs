//! Snapshot/revert journal, generalized from the teacher's
//! `ethrex_levm::vm::Substate` checkpoint chain
//! (`push_backup`/`commit_backup`/`revert_backup`). The teacher nests
//! `Substate`s recursively via `parent: Option<Box<Self>>` because EVM
//! call frames need their own access-list/selfdestruct-set scoping; this
//! core only needs "undo everything since snapshot N", so a flat vector
//! of undo entries plus a length marker is sufficient and avoids the
//! extra indirection.

use gtos_common::{Account, Address, Digest, PrivateBalance, SignerMetadata, StorageSlot, StorageWord, TtlRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot(pub usize);

#[derive(Clone, Debug)]
pub(crate) enum JournalEntry {
    Account {
        address: Address,
        prev: Option<Account>,
    },
    Storage {
        address: Address,
        slot: StorageSlot,
        prev: Option<StorageWord>,
    },
    PrivateBalance {
        address: Address,
        prev: Option<PrivateBalance>,
    },
    SignerMetadata {
        address: Address,
        prev: Option<SignerMetadata>,
    },
    SetCode {
        address: Address,
        prev: Option<(Digest, u64, u64)>,
    },
    TtlKv {
        address: Address,
        namespace: Vec<u8>,
        key: Vec<u8>,
        prev: Option<TtlRecord>,
    },
}
