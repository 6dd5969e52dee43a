//! The account/storage arena: copy-on-write snapshot/revert and a
//! deterministic state commitment (`spec.md` §3, §5).

pub mod db;
pub mod journal;
pub mod root;

pub use db::StateDb;
pub use journal::Snapshot;
