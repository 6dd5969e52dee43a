//! Shared data model for the execution core: fixed-width types, the
//! account-signer scheme registry, transaction/message shapes, logs,
//! receipts and the storage records (TTL, private balances) every
//! other crate in the workspace builds on.

pub mod account;
pub mod addresses;
pub mod error;
pub mod fixed;
pub mod log;
pub mod message;
pub mod private_balance;
pub mod receipt;
pub mod scheme;
pub mod system_action;
pub mod transaction;
pub mod ttl;

pub use account::Account;
pub use addresses::{PRIVACY_ROUTER_ADDRESS, SYSTEM_ACTION_ADDRESS};
pub use error::CommonError;
pub use fixed::{Address, Digest, StorageSlot, StorageWord, U256};
pub use log::Log;
pub use message::Message;
pub use private_balance::{Ciphertext, PrivateBalance};
pub use receipt::{Receipt, TxStatus};
pub use scheme::{Scheme, SignerMetadata};
pub use system_action::{SystemAction, SystemActionError};
pub use transaction::{AccessListEntry, LegacyTransaction, SignatureTuple, SignerTransaction, Transaction};
pub use ttl::TtlRecord;
