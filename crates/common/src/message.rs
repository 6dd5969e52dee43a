//! The chain-agnostic `Message` produced by sender resolution
//! (`spec.md` §4.B step 5) and consumed by the state transition
//! function (component E). Mirrors the teacher's pattern of lowering a
//! wire-format `Transaction` into an execution-ready `Message` before
//! the VM ever sees it.

use crate::fixed::{Address, U256};
use crate::transaction::AccessListEntry;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub from: Address,
    pub to: Option<Address>,
    pub nonce: u64,
    pub value: U256,
    pub gas_limit: u64,
    /// `min(fee_cap, base_fee + tip_cap)` (`spec.md` §4.D).
    pub effective_gas_price: U256,
    pub fee_cap: U256,
    pub tip_cap: U256,
    pub data: Vec<u8>,
    pub access_list: Vec<AccessListEntry>,
    /// Set for simulation/estimation calls that must never mutate state
    /// or charge gas from a real balance (`spec.md` §4.E Non-goals note
    /// on read-only calls).
    pub is_fake_call: bool,
}

impl Message {
    pub fn is_create(&self) -> bool {
        self.to.is_none()
    }
}
