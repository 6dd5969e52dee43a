//! Per-frame context exposed to scripts as the `block`, `tx` and `msg`
//! namespaces (`spec.md` §4.G "Context properties"), generalized from
//! `ethrex_levm::environment::Environment`'s block/tx-header split.

use gtos_common::{Address, U256};

#[derive(Clone, Debug)]
pub struct BlockContext {
    pub number: u64,
    pub timestamp: u64,
    pub coinbase: Address,
    pub chain_id: u64,
    pub gas_limit: u64,
    pub base_fee: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct TxContext {
    pub origin: Address,
    pub gas_price: U256,
}

/// Static for the lifetime of one frame: `caller`/`value`/`self` plus
/// the message-level view (`msg.sender/value/data/sig`), which for the
/// outermost frame equals caller/value/calldata but differs inside a
/// nested `call`/`staticcall` child frame.
#[derive(Clone, Debug)]
pub struct MsgContext {
    pub sender: Address,
    pub value: U256,
    pub data: Vec<u8>,
    pub sig: [u8; 4],
}
