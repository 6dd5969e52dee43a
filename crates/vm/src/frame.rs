//! Per-invocation context (`spec.md` §4.G "Context properties", §9
//! "Nested scripted calls": each frame owns its own gas counter,
//! readonly flag and snapshot id).

use gtos_common::{Address, U256};

use crate::environment::{BlockContext, MsgContext, TxContext};

pub struct Env<'a> {
    pub block: &'a BlockContext,
    pub tx: &'a TxContext,
}

#[derive(Clone, Debug)]
pub struct Frame {
    pub self_address: Address,
    pub caller: Address,
    pub msg: MsgContext,
    pub value: U256,
    pub depth: u32,
    pub readonly: bool,
}
