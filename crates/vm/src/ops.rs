//! `ScriptOp`: the compact instruction representing one host-API call
//! inside a compiled script body (`spec.md` GLOSSARY). A script is a
//! flat `Vec<ScriptOp>` executed by a program-counter loop (`vm.rs`),
//! rather than a tree-walking interpreter over source text — parsing a
//! concrete source language is out of scope (`spec.md` §1 treats
//! "script source bytes" as already compiled for this execution core).

use gtos_common::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::value::Value;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptOp {
    // --- stack manipulation ---
    Push(Value),
    Pop,
    Dup,

    // --- arithmetic / comparison (operate on the top two stack uints) ---
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Eq,
    And,
    Or,
    Not,

    // --- control flow: absolute jumps by instruction index ---
    Jump(usize),
    /// Pops the top of stack; jumps if it is falsy.
    JumpIfFalse(usize),

    // --- scalar storage: key is the top of stack (Bytes) ---
    StorageGet,
    /// value, key (value pushed first, then key on top)
    StorageSet,

    // --- string storage ---
    StrGet,
    StrSet,

    // --- dynamic array storage: key is `Bytes` beneath the index ---
    ArrLen(Vec<u8>),
    ArrGet(Vec<u8>),
    ArrSet(Vec<u8>),
    ArrPush(Vec<u8>),
    ArrPop(Vec<u8>),

    // --- named mappings: `name`, fixed key count ---
    MapGet { name: Vec<u8>, key_count: usize },
    MapSet { name: Vec<u8>, key_count: usize },

    // --- named structs ---
    StructGet { type_name: Vec<u8>, field: Vec<u8> },
    StructSet { type_name: Vec<u8>, field: Vec<u8> },

    // --- context properties ---
    CtxCaller,
    CtxValue,
    CtxSelf,
    CtxBlockNumber,
    CtxBlockTimestamp,
    CtxBlockCoinbase,
    CtxBlockChainId,
    CtxBlockGasLimit,
    CtxBlockBaseFee,
    CtxTxOrigin,
    CtxTxGasPrice,
    CtxMsgSender,
    CtxMsgValue,
    CtxMsgData,
    CtxMsgSig,

    // --- cryptographic primitives ---
    Keccak256,
    Sha256,
    Ripemd160,
    /// pops s, r, v, hash (in that push order) and pushes `Address` or `Nil`
    Ecrecover,
    Addmod,
    Mulmod,
    Blockhash,

    // --- binary helpers ---
    BytesFromHex,
    BytesToHex,
    BytesLen,
    BytesSlice,
    BytesFromUint256,
    BytesToUint256,

    // --- logging ---
    Emit {
        canonical_signature: String,
        indexed_count: usize,
        nonindexed_count: usize,
    },

    // --- control flow primitives ---
    Require(String),
    Revert(String),
    RevertStructured {
        canonical_signature: String,
        arg_count: usize,
    },

    /// Constructor gating (`spec.md` §4.G `oncreate`): if the one-time
    /// init flag is already set, jump to `skip_to` without running the
    /// constructor body; otherwise set the flag and fall through.
    OnCreateGuard { skip_to: usize },

    // --- cross-contract read proxy: pushes a proxy handle for `addr` ---
    AtProxy,
    ProxyGet,
    ProxyBalance,

    // --- calls ---
    Call { with_value: bool },
    StaticCall,
    Deploy { with_value: bool },

    /// Clean return: top of stack is the ABI-encoded return bytes.
    Return,
}

pub type Script = Vec<ScriptOp>;

/// Scripts are stored on-chain as their serialized `ScriptOp` sequence.
/// Decode failure (an account whose code is not a valid compiled
/// script) is treated as "no code" by callers, matching `spec.md`
/// §4.E's "otherwise → applyPlain" fallback for destinations without
/// script code.
pub fn decode_script(bytes: &[u8]) -> Option<Script> {
    serde_json::from_slice(bytes).ok()
}

pub fn encode_script(script: &Script) -> Vec<u8> {
    // Infallible: `Script` contains no non-serializable types.
    serde_json::to_vec(script).unwrap_or_default()
}

impl From<Address> for Value {
    fn from(value: Address) -> Self {
        Value::Address(value)
    }
}

impl From<U256> for Value {
    fn from(value: U256) -> Self {
        Value::Uint(value)
    }
}
