//! Component G: the sandboxed scripted-contract execution environment
//! (`spec.md` §4.G).

pub mod abi;
pub mod environment;
pub mod errors;
pub mod frame;
pub mod ops;
pub mod storage;
pub mod value;
pub mod vm;

pub use environment::{BlockContext, MsgContext, TxContext};
pub use errors::VMError;
pub use frame::{Env, Frame};
pub use ops::{decode_script, encode_script, Script, ScriptOp};
pub use value::Value;
pub use vm::{execute, ExecutionReport};
