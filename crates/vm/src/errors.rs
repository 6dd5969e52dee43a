use thiserror::Error;

/// `spec.md` §4.G / §7 "execution-failed" taxonomy for the scripted VM.
/// Every variant here reverts the enclosing snapshot; the containing
/// state transition still finalises fee/nonce/coinbase bookkeeping.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum VMError {
    #[error("out of gas")]
    OutOfGas,

    #[error("require failed: {0}")]
    RequireFailed(String),

    #[error("revert: {0}")]
    Revert(String),

    #[error("structured revert")]
    StructuredRevert(Vec<u8>),

    #[error("call depth exceeded maximum of 8")]
    CallDepthExceeded,

    #[error("state mutation attempted in a readonly frame")]
    ReadonlyViolation,

    #[error("emit is forbidden in a readonly frame")]
    EmitInReadonly,

    #[error("too many indexed log parameters (max 3)")]
    TooManyIndexedParams,

    #[error("array index out of bounds")]
    ArrayOutOfBounds,

    #[error("array is empty")]
    ArrayEmpty,

    #[error("program counter out of range")]
    InvalidProgramCounter,

    #[error("stack underflow")]
    StackUnderflow,

    #[error("type mismatch evaluating a host operation")]
    TypeMismatch,

    #[error("ecrecover input malformed")]
    MalformedEcrecoverInput,

    #[error("deploy forbidden in a readonly frame")]
    DeployInReadonly,
}
