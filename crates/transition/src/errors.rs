//! Error taxonomy for component E (`spec.md` §4.E, §7): pre-check
//! failures are consensus-fatal (the whole block fails to import,
//! `spec.md` §7 "Consensus-fatal errors"); execution-failed errors are
//! caught by the state transition and turned into a `status = 0`
//! receipt without aborting the block.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreCheckError {
    #[error("sender account has code and is not a valid transaction origin")]
    ErrSenderIsContract,

    #[error("nonce too low: tx nonce {got}, account nonce {expected}")]
    ErrNonceTooLow { expected: u64, got: u64 },

    #[error("nonce too high: tx nonce {got}, account nonce {expected}")]
    ErrNonceTooHigh { expected: u64, got: u64 },

    #[error("sender nonce is already at u64::MAX")]
    ErrNonceMax,

    #[error("intrinsic gas {intrinsic} exceeds tx gas limit {limit}")]
    ErrIntrinsicGas { intrinsic: u64, limit: u64 },

    #[error("sender balance insufficient for gas*price + value")]
    ErrInsufficientFunds,

    #[error(transparent)]
    GasPool(#[from] gtos_gas::GasPoolError),
}

/// Execution-failed: caught by `apply_transaction`, yields a
/// `status = 0` receipt; nonce, fee debit, and coinbase credit already
/// applied outside any dispatch snapshot still persist (`spec.md`
/// §4.E "Snapshots" note).
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error(transparent)]
    SetCode(#[from] gtos_system::SetCodeError),

    #[error(transparent)]
    System(#[from] gtos_system::SystemActionExecError),

    #[error(transparent)]
    Privacy(#[from] gtos_privacy::PrivacyError),

    #[error(transparent)]
    Vm(#[from] gtos_vm::VMError),

    #[error("destination's installed code is not a valid compiled script")]
    ErrMalformedScriptCode,
}
