//! Component E pre-checks (`spec.md` §4.E): pure reads against
//! pre-dispatch state. Any failure here is consensus-fatal — the
//! caller must not mutate state and must reject the whole block.

use gtos_common::Message;
use gtos_config::GasSchedule;
use gtos_gas::{intrinsic_gas, upfront_cost};
use gtos_system::{SetCodeError, SetCodePayload};

use crate::errors::PreCheckError;

/// `spec.md` §4.D: the `to == nil` (setCode) path adds a per-TTL-block
/// surcharge to intrinsic gas. A malformed setCode payload is not a
/// pre-check failure by itself (decode is re-attempted, and fails the
/// same way, inside `dispatch::apply_set_code` — `spec.md` §4.E's
/// dispatch table only names nonce/gas/balance as fatal pre-checks);
/// here it simply contributes no surcharge, so the tx still pays at
/// least base + data cost before failing in dispatch.
fn feature_surcharge(msg: &Message, schedule: &GasSchedule) -> u64 {
    if msg.to.is_some() {
        return 0;
    }
    match SetCodePayload::decode(&msg.data) {
        Ok(payload) => gtos_gas::set_code_surcharge(schedule, payload.ttl_blocks),
        Err(SetCodeError::ErrMalformedPayload | SetCodeError::ErrZeroTtl | SetCodeError::ErrEmptyCode) => 0,
    }
}

pub fn intrinsic_gas_for(msg: &Message, schedule: &GasSchedule) -> u64 {
    intrinsic_gas(&msg.data, schedule, feature_surcharge(msg, schedule))
}

/// Runs `spec.md` §4.E pre-checks 1-4 (check 5 — debit/reserve/nonce —
/// is a mutation and lives in `apply_transaction` once every check here
/// has passed). Returns the intrinsic gas so the caller doesn't
/// recompute it.
pub fn pre_check(
    sender_nonce: u64,
    sender_is_eoa: bool,
    sender_balance: gtos_common::U256,
    msg: &Message,
    schedule: &GasSchedule,
) -> Result<u64, PreCheckError> {
    if !sender_is_eoa {
        return Err(PreCheckError::ErrSenderIsContract);
    }

    if sender_nonce == u64::MAX {
        return Err(PreCheckError::ErrNonceMax);
    }
    if msg.nonce < sender_nonce {
        return Err(PreCheckError::ErrNonceTooLow {
            expected: sender_nonce,
            got: msg.nonce,
        });
    }
    if msg.nonce > sender_nonce {
        return Err(PreCheckError::ErrNonceTooHigh {
            expected: sender_nonce,
            got: msg.nonce,
        });
    }

    let intrinsic = intrinsic_gas_for(msg, schedule);
    if intrinsic > msg.gas_limit {
        return Err(PreCheckError::ErrIntrinsicGas {
            intrinsic,
            limit: msg.gas_limit,
        });
    }

    let cost = upfront_cost(msg.gas_limit, msg.effective_gas_price, msg.value);
    if sender_balance < cost {
        return Err(PreCheckError::ErrInsufficientFunds);
    }

    Ok(intrinsic)
}
