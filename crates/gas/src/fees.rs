//! Intrinsic gas and fee arithmetic (`spec.md` §4.D), generalized from
//! the teacher's `Transaction::{effective_gas_price,
//! cost_without_base_fee}` (`crates/common/types/transaction.rs`) to
//! this chain's single signer-transaction fee-cap/tip-cap shape.

use gtos_common::U256;
use gtos_config::GasSchedule;

/// `min(tip_cap + base_fee, fee_cap)`, or `gas_price` for the legacy
/// shape where no base fee applies (`spec.md` §4.C).
pub fn effective_gas_price(fee_cap: U256, tip_cap: U256, base_fee: Option<u64>) -> U256 {
    match base_fee {
        None => fee_cap,
        Some(base_fee) => {
            let base_fee = U256::from_u64(base_fee);
            let priority = std::cmp::min(tip_cap, fee_cap.saturating_sub(base_fee));
            std::cmp::min(fee_cap, priority.saturating_add(base_fee))
        }
    }
}

/// Base cost + per-byte data cost with the zero/non-zero distinction
/// (`spec.md` §4.D), plus an optional per-scheme-feature surcharge
/// (e.g. `setCode`'s per-TTL-block cost, `spec.md` §4.I).
pub fn intrinsic_gas(data: &[u8], schedule: &GasSchedule, feature_surcharge: u64) -> u64 {
    let mut cost = schedule.tx_base;
    for &byte in data {
        cost = cost.saturating_add(if byte == 0 {
            schedule.tx_data_zero_byte
        } else {
            schedule.tx_data_nonzero_byte
        });
    }
    cost.saturating_add(feature_surcharge)
}

pub fn set_code_surcharge(schedule: &GasSchedule, ttl_blocks: u64) -> u64 {
    schedule.set_code_ttl_block_gas.saturating_mul(ttl_blocks)
}

/// `min(refund_counter, used/5)` (`spec.md` §4.D).
pub fn capped_refund(refund_counter: u64, gas_used: u64) -> u64 {
    std::cmp::min(refund_counter, gas_used / 5)
}

/// `tx.gas * effective_gas_price + value` (`spec.md` §4.E pre-check 4).
pub fn upfront_cost(gas_limit: u64, effective_gas_price: U256, value: U256) -> U256 {
    effective_gas_price
        .saturating_mul_u64(gas_limit)
        .saturating_add(value)
}
