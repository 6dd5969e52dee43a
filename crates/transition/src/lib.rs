//! Component E: the state transition function (`spec.md` §4.E).
//! Pre-checks, dispatch into F/G/H/I, refund, receipt synthesis, and
//! the snapshot/revert discipline that lets nonce/fee/coinbase
//! bookkeeping survive an execution-failed dispatch.

pub mod dispatch;
pub mod errors;
pub mod precheck;

use gtos_common::{Address, Digest, Message, Receipt};
use gtos_config::{GasSchedule, PrivacyProofSizes};
use gtos_gas::GasPool;
use gtos_privacy::ProofVerifier;
use gtos_state::StateDb;
use gtos_vm::{BlockContext, TxContext};
use tracing::instrument;

pub use errors::{ExecutionError, PreCheckError};

/// Everything a transaction's transition needs that isn't already on
/// the `Message` (`spec.md` §4.C) — block/tx context for the VM, the
/// chain's gas schedule, and the private-balance engine's pluggable
/// proof verifier (`spec.md` §4.H).
pub struct TransitionContext<'a> {
    pub block: &'a BlockContext,
    pub tx: &'a TxContext,
    pub schedule: &'a GasSchedule,
    pub privacy_sizes: PrivacyProofSizes,
    pub private_balance_base_unit: u64,
    pub verifier: &'a dyn ProofVerifier,
}

/// Runs one transaction's state transition against `state`, reserving
/// `msg.gas_limit` from the shared block `gas_pool` (`spec.md` §4.D,
/// §4.J step 3). Returns a receipt; `Err` only for consensus-fatal
/// pre-check failures (`spec.md` §7), which must abort the whole
/// block's import rather than produce a receipt.
#[instrument(skip(state, gas_pool, ctx, msg), fields(from = %msg.from, nonce = msg.nonce))]
pub fn apply_transaction(
    state: &mut StateDb,
    gas_pool: &mut GasPool,
    ctx: &TransitionContext<'_>,
    msg: &Message,
    tx_hash: Digest,
    cumulative_gas_used_before: u64,
) -> Result<Receipt, PreCheckError> {
    let sender = state.get_account(msg.from);
    let intrinsic_gas = precheck::pre_check(sender.nonce, sender.is_eoa(), sender.balance, msg, ctx.schedule)?;

    gas_pool.reserve(msg.gas_limit)?;

    // `spec.md` §4.E pre-check step 5: debit the upfront fee and bump
    // the nonce unconditionally — this happens outside any dispatch
    // snapshot, so it survives an execution-failed dispatch below.
    let fee_upfront = msg.effective_gas_price.saturating_mul_u64(msg.gas_limit);
    let mut sender_after_fee = sender;
    sender_after_fee.balance = sender_after_fee.balance.saturating_sub(fee_upfront);
    sender_after_fee.nonce = sender_after_fee.nonce.saturating_add(1);
    state.set_account(msg.from, sender_after_fee);

    let vm_gas_budget = msg.gas_limit.saturating_sub(intrinsic_gas);
    let snapshot = state.snapshot();
    let outcome = dispatch::dispatch(
        state,
        msg,
        ctx.block,
        ctx.tx,
        ctx.schedule,
        ctx.privacy_sizes,
        ctx.private_balance_base_unit,
        ctx.verifier,
        vm_gas_budget,
    );

    let (status_success, logs) = if outcome.success {
        state.commit(snapshot);
        (true, outcome.logs)
    } else {
        state.revert_to(snapshot);
        (false, Vec::new())
    };
    let gas_used = intrinsic_gas.saturating_add(outcome.gas_used);

    settle_fee(state, msg, ctx.block.coinbase, gas_used);
    gas_pool.refund(msg.gas_limit.saturating_sub(gas_used));

    let cumulative_gas_used = cumulative_gas_used_before.saturating_add(gas_used);
    let receipt = if status_success {
        Receipt::success(tx_hash, gas_used, cumulative_gas_used, logs)
    } else {
        Receipt::failed(tx_hash, gas_used, cumulative_gas_used)
    };
    Ok(receipt)
}

/// `spec.md` §4.D: refund unused gas (plus any capped SSTORE-style
/// refund counter — this core never populates one, so it is always
/// zero) to the sender, and credit the rest of the upfront fee to the
/// block's coinbase. Persists regardless of dispatch outcome.
fn settle_fee(state: &mut StateDb, msg: &Message, coinbase: Address, gas_used: u64) {
    let refund_counter = 0u64;
    let capped = gtos_gas::capped_refund(refund_counter, gas_used);
    let gas_returned = msg.gas_limit.saturating_sub(gas_used).saturating_add(capped);

    let mut sender = state.get_account(msg.from);
    sender.balance = sender
        .balance
        .saturating_add(msg.effective_gas_price.saturating_mul_u64(gas_returned));
    state.set_account(msg.from, sender);

    let coinbase_amount = msg.effective_gas_price.saturating_mul_u64(gas_used.saturating_sub(capped));
    let mut coinbase_account = state.get_account(coinbase);
    coinbase_account.balance = coinbase_account.balance.saturating_add(coinbase_amount);
    state.set_account(coinbase, coinbase_account);
}
