//! Component E's dispatch table (`spec.md` §4.E): routes a message to
//! F/G/H/I by destination, or to the plain value-transfer fallback.

use gtos_common::{Log, Message, PRIVACY_ROUTER_ADDRESS, SYSTEM_ACTION_ADDRESS};
use gtos_config::{GasSchedule, PrivacyProofSizes};
use gtos_privacy::ProofVerifier;
use gtos_state::StateDb;
use gtos_system::SetCodePayload;
use gtos_vm::{BlockContext, Env, Frame, MsgContext, TxContext};
use tracing::instrument;

use crate::errors::ExecutionError;

pub struct DispatchOutcome {
    pub success: bool,
    pub gas_used: u64,
    pub logs: Vec<Log>,
    pub error: Option<ExecutionError>,
}

impl DispatchOutcome {
    fn ok() -> Self {
        Self {
            success: true,
            gas_used: 0,
            logs: Vec::new(),
            error: None,
        }
    }

    fn failed(error: ExecutionError) -> Self {
        Self {
            success: false,
            gas_used: 0,
            logs: Vec::new(),
            error: Some(error),
        }
    }
}

#[allow(clippy::too_many_arguments)]
#[instrument(skip(state, msg, block, tx, schedule, verifier), fields(from = %msg.from))]
pub fn dispatch(
    state: &mut StateDb,
    msg: &Message,
    block: &BlockContext,
    tx: &TxContext,
    schedule: &GasSchedule,
    privacy_sizes: PrivacyProofSizes,
    private_balance_base_unit: u64,
    verifier: &dyn ProofVerifier,
    vm_gas_budget: u64,
) -> DispatchOutcome {
    let Some(to) = msg.to else {
        return match SetCodePayload::decode(&msg.data) {
            Ok(payload) => {
                gtos_system::apply_set_code(state, msg.from, payload, block.number);
                DispatchOutcome::ok()
            }
            Err(error) => DispatchOutcome::failed(ExecutionError::SetCode(error)),
        };
    };

    if to == SYSTEM_ACTION_ADDRESS {
        return match gtos_system::apply_system_action(state, msg.from, &msg.data, block.number) {
            Ok(()) => DispatchOutcome::ok(),
            Err(error) => DispatchOutcome::failed(ExecutionError::System(error)),
        };
    }

    if to == PRIVACY_ROUTER_ADDRESS {
        return match gtos_privacy::apply_private_action(
            state,
            msg.from,
            &msg.data,
            privacy_sizes,
            private_balance_base_unit,
            verifier,
        ) {
            Ok(()) => DispatchOutcome::ok(),
            Err(error) => DispatchOutcome::failed(ExecutionError::Privacy(error)),
        };
    }

    if let Some(code_hash) = state.live_code_hash(to, block.number) {
        let Some(code_bytes) = state.get_code(code_hash).map(<[u8]>::to_vec) else {
            return DispatchOutcome::failed(ExecutionError::ErrMalformedScriptCode);
        };
        let Some(script) = gtos_vm::decode_script(&code_bytes) else {
            return DispatchOutcome::failed(ExecutionError::ErrMalformedScriptCode);
        };

        apply_plain_value_transfer(state, msg.from, to, msg.value);

        let mut sig = [0u8; 4];
        let sig_len = msg.data.len().min(4);
        sig[..sig_len].copy_from_slice(&msg.data[..sig_len]);

        let env = Env { block, tx };
        let frame = Frame {
            self_address: to,
            caller: msg.from,
            msg: MsgContext {
                sender: msg.from,
                value: msg.value,
                data: msg.data.clone(),
                sig,
            },
            value: msg.value,
            depth: 0,
            readonly: msg.is_fake_call,
        };

        let report = gtos_vm::execute(state, &env, frame, schedule, &script, vm_gas_budget);
        return DispatchOutcome {
            success: report.success,
            gas_used: report.gas_used,
            logs: report.logs,
            error: report.error.map(ExecutionError::Vm),
        };
    }

    apply_plain_value_transfer(state, msg.from, to, msg.value);
    DispatchOutcome::ok()
}

/// `spec.md` §4.E "applyPlain"/§4.G step 2: value transfer is
/// infallible here because the pre-check already confirmed
/// `balance >= fee + value` and the fee was already debited before
/// dispatch runs (`spec.md` §4.E pre-check 4 / step 5).
fn apply_plain_value_transfer(state: &mut StateDb, from: gtos_common::Address, to: gtos_common::Address, value: gtos_common::U256) {
    if value == gtos_common::U256::ZERO {
        return;
    }
    let mut sender = state.get_account(from);
    sender.balance = sender.balance.saturating_sub(value);
    state.set_account(from, sender);

    let mut receiver = state.get_account(to);
    receiver.balance = receiver.balance.saturating_add(value);
    state.set_account(to, receiver);
}
