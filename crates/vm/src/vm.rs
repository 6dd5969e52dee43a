//! The scripted-contract interpreter (`spec.md` §4.G), generalized from
//! `ethrex_levm::vm::VM::execute`'s dispatch-loop-over-opcodes shape and
//! `opcode_handlers/system.rs::op_call`'s CALL depth-guard / inner
//! snapshot / value-forwarding pattern, retargeted from EVM bytecode to
//! this core's `ScriptOp` instruction set.

use gtos_common::{Address, Log, U256};
use gtos_config::GasSchedule;
use gtos_state::StateDb;
use tracing::instrument;

use crate::abi::{encode_data_field, encode_topic};
use crate::errors::VMError;
use crate::frame::{Env, Frame};
use crate::ops::{Script, ScriptOp};
use crate::storage;
use crate::value::Value;

pub struct ExecutionReport {
    pub success: bool,
    pub gas_used: u64,
    pub return_data: Vec<u8>,
    pub error: Option<VMError>,
    pub logs: Vec<Log>,
}

struct Interpreter<'a> {
    state: &'a mut StateDb,
    env: &'a Env<'a>,
    frame: Frame,
    schedule: &'a GasSchedule,
    stack: Vec<Value>,
    gas_remaining: u64,
    logs: Vec<Log>,
}

fn require_not_readonly(frame: &Frame) -> Result<(), VMError> {
    if frame.readonly {
        Err(VMError::ReadonlyViolation)
    } else {
        Ok(())
    }
}

impl<'a> Interpreter<'a> {
    fn charge(&mut self, amount: u64) -> Result<(), VMError> {
        self.gas_remaining = self.gas_remaining.checked_sub(amount).ok_or(VMError::OutOfGas)?;
        Ok(())
    }

    fn pop(&mut self) -> Result<Value, VMError> {
        self.stack.pop().ok_or(VMError::StackUnderflow)
    }

    fn pop_uint(&mut self) -> Result<U256, VMError> {
        self.pop()?.as_uint().ok_or(VMError::TypeMismatch)
    }

    fn pop_bytes(&mut self) -> Result<Vec<u8>, VMError> {
        self.pop()?.as_bytes().map(<[u8]>::to_vec).ok_or(VMError::TypeMismatch)
    }

    fn pop_address(&mut self) -> Result<Address, VMError> {
        self.pop()?.as_address().ok_or(VMError::TypeMismatch)
    }

    fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    fn run(&mut self, code: &Script) -> Result<Vec<u8>, VMError> {
        let mut pc = 0usize;
        loop {
            let Some(op) = code.get(pc) else {
                // falling off the end of the script is a clean return with no data
                return Ok(Vec::new());
            };
            self.charge(1)?;
            pc += 1;
            match self.step(op, code, &mut pc)? {
                Some(returned) => return Ok(returned),
                None => continue,
            }
        }
    }

    /// Executes one instruction. Returns `Some(bytes)` on a clean
    /// `Return`, `None` to keep running.
    fn step(&mut self, op: &ScriptOp, code: &Script, pc: &mut usize) -> Result<Option<Vec<u8>>, VMError> {
        match op {
            ScriptOp::Push(value) => self.push(value.clone()),
            ScriptOp::Pop => {
                self.pop()?;
            }
            ScriptOp::Dup => {
                let top = self.stack.last().ok_or(VMError::StackUnderflow)?.clone();
                self.push(top);
            }
            ScriptOp::Add => {
                let b = self.pop_uint()?;
                let a = self.pop_uint()?;
                self.push(Value::Uint(a.saturating_add(b)));
            }
            ScriptOp::Sub => {
                let b = self.pop_uint()?;
                let a = self.pop_uint()?;
                self.push(Value::Uint(a.saturating_sub(b)));
            }
            ScriptOp::Mul => {
                let b = self.pop_uint()?;
                let a = self.pop_uint()?;
                self.push(Value::Uint(a.saturating_mul(b)));
            }
            ScriptOp::Div => {
                let b = self.pop_uint()?;
                let a = self.pop_uint()?;
                self.push(Value::Uint(a.checked_div(b).unwrap_or(U256::ZERO)));
            }
            ScriptOp::Lt => {
                let b = self.pop_uint()?;
                let a = self.pop_uint()?;
                self.push(Value::Bool(a < b));
            }
            ScriptOp::Gt => {
                let b = self.pop_uint()?;
                let a = self.pop_uint()?;
                self.push(Value::Bool(a > b));
            }
            ScriptOp::Eq => {
                let b = self.pop()?;
                let a = self.pop()?;
                self.push(Value::Bool(a == b));
            }
            ScriptOp::And => {
                let b = self.pop()?.is_truthy();
                let a = self.pop()?.is_truthy();
                self.push(Value::Bool(a && b));
            }
            ScriptOp::Or => {
                let b = self.pop()?.is_truthy();
                let a = self.pop()?.is_truthy();
                self.push(Value::Bool(a || b));
            }
            ScriptOp::Not => {
                let a = self.pop()?.is_truthy();
                self.push(Value::Bool(!a));
            }
            ScriptOp::Jump(target) => {
                *pc = *target;
            }
            ScriptOp::JumpIfFalse(target) => {
                let cond = self.pop()?.is_truthy();
                if !cond {
                    *pc = *target;
                }
            }
            ScriptOp::StorageGet => {
                self.charge(self.schedule.sload)?;
                let key = self.pop_bytes()?;
                let value = storage::scalar_get(self.state, self.frame.self_address, &key);
                self.push(value.map(Value::Uint).unwrap_or(Value::Nil));
            }
            ScriptOp::StorageSet => {
                require_not_readonly(&self.frame)?;
                self.charge(self.schedule.sstore)?;
                let key = self.pop_bytes()?;
                let value = self.pop_uint()?;
                storage::scalar_set(self.state, self.frame.self_address, &key, value);
            }
            ScriptOp::StrGet => {
                self.charge(self.schedule.sload)?;
                let key = self.pop_bytes()?;
                let value = storage::string_get(self.state, self.frame.self_address, &key);
                self.push(value.map(Value::Bytes).unwrap_or(Value::Nil));
            }
            ScriptOp::StrSet => {
                require_not_readonly(&self.frame)?;
                self.charge(self.schedule.sstore)?;
                let key = self.pop_bytes()?;
                let value = self.pop_bytes()?;
                storage::string_set(self.state, self.frame.self_address, &key, &value);
            }
            ScriptOp::ArrLen(key) => {
                self.charge(self.schedule.sload)?;
                let len = storage::array_len(self.state, self.frame.self_address, key);
                self.push(Value::Uint(U256::from(len)));
            }
            ScriptOp::ArrGet(key) => {
                self.charge(self.schedule.sload)?;
                let index = self.pop_uint()?.as_u64();
                let value = storage::array_get(self.state, self.frame.self_address, key, index);
                self.push(value.map(Value::Uint).unwrap_or(Value::Nil));
            }
            ScriptOp::ArrSet(key) => {
                require_not_readonly(&self.frame)?;
                self.charge(self.schedule.sstore)?;
                let index = self.pop_uint()?.as_u64();
                let value = self.pop_uint()?;
                if !storage::array_set(self.state, self.frame.self_address, key, index, value) {
                    return Err(VMError::ArrayOutOfBounds);
                }
            }
            ScriptOp::ArrPush(key) => {
                require_not_readonly(&self.frame)?;
                self.charge(self.schedule.sstore)?;
                let value = self.pop_uint()?;
                storage::array_push(self.state, self.frame.self_address, key, value);
            }
            ScriptOp::ArrPop(key) => {
                require_not_readonly(&self.frame)?;
                self.charge(self.schedule.sstore)?;
                let value = storage::array_pop(self.state, self.frame.self_address, key).ok_or(VMError::ArrayEmpty)?;
                self.push(Value::Uint(value));
            }
            ScriptOp::MapGet { name, key_count } => {
                self.charge(self.schedule.sload)?;
                let keys = self.pop_key_tuple(*key_count)?;
                let key_refs: Vec<&[u8]> = keys.iter().map(Vec::as_slice).collect();
                let value = storage::map_get(self.state, self.frame.self_address, name, &key_refs);
                self.push(value.map(Value::Uint).unwrap_or(Value::Nil));
            }
            ScriptOp::MapSet { name, key_count } => {
                require_not_readonly(&self.frame)?;
                self.charge(self.schedule.sstore)?;
                let value = self.pop_uint()?;
                let keys = self.pop_key_tuple(*key_count)?;
                let key_refs: Vec<&[u8]> = keys.iter().map(Vec::as_slice).collect();
                storage::map_set(self.state, self.frame.self_address, name, &key_refs, value);
            }
            ScriptOp::StructGet { type_name, field } => {
                self.charge(self.schedule.sload)?;
                let instance_key = self.pop_bytes()?;
                let value = storage::struct_get(self.state, self.frame.self_address, type_name, &instance_key, field);
                self.push(Value::Uint(value));
            }
            ScriptOp::StructSet { type_name, field } => {
                require_not_readonly(&self.frame)?;
                self.charge(self.schedule.sstore)?;
                let value = self.pop_uint()?;
                let instance_key = self.pop_bytes()?;
                storage::struct_set(self.state, self.frame.self_address, type_name, &instance_key, field, value);
            }
            ScriptOp::CtxCaller => self.push(Value::Address(self.frame.caller)),
            ScriptOp::CtxValue => self.push(Value::Uint(self.frame.value)),
            ScriptOp::CtxSelf => self.push(Value::Address(self.frame.self_address)),
            ScriptOp::CtxBlockNumber => self.push(Value::Uint(U256::from(self.env.block.number))),
            ScriptOp::CtxBlockTimestamp => self.push(Value::Uint(U256::from(self.env.block.timestamp))),
            ScriptOp::CtxBlockCoinbase => self.push(Value::Address(self.env.block.coinbase)),
            ScriptOp::CtxBlockChainId => self.push(Value::Uint(U256::from(self.env.block.chain_id))),
            ScriptOp::CtxBlockGasLimit => self.push(Value::Uint(U256::from(self.env.block.gas_limit))),
            ScriptOp::CtxBlockBaseFee => {
                self.push(Value::Uint(self.env.block.base_fee.map(U256::from).unwrap_or(U256::ZERO)))
            }
            ScriptOp::CtxTxOrigin => self.push(Value::Address(self.env.tx.origin)),
            ScriptOp::CtxTxGasPrice => self.push(Value::Uint(self.env.tx.gas_price)),
            ScriptOp::CtxMsgSender => self.push(Value::Address(self.frame.msg.sender)),
            ScriptOp::CtxMsgValue => self.push(Value::Uint(self.frame.msg.value)),
            ScriptOp::CtxMsgData => self.push(Value::Bytes(self.frame.msg.data.clone())),
            ScriptOp::CtxMsgSig => self.push(Value::Bytes(self.frame.msg.sig.to_vec())),
            ScriptOp::Keccak256 => {
                let data = self.pop_bytes()?;
                self.push(Value::Bytes(gtos_crypto::keccak256(&data).0.to_vec()));
            }
            ScriptOp::Sha256 => {
                let data = self.pop_bytes()?;
                self.push(Value::Bytes(gtos_crypto::hash::sha256(&data).to_vec()));
            }
            ScriptOp::Ripemd160 => {
                let data = self.pop_bytes()?;
                self.push(Value::Bytes(gtos_crypto::hash::ripemd160_padded(&data).to_vec()));
            }
            ScriptOp::Ecrecover => {
                let s = self.pop_bytes()?;
                let r = self.pop_bytes()?;
                let v = self.pop_uint()?.as_u64();
                let hash_bytes = self.pop_bytes()?;
                self.push(self.try_ecrecover(&hash_bytes, v, &r, &s)?);
            }
            ScriptOp::Addmod => {
                let m = self.pop_uint()?;
                let b = self.pop_uint()?;
                let a = self.pop_uint()?;
                self.push(Value::Uint(gtos_crypto::addmod(a, b, m)));
            }
            ScriptOp::Mulmod => {
                let m = self.pop_uint()?;
                let b = self.pop_uint()?;
                let a = self.pop_uint()?;
                self.push(Value::Uint(gtos_crypto::mulmod(a, b, m)));
            }
            ScriptOp::Blockhash => {
                let _n = self.pop_uint()?;
                // block-hash history is an external collaborator (consensus
                // engine); this core surfaces nil rather than fabricate one.
                self.push(Value::Nil);
            }
            ScriptOp::BytesFromHex => {
                let bytes = self.pop_bytes()?;
                let text = String::from_utf8(bytes).map_err(|_| VMError::TypeMismatch)?;
                let decoded = hex::decode(text.trim_start_matches("0x")).map_err(|_| VMError::TypeMismatch)?;
                self.push(Value::Bytes(decoded));
            }
            ScriptOp::BytesToHex => {
                let bytes = self.pop_bytes()?;
                self.push(Value::Bytes(format!("0x{}", hex::encode(bytes)).into_bytes()));
            }
            ScriptOp::BytesLen => {
                let bytes = self.pop_bytes()?;
                self.push(Value::Uint(U256::from(bytes.len() as u64)));
            }
            ScriptOp::BytesSlice => {
                let end = self.pop_uint()?.as_u64() as usize;
                let start = self.pop_uint()?.as_u64() as usize;
                let bytes = self.pop_bytes()?;
                let slice = bytes.get(start..end).ok_or(VMError::ArrayOutOfBounds)?;
                self.push(Value::Bytes(slice.to_vec()));
            }
            ScriptOp::BytesFromUint256 => {
                let value = self.pop_uint()?;
                self.push(Value::Bytes(value.to_big_endian().to_vec()));
            }
            ScriptOp::BytesToUint256 => {
                let bytes = self.pop_bytes()?;
                let mut word = [0u8; 32];
                let start = 32usize.saturating_sub(bytes.len());
                word[start..].copy_from_slice(&bytes[bytes.len().saturating_sub(32)..]);
                self.push(Value::Uint(U256::from_big_endian(&word)));
            }
            ScriptOp::Emit {
                canonical_signature,
                indexed_count,
                nonindexed_count,
            } => {
                if self.frame.readonly {
                    return Err(VMError::EmitInReadonly);
                }
                if *indexed_count > 3 {
                    return Err(VMError::TooManyIndexedParams);
                }
                let mut nonindexed = Vec::with_capacity(*nonindexed_count);
                for _ in 0..*nonindexed_count {
                    nonindexed.push(self.pop()?);
                }
                nonindexed.reverse();
                let mut indexed = Vec::with_capacity(*indexed_count);
                for _ in 0..*indexed_count {
                    indexed.push(self.pop()?);
                }
                indexed.reverse();

                let mut data = Vec::new();
                for value in &nonindexed {
                    encode_data_field(&mut data, value);
                }
                self.charge(
                    self.schedule.log_base
                        + self.schedule.log_topic * (*indexed_count as u64)
                        + self.schedule.log_byte * (data.len() as u64),
                )?;

                let mut topics = vec![gtos_common::Digest(gtos_crypto::keccak256(canonical_signature.as_bytes()).0)];
                for value in &indexed {
                    topics.push(gtos_common::Digest(encode_topic(value)));
                }
                self.logs.push(Log {
                    address: self.frame.self_address,
                    topics,
                    data,
                });
            }
            ScriptOp::Require(message) => {
                let cond = self.pop()?.is_truthy();
                if !cond {
                    return Err(VMError::RequireFailed(message.clone()));
                }
            }
            ScriptOp::Revert(message) => return Err(VMError::Revert(message.clone())),
            ScriptOp::RevertStructured {
                canonical_signature,
                arg_count,
            } => {
                let mut args = Vec::with_capacity(*arg_count);
                for _ in 0..*arg_count {
                    args.push(self.pop()?);
                }
                args.reverse();
                let selector = &gtos_crypto::keccak256(canonical_signature.as_bytes()).0[..4];
                let mut payload = selector.to_vec();
                for value in &args {
                    encode_data_field(&mut payload, value);
                }
                return Err(VMError::StructuredRevert(payload));
            }
            ScriptOp::OnCreateGuard { skip_to } => {
                let flag_key = b"__oncreate_initialized".as_slice();
                let already_set = storage::scalar_get(self.state, self.frame.self_address, flag_key).is_some();
                if already_set {
                    *pc = *skip_to;
                } else {
                    storage::scalar_set(self.state, self.frame.self_address, flag_key, U256::from(1u64));
                }
            }
            ScriptOp::AtProxy => {
                let addr = self.pop_address()?;
                self.push(Value::Address(addr));
            }
            ScriptOp::ProxyGet => {
                self.charge(self.schedule.sload)?;
                let key = self.pop_bytes()?;
                let addr = self.pop_address()?;
                let value = storage::scalar_get(self.state, addr, &key);
                self.push(value.map(Value::Uint).unwrap_or(Value::Nil));
            }
            ScriptOp::ProxyBalance => {
                self.charge(self.schedule.balance)?;
                let addr = self.pop_address()?;
                self.push(Value::Uint(self.state.get_account(addr).balance));
            }
            ScriptOp::Call { with_value } => self.do_call(*with_value, false)?,
            ScriptOp::StaticCall => self.do_call(false, true)?,
            ScriptOp::Deploy { with_value } => self.do_deploy(*with_value)?,
            ScriptOp::Return => {
                let data = self.pop_bytes().unwrap_or_default();
                return Ok(Some(data));
            }
        }
        Ok(None)
    }

    fn pop_key_tuple(&mut self, count: usize) -> Result<Vec<Vec<u8>>, VMError> {
        let mut keys = Vec::with_capacity(count);
        for _ in 0..count {
            keys.push(self.pop_bytes()?);
        }
        keys.reverse();
        Ok(keys)
    }

    fn try_ecrecover(&self, hash: &[u8], v: u64, r: &[u8], s: &[u8]) -> Result<Value, VMError> {
        let Ok(hash_arr): Result<[u8; 32], _> = hash.try_into() else {
            return Ok(Value::Nil);
        };
        let Ok(recovery_id) = u8::try_from(v) else {
            return Ok(Value::Nil);
        };
        match gtos_crypto::secp256k1::ecrecover(&hash_arr, recovery_id, r, s) {
            Ok(address) => Ok(Value::Address(address)),
            Err(_) => Ok(Value::Nil),
        }
    }

    fn do_call(&mut self, with_value: bool, is_static: bool) -> Result<(), VMError> {
        let calldata = self.pop_bytes()?;
        let value = if with_value { self.pop_uint()? } else { U256::ZERO };
        let target = self.pop_address()?;

        if self.frame.depth + 1 >= self.schedule.max_call_depth {
            return Err(VMError::CallDepthExceeded);
        }

        let snapshot = self.state.snapshot();
        if value != U256::ZERO {
            require_not_readonly(&self.frame)?;
            self.charge(self.schedule.call_base_transfer)?;
            let mut caller_account = self.state.get_account(self.frame.self_address);
            if caller_account.balance < value {
                self.state.revert_to(snapshot);
                self.push(Value::Bool(false));
                self.push(Value::Nil);
                return Ok(());
            }
            caller_account.balance = caller_account.balance.saturating_sub(value);
            self.state.set_account(self.frame.self_address, caller_account);
            let mut callee_account = self.state.get_account(target);
            callee_account.balance = callee_account.balance.saturating_add(value);
            self.state.set_account(target, callee_account);
        }

        let live_code = self.state.live_code_hash(target, self.env.block.number);
        let Some(code_hash) = live_code else {
            // no code: value transfer (already applied above) is the entire effect
            self.push(Value::Bool(true));
            self.push(Value::Nil);
            return Ok(());
        };
        let code_bytes = self.state.get_code(code_hash).map(<[u8]>::to_vec);
        let Some(code_bytes) = code_bytes else {
            self.push(Value::Bool(true));
            self.push(Value::Nil);
            return Ok(());
        };
        let child_code: Script = match crate::ops::decode_script(&code_bytes) {
            Some(script) => script,
            None => {
                self.state.revert_to(snapshot);
                self.push(Value::Bool(false));
                self.push(Value::Nil);
                return Ok(());
            }
        };

        let mut sig = [0u8; 4];
        sig.copy_from_slice(&{
            let mut padded = calldata.clone();
            padded.resize(4, 0);
            padded[..4].to_vec()
        });

        let child_frame = Frame {
            self_address: target,
            caller: self.frame.self_address,
            msg: crate::environment::MsgContext {
                sender: self.frame.self_address,
                value,
                data: calldata,
                sig,
            },
            value,
            depth: self.frame.depth + 1,
            readonly: self.frame.readonly || is_static,
        };

        let child_gas = self.gas_remaining;
        let report = execute(self.state, self.env, child_frame, self.schedule, &child_code, child_gas);
        self.gas_remaining = self.gas_remaining.saturating_sub(report.gas_used);

        if report.success {
            self.state.commit(snapshot);
            self.logs.extend(report.logs);
            self.push(Value::Bool(true));
            self.push(Value::Bytes(report.return_data));
        } else {
            self.state.revert_to(snapshot);
            self.push(Value::Bool(false));
            match report.error {
                Some(VMError::StructuredRevert(bytes)) => self.push(Value::Bytes(bytes)),
                _ => self.push(Value::Nil),
            }
        }
        Ok(())
    }

    fn do_deploy(&mut self, with_value: bool) -> Result<(), VMError> {
        require_not_readonly(&self.frame).map_err(|_| VMError::DeployInReadonly)?;
        let code = self.pop_bytes()?;
        let value = if with_value { self.pop_uint()? } else { U256::ZERO };

        self.charge(self.schedule.create_base + self.schedule.create_byte * (code.len() as u64))?;

        let mut deployer = self.state.get_account(self.frame.self_address);
        let nonce = deployer.nonce;
        deployer.nonce += 1;
        self.state.set_account(self.frame.self_address, deployer.clone());

        let new_address = derive_deploy_address(self.frame.self_address, nonce);

        if value != U256::ZERO {
            if deployer.balance < value {
                return Err(VMError::RequireFailed("insufficient balance for deploy value".to_string()));
            }
            let mut payer = self.state.get_account(self.frame.self_address);
            payer.balance = payer.balance.saturating_sub(value);
            self.state.set_account(self.frame.self_address, payer);
            let mut new_account = self.state.get_account(new_address);
            new_account.balance = new_account.balance.saturating_add(value);
            self.state.set_account(new_address, new_account);
        }

        let code_hash = self.state.install_code(code);
        // Deployed code is permanent, unlike the TTL-gated `setCode` path
        // (`spec.md` §4.I); reusing the same `set_code`/`live_code_hash`
        // map with an unreachable expiry keeps "has script code" a single
        // lookup for both origins.
        self.state.set_code_with_ttl(new_address, code_hash, self.env.block.number, u64::MAX);
        self.push(Value::Address(new_address));
        Ok(())
    }
}

/// Deterministic deployed-contract address: `keccak(deployer || nonce_be)`.
fn derive_deploy_address(deployer: Address, nonce: u64) -> Address {
    let mut preimage = Vec::with_capacity(32 + 8);
    preimage.extend_from_slice(deployer.as_bytes());
    preimage.extend_from_slice(&nonce.to_be_bytes());
    Address(gtos_crypto::keccak256(&preimage).0)
}

#[instrument(skip(state, env, schedule, code), fields(self_address = %frame.self_address, depth = frame.depth))]
pub fn execute(
    state: &mut StateDb,
    env: &Env<'_>,
    frame: Frame,
    schedule: &GasSchedule,
    code: &Script,
    gas_limit: u64,
) -> ExecutionReport {
    let mut interpreter = Interpreter {
        state,
        env,
        frame,
        schedule,
        stack: Vec::new(),
        gas_remaining: gas_limit,
        logs: Vec::new(),
    };

    match interpreter.run(code) {
        Ok(return_data) => ExecutionReport {
            success: true,
            gas_used: gas_limit - interpreter.gas_remaining,
            return_data,
            error: None,
            logs: interpreter.logs,
        },
        Err(error) => {
            let gas_used = if matches!(error, VMError::OutOfGas) {
                gas_limit
            } else {
                gas_limit - interpreter.gas_remaining
            };
            ExecutionReport {
                success: false,
                gas_used,
                return_data: Vec::new(),
                error: Some(error),
                logs: Vec::new(),
            }
        }
    }
}
