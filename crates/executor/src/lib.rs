//! Component J: the block executor (`spec.md` §4.J).
//!
//! Drives one block through materialisation (C) and the state
//! transition (E) in transaction order, aggregating receipts and logs.
//! Parallelism is restricted to the one place it is safe without
//! deeper changes to `gtos-state`'s storage (see `DESIGN.md`): sender
//! resolution in `message::materialize_messages`. The commit loop
//! itself is strictly serial, which trivially satisfies `spec.md`
//! §4.J step 5's "must equal strictly serial execution" requirement —
//! it *is* the serial schedule.

pub mod errors;
pub mod message;

use gtos_common::{Receipt, Transaction};
use gtos_config::ChainConfig;
use gtos_gas::GasPool;
use gtos_privacy::ProofVerifier;
use gtos_signer::ChainSigner;
use gtos_state::StateDb;
use gtos_transition::TransitionContext;
use gtos_vm::{BlockContext, TxContext};
use tracing::instrument;

pub use errors::BlockExecutionError;

/// Inputs an implementation's consensus engine would already have
/// assembled before calling in: the header fields needed by the
/// scripted VM and fee arithmetic, plus the ordered transaction list
/// (`spec.md` §4.J step 1).
#[derive(Clone, Debug)]
pub struct BlockInput<'a> {
    pub header: BlockContext,
    pub transactions: &'a [Transaction],
}

/// Aggregate result of one block's execution: receipts in transaction
/// order (cumulative gas monotonic, `spec.md` §5 ordering guarantee
/// ii) and the total gas used across the block.
#[derive(Clone, Debug)]
pub struct BlockExecutionResult {
    pub receipts: Vec<Receipt>,
    pub gas_used: u64,
}

pub struct BlockExecutor<'a> {
    pub config: &'a ChainConfig,
    pub verifier: &'a dyn ProofVerifier,
}

impl<'a> BlockExecutor<'a> {
    pub fn new(config: &'a ChainConfig, verifier: &'a dyn ProofVerifier) -> Self {
        Self { config, verifier }
    }

    /// Runs `spec.md` §4.J steps 1-3 against `state`: materialise
    /// messages against pre-block state, then apply each transaction
    /// in order against the shared block gas pool. Aborts (no receipts
    /// at all) on the first consensus-fatal failure, matching "the
    /// whole block fails to import" (`spec.md` §4.E, §7).
    #[instrument(skip(self, state, input), fields(tx_count = input.transactions.len(), block = input.header.number))]
    pub fn execute_block(&self, state: &mut StateDb, input: &BlockInput<'_>) -> Result<BlockExecutionResult, BlockExecutionError> {
        let chain_signer = ChainSigner { chain_id: self.config.chain_id };
        let messages = message::materialize_messages(input.transactions, &chain_signer, &*state, input.header.base_fee)?;

        let mut gas_pool = GasPool::new(input.header.gas_limit);
        let mut receipts = Vec::with_capacity(input.transactions.len());
        let mut cumulative_gas_used = 0u64;

        for (index, (tx, msg)) in input.transactions.iter().zip(messages.iter()).enumerate() {
            let tx_hash = gtos_crypto::tx_hash(tx);
            let tx_context = TxContext {
                origin: msg.from,
                gas_price: msg.effective_gas_price,
            };
            let ctx = TransitionContext {
                block: &input.header,
                tx: &tx_context,
                schedule: &self.config.gas_schedule,
                privacy_sizes: self.config.privacy_proof_sizes,
                private_balance_base_unit: self.config.private_balance_base_unit,
                verifier: self.verifier,
            };

            let receipt = gtos_transition::apply_transaction(state, &mut gas_pool, &ctx, msg, tx_hash, cumulative_gas_used)
                .map_err(|source| BlockExecutionError::InvalidTransaction { index, source })?;

            cumulative_gas_used = receipt.cumulative_gas_used;
            receipts.push(receipt);
        }

        Ok(BlockExecutionResult {
            receipts,
            gas_used: cumulative_gas_used,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};
    use gtos_common::{Account, Address, LegacyTransaction, Scheme, SignatureTuple, SignerTransaction, Transaction, U256};
    use gtos_privacy::RejectingVerifier;
    use gtos_signer::capability;

    fn block(number: u64) -> BlockContext {
        BlockContext {
            number,
            timestamp: 1_000,
            coinbase: Address([0xcc; 32]),
            chain_id: 1,
            gas_limit: 30_000_000,
            base_fee: None,
        }
    }

    /// Builds a signed Ed25519 `SignerTransaction`, padding the
    /// 32-byte R/S pair into the wire shape's fixed 48-byte fields
    /// (`SignatureTuple::scheme_width`'s left-zero convention).
    fn build_ed25519_tx(signing_key: &SigningKey, nonce: u64, to: Option<Address>, value: U256, data: Vec<u8>) -> (Transaction, Address) {
        let public = signing_key.verifying_key().to_bytes().to_vec();
        let from = capability::derive_address(Scheme::Ed25519, &public);
        let unsigned = SignerTransaction {
            chain_id: 1,
            nonce,
            to,
            value,
            gas: 100_000,
            gas_fee_cap: U256::from_u64(1),
            gas_tip_cap: U256::from_u64(1),
            data,
            access_list: vec![],
            from,
            signer_type: Scheme::Ed25519,
            signature: SignatureTuple { v: 0, r: [0u8; 48], s: [0u8; 48] },
        };
        let digest = gtos_crypto::keccak256(&Transaction::Signer(unsigned.clone()).signing_payload());
        let signature = signing_key.sign(&digest.0);
        let bytes = signature.to_bytes();
        let mut r = [0u8; 48];
        let mut s = [0u8; 48];
        r[48 - 32..].copy_from_slice(&bytes[..32]);
        s[48 - 32..].copy_from_slice(&bytes[32..]);
        let signed = SignerTransaction {
            signature: SignatureTuple { v: 0, r, s },
            ..unsigned
        };
        (Transaction::Signer(signed), from)
    }

    #[test]
    fn executes_two_transfers_in_order_with_monotonic_cumulative_gas() {
        let key_a = SigningKey::from_bytes(&[7u8; 32]);
        let key_b = SigningKey::from_bytes(&[9u8; 32]);
        let from_a = capability::derive_address(Scheme::Ed25519, &key_a.verifying_key().to_bytes());
        let from_b = capability::derive_address(Scheme::Ed25519, &key_b.verifying_key().to_bytes());

        let mut state = StateDb::new();
        state.set_account(
            from_a,
            Account {
                balance: U256::from_u64(1_000_000),
                ..Default::default()
            },
        );
        state.set_account(
            from_b,
            Account {
                balance: U256::from_u64(1_000_000),
                ..Default::default()
            },
        );
        state.set_signer_metadata(from_a, Scheme::Ed25519, key_a.verifying_key().to_bytes().to_vec());
        state.set_signer_metadata(from_b, Scheme::Ed25519, key_b.verifying_key().to_bytes().to_vec());

        let (tx_a, _) = build_ed25519_tx(&key_a, 0, Some(from_b), U256::from_u64(100), vec![]);
        let (tx_b, _) = build_ed25519_tx(&key_b, 0, Some(from_a), U256::from_u64(50), vec![]);
        let transactions = vec![tx_a, tx_b];

        let config = ChainConfig::default();
        let verifier = RejectingVerifier;
        let executor = BlockExecutor::new(&config, &verifier);
        let input = BlockInput {
            header: block(1),
            transactions: &transactions,
        };

        let result = executor.execute_block(&mut state, &input).expect("block executes");
        assert_eq!(result.receipts.len(), 2);
        assert!(result.receipts[0].cumulative_gas_used <= result.receipts[1].cumulative_gas_used);
        assert_eq!(state.get_account(from_a).nonce, 1);
        assert_eq!(state.get_account(from_b).nonce, 1);
    }

    #[test]
    fn invalid_sender_aborts_whole_block_with_no_receipts() {
        let bad_tx = Transaction::Legacy(LegacyTransaction {
            nonce: 0,
            gas_price: U256::from_u64(1),
            gas: 21_000,
            to: Some(Address([2u8; 32])),
            value: U256::ZERO,
            data: vec![],
            v: 0,
            r: [0u8; 32],
            s: [0u8; 32],
        });
        let transactions = vec![bad_tx];
        let config = ChainConfig::default();
        let verifier = RejectingVerifier;
        let executor = BlockExecutor::new(&config, &verifier);
        let mut state = StateDb::new();
        let input = BlockInput {
            header: block(1),
            transactions: &transactions,
        };

        let err = executor.execute_block(&mut state, &input).unwrap_err();
        assert!(matches!(err, BlockExecutionError::InvalidSender { index: 0, .. }));
    }

    #[test]
    fn bootstrap_signer_tx_then_second_tx_resolves_against_pre_block_signer() {
        // `spec.md` §4.J step 2: tx_1 installs Ed25519 signer metadata
        // for `from` via the bootstrap path; tx_2 (same block, same
        // sender) must still resolve against the *pre-block* (absent)
        // metadata, not tx_1's just-installed metadata — so tx_2 must
        // also take the bootstrap path rather than the
        // registered-key verification path.
        use gtos_common::{SystemAction, SYSTEM_ACTION_ADDRESS};

        let signing_key = SigningKey::from_bytes(&[3u8; 32]);
        let public = signing_key.verifying_key().to_bytes().to_vec();
        let from = capability::derive_address(Scheme::Ed25519, &public);

        let action = SystemAction::AccountSetSigner {
            scheme: Scheme::Ed25519,
            public_key: public.clone(),
        };
        let data = action.encode();

        // Both transactions carry the same well-formed bootstrap
        // payload, so both resolve via the bootstrap path (neither
        // sees the other's signer-metadata write mid-block) and both
        // dispatch successfully (re-installing identical metadata is
        // idempotent).
        let (tx1, _) = build_ed25519_tx(&signing_key, 0, Some(SYSTEM_ACTION_ADDRESS), U256::ZERO, data.clone());
        let (tx2, _) = build_ed25519_tx(&signing_key, 1, Some(SYSTEM_ACTION_ADDRESS), U256::ZERO, data);
        let transactions = vec![tx1, tx2];

        let mut state = StateDb::new();
        state.set_account(
            from,
            Account {
                balance: U256::from_u64(1_000_000),
                ..Default::default()
            },
        );

        let config = ChainConfig::default();
        let verifier = RejectingVerifier;
        let executor = BlockExecutor::new(&config, &verifier);
        let input = BlockInput {
            header: block(1),
            transactions: &transactions,
        };

        let result = executor.execute_block(&mut state, &input).expect("both bootstrap via pre-block state");
        assert_eq!(result.receipts.len(), 2);
        assert_eq!(state.get_account(from).nonce, 2);
        assert_eq!(result.receipts[0].status, gtos_common::TxStatus::Success);
        assert_eq!(result.receipts[1].status, gtos_common::TxStatus::Success);
    }
}
