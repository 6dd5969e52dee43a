//! Component C: the message materialiser (`spec.md` §4.C), run for
//! every transaction in a block against *pre-block* state before any
//! transaction executes (`spec.md` §4.J step 2).
//!
//! Sender resolution is pure and read-only against the registry
//! snapshot, so per-transaction resolution is independent of every
//! other transaction in the block — the one place this core safely
//! parallelises across transactions with `rayon`, mirroring the
//! teacher's use of `rayon` for read-only state warming ahead of
//! serial execution (`ethrex-vm`'s parallel warming pass).

use gtos_common::{Message, Transaction, U256};
use gtos_signer::{ChainSigner, SignerRegistry};
use rayon::prelude::*;

use crate::errors::BlockExecutionError;

fn fee_caps(tx: &Transaction) -> (U256, U256) {
    match tx {
        Transaction::Legacy(legacy) => (legacy.gas_price, legacy.gas_price),
        Transaction::Signer(signer_tx) => (signer_tx.gas_fee_cap, signer_tx.gas_tip_cap),
    }
}

fn materialize_one(tx: &Transaction, chain_signer: &ChainSigner, registry: &dyn SignerRegistry, base_fee: Option<u64>) -> Result<Message, gtos_signer::SignerError> {
    let from = chain_signer.resolve_sender(tx, registry)?;
    let (fee_cap, tip_cap) = fee_caps(tx);
    let effective_gas_price = gtos_gas::effective_gas_price(fee_cap, tip_cap, base_fee);
    Ok(Message {
        from,
        to: tx.to(),
        nonce: tx.nonce(),
        value: tx.value(),
        gas_limit: tx.gas_limit(),
        effective_gas_price,
        fee_cap,
        tip_cap,
        data: tx.data().to_vec(),
        access_list: tx.access_list().to_vec(),
        is_fake_call: false,
    })
}

/// Materialises one `Message` per transaction, in order, against a
/// single pre-block `registry` snapshot (`spec.md` §4.J step 2: later
/// transactions must never observe signer-metadata updates made by
/// earlier transactions in the same block). Resolution itself runs in
/// parallel; any failure is consensus-fatal and aborts the whole block.
pub fn materialize_messages(
    transactions: &[Transaction],
    chain_signer: &ChainSigner,
    registry: &dyn SignerRegistry,
    base_fee: Option<u64>,
) -> Result<Vec<Message>, BlockExecutionError> {
    transactions
        .par_iter()
        .enumerate()
        .map(|(index, tx)| materialize_one(tx, chain_signer, registry, base_fee).map_err(|source| BlockExecutionError::InvalidSender { index, source }))
        .collect()
}
