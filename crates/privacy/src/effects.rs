//! Shield/Transfer/Unshield effects (`spec.md` §4.H), applied in the
//! order §9 mandates: "(i) collect pre-images, (ii) verify proof, (iii)
//! compute new versions and check overflow, (iv) apply atomically" — so
//! a failing proof, or either side overflowing its version counter,
//! leaves every touched account at its exact pre-call state (no
//! version bump, no balance write).

use gtos_common::{Address, Scheme, U256};
use gtos_state::StateDb;
use tracing::instrument;

use crate::envelope::{ShieldBody, TransferBody, UnshieldBody};
use crate::error::PrivacyError;
use crate::proof::ProofVerifier;

fn require_elgamal_signer(state: &StateDb, address: Address) -> Result<(), PrivacyError> {
    match state.get_signer_metadata(address) {
        Some(meta) if meta.scheme == Scheme::Elgamal => Ok(()),
        _ => Err(PrivacyError::ErrSenderNotElgamal),
    }
}

#[instrument(skip(state, verifier, body), fields(sender = %sender))]
pub fn apply_shield(
    state: &mut StateDb,
    sender: Address,
    body: ShieldBody,
    base_unit: u64,
    verifier: &dyn ProofVerifier,
) -> Result<(), PrivacyError> {
    require_elgamal_signer(state, sender)?;

    let sender_balance = state.get_private_balance(sender);
    let amount_units = U256::from(body.amount).saturating_mul_u64(base_unit);
    let sender_account = state.get_account(sender);
    if sender_account.balance < amount_units {
        return Err(PrivacyError::ErrInsufficientFundsForTransfer);
    }

    if !verifier.verify_shield(sender_balance.ciphertext, body.amount, &body.proof) {
        return Err(PrivacyError::ErrProofNotImplemented);
    }

    let next_balance = sender_balance
        .advance(body.new_sender_ciphertext)
        .ok_or(PrivacyError::ErrVersionOverflow)?;

    let mut account = sender_account;
    account.balance = account.balance.saturating_sub(amount_units);
    state.set_account(sender, account);
    state.set_private_balance(sender, next_balance);
    Ok(())
}

#[instrument(skip(state, verifier, body), fields(sender = %sender))]
pub fn apply_transfer(
    state: &mut StateDb,
    sender: Address,
    body: TransferBody,
    verifier: &dyn ProofVerifier,
) -> Result<(), PrivacyError> {
    let sender_balance = state.get_private_balance(sender);
    let receiver_balance = state.get_private_balance(body.to);

    if !verifier.verify_transfer(sender_balance.ciphertext, body.receiver_delta_ciphertext, &body.proof) {
        return Err(PrivacyError::ErrProofNotImplemented);
    }

    let next_sender = sender_balance
        .advance(body.new_sender_ciphertext)
        .ok_or(PrivacyError::ErrVersionOverflow)?;

    let combined_commitment = gtos_crypto::add_points(
        &receiver_balance.ciphertext.commitment.0,
        &body.receiver_delta_ciphertext.commitment.0,
    )
    .map_err(|_| PrivacyError::ErrProofNotImplemented)?;
    let combined_handle = gtos_crypto::add_points(
        &receiver_balance.ciphertext.handle.0,
        &body.receiver_delta_ciphertext.handle.0,
    )
    .map_err(|_| PrivacyError::ErrProofNotImplemented)?;
    let combined_ciphertext = gtos_common::Ciphertext {
        commitment: gtos_common::Digest(combined_commitment),
        handle: gtos_common::Digest(combined_handle),
    };

    let next_receiver = receiver_balance
        .advance(combined_ciphertext)
        .ok_or(PrivacyError::ErrVersionOverflow)?;

    state.set_private_balance(sender, next_sender);
    state.set_private_balance(body.to, next_receiver);
    Ok(())
}

#[instrument(skip(state, verifier, body), fields(sender = %sender))]
pub fn apply_unshield(
    state: &mut StateDb,
    sender: Address,
    body: UnshieldBody,
    base_unit: u64,
    verifier: &dyn ProofVerifier,
) -> Result<(), PrivacyError> {
    let proof_amount = body
        .proof
        .get(0..8)
        .map(|bytes| u64::from_be_bytes(bytes.try_into().unwrap_or([0; 8])));
    if proof_amount != Some(body.amount) {
        return Err(PrivacyError::ErrAmountMismatch);
    }

    let sender_balance = state.get_private_balance(sender);
    if !verifier.verify_unshield(sender_balance.ciphertext, body.amount, &body.proof) {
        return Err(PrivacyError::ErrProofNotImplemented);
    }

    let next_sender = sender_balance
        .advance(body.new_sender_ciphertext)
        .ok_or(PrivacyError::ErrVersionOverflow)?;

    let amount_units = U256::from(body.amount).saturating_mul_u64(base_unit);
    let mut receiver_account = state.get_account(body.to);
    receiver_account.balance = receiver_account.balance.saturating_add(amount_units);

    state.set_private_balance(sender, next_sender);
    state.set_account(body.to, receiver_account);
    Ok(())
}
