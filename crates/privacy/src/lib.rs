//! Component H: the Shield/Transfer/Unshield private-balance engine
//! (`spec.md` §4.H, §6, §7).

pub mod effects;
pub mod envelope;
pub mod error;
pub mod proof;

use gtos_common::Address;
use gtos_config::PrivacyProofSizes;
use gtos_state::StateDb;

pub use error::PrivacyError;
pub use envelope::{decode, PrivateAction, ShieldBody, TransferBody, UnshieldBody};
pub use proof::{ProofVerifier, RejectingVerifier};

/// Decodes the envelope addressed to `PrivacyRouterAddress` and routes
/// it to the matching effect (`spec.md` §4.E dispatch step "to ==
/// PrivacyRouterAddress → applyPrivateAction").
pub fn apply_private_action(
    state: &mut StateDb,
    sender: Address,
    payload: &[u8],
    sizes: PrivacyProofSizes,
    base_unit: u64,
    verifier: &dyn ProofVerifier,
) -> Result<(), PrivacyError> {
    match decode(payload, sizes)? {
        PrivateAction::Shield(body) => effects::apply_shield(state, sender, body, base_unit, verifier),
        PrivateAction::Transfer(body) => effects::apply_transfer(state, sender, body, verifier),
        PrivateAction::Unshield(body) => effects::apply_unshield(state, sender, body, base_unit, verifier),
    }
}
