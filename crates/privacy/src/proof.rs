//! Pluggable boundary for Shield/Transfer/Unshield proof verification
//! (`spec.md` §1, §9): the zero-knowledge backend is an external
//! collaborator, not something this crate implements. [`RejectingVerifier`]
//! is the default, structurally-checking-only implementation — it never
//! considers a proof valid, matching `spec.md` §4.H's `ErrProofNotImplemented`
//! being the default outcome until a real backend is wired in.

use gtos_common::Ciphertext;

pub trait ProofVerifier: Send + Sync {
    fn verify_shield(&self, sender_ciphertext: Ciphertext, amount: u64, proof: &[u8]) -> bool;

    fn verify_transfer(
        &self,
        sender_ciphertext: Ciphertext,
        receiver_delta: Ciphertext,
        proof: &[u8],
    ) -> bool;

    /// `amount` is the envelope's claimed amount; the proof's first 8
    /// bytes big-endian must equal it (`spec.md` §4.H) — callers check
    /// that consistency themselves, so a verifier only needs to attest
    /// the proof's cryptographic validity.
    fn verify_unshield(&self, sender_ciphertext: Ciphertext, amount: u64, proof: &[u8]) -> bool;
}

/// Default verifier: always rejects. Any real deployment replaces this
/// with a backend wired to an actual proving system.
pub struct RejectingVerifier;

impl ProofVerifier for RejectingVerifier {
    fn verify_shield(&self, _sender_ciphertext: Ciphertext, _amount: u64, _proof: &[u8]) -> bool {
        false
    }

    fn verify_transfer(&self, _sender_ciphertext: Ciphertext, _receiver_delta: Ciphertext, _proof: &[u8]) -> bool {
        false
    }

    fn verify_unshield(&self, _sender_ciphertext: Ciphertext, _amount: u64, _proof: &[u8]) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejecting_verifier_rejects_everything() {
        let verifier = RejectingVerifier;
        assert!(!verifier.verify_shield(Ciphertext::ZERO, 1, &[]));
        assert!(!verifier.verify_transfer(Ciphertext::ZERO, Ciphertext::ZERO, &[]));
        assert!(!verifier.verify_unshield(Ciphertext::ZERO, 1, &[]));
    }
}
