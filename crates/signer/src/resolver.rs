//! Component B: the sender resolver (`spec.md` §4.B). Depends on a
//! `SignerRegistry` trait rather than a concrete state type so this
//! crate never depends on `gtos-state` — `gtos-state`'s account arena
//! implements the trait instead, the same inversion the teacher uses
//! between `ethrex_levm::vm` and its `Database` trait.

use gtos_common::{Address, Scheme, SignatureTuple, SignerMetadata, SystemAction, Transaction};
use gtos_crypto::secp256k1;

use crate::capability;
use crate::error::SignerError;

/// Read-only view of the signer-metadata registry, as it stood in
/// pre-block state (`spec.md` §4.B step 4 / §4.J step 2).
pub trait SignerRegistry {
    fn get(&self, address: Address) -> Option<SignerMetadata>;
}

pub struct ChainSigner {
    pub chain_id: u64,
}

impl ChainSigner {
    /// Resolves `tx`'s sender, per `spec.md` §4.B's seven-step
    /// algorithm. `claimed_chain_id`/`claimed_scheme` are read straight
    /// off the wire transaction; only the signer-transaction shape
    /// supports schemes other than Secp256k1 (step 2).
    pub fn resolve_sender(
        &self,
        tx: &Transaction,
        registry: &dyn SignerRegistry,
    ) -> Result<Address, SignerError> {
        let Transaction::Signer(signer_tx) = tx else {
            return self.resolve_legacy_sender(tx);
        };

        if signer_tx.chain_id != self.chain_id {
            return Err(SignerError::ErrInvalidChainId);
        }

        let claimed_scheme = signer_tx.signer_type;
        let digest = keccak_digest(tx);
        let signature = &signer_tx.signature;

        match registry.get(signer_tx.from) {
            None => {
                if claimed_scheme == Scheme::Secp256k1 {
                    let recovered = secp256k1::ecrecover(
                        &digest,
                        signature.v,
                        &signature.scheme_width(claimed_scheme).0,
                        &signature.scheme_width(claimed_scheme).1,
                    )?;
                    if recovered != signer_tx.from {
                        return Err(SignerError::ErrInvalidAccountSignerSignature);
                    }
                    Ok(recovered)
                } else if self.is_valid_bootstrap(tx, claimed_scheme, &digest, signature) {
                    Ok(signer_tx.from)
                } else {
                    Err(SignerError::ErrAccountSignerRequiredMeta)
                }
            }
            Some(meta) => {
                if meta.scheme != claimed_scheme {
                    return Err(SignerError::ErrAccountSignerMismatch);
                }
                let (r, s) = signature.scheme_width(claimed_scheme);
                if !capability::verify(meta.scheme, &meta.public_key, &digest, r, s) {
                    return Err(SignerError::ErrInvalidAccountSignerSignature);
                }
                if capability::derive_address(meta.scheme, &meta.public_key) != signer_tx.from {
                    return Err(SignerError::ErrAccountSignerMismatch);
                }
                Ok(signer_tx.from)
            }
        }
    }

    /// Legacy shape: Secp256k1-only ECDSA recovery, no registry lookup
    /// (mirrors the teacher's pre-signer-metadata transaction types).
    fn resolve_legacy_sender(&self, tx: &Transaction) -> Result<Address, SignerError> {
        let Transaction::Legacy(legacy) = tx else {
            return Err(SignerError::ErrUnsupportedAccountSignerType);
        };
        let digest = keccak_digest(tx);
        let recovery_id = ((legacy.v + 1) % 2) as u8;
        secp256k1::ecrecover(&digest, recovery_id, &legacy.r, &legacy.s).map_err(SignerError::from)
    }

    /// Step 7 bootstrap exception: installing signer metadata for a
    /// non-Secp256k1 account via a self-consistent `AccountSetSigner`
    /// action is the only way such an account becomes resolvable.
    fn is_valid_bootstrap(
        &self,
        tx: &Transaction,
        claimed_scheme: Scheme,
        digest: &[u8; 32],
        signature: &SignatureTuple,
    ) -> bool {
        let Transaction::Signer(signer_tx) = tx else {
            return false;
        };
        if signer_tx.to != Some(gtos_common::SYSTEM_ACTION_ADDRESS) {
            return false;
        }
        let Ok(SystemAction::AccountSetSigner { scheme, public_key }) = SystemAction::decode(&signer_tx.data) else {
            return false;
        };
        if scheme != claimed_scheme {
            return false;
        }
        if capability::derive_address(scheme, &public_key) != signer_tx.from {
            return false;
        }
        let (r, s) = signature.scheme_width(claimed_scheme);
        capability::verify(scheme, &public_key, digest, r, s)
    }
}

fn keccak_digest(tx: &Transaction) -> [u8; 32] {
    gtos_crypto::keccak256(&tx.signing_payload()).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use gtos_common::{Address, SignatureTuple, SignerTransaction};
    use std::collections::HashMap;

    struct InMemoryRegistry(HashMap<Address, SignerMetadata>);

    impl SignerRegistry for InMemoryRegistry {
        fn get(&self, address: Address) -> Option<SignerMetadata> {
            self.0.get(&address).cloned()
        }
    }

    fn bare_signer_tx(chain_id: u64, from: Address, signer_type: Scheme) -> Transaction {
        Transaction::Signer(SignerTransaction {
            chain_id,
            nonce: 0,
            to: Some(Address([2u8; 32])),
            value: gtos_common::U256::ZERO,
            gas: 21_000,
            gas_fee_cap: gtos_common::U256::ZERO,
            gas_tip_cap: gtos_common::U256::ZERO,
            data: vec![],
            access_list: vec![],
            from,
            signer_type,
            signature: SignatureTuple {
                v: 0,
                r: [0u8; 48],
                s: [0u8; 48],
            },
        })
    }

    #[test]
    fn rejects_wrong_chain_id() {
        let signer = ChainSigner { chain_id: 1 };
        let registry = InMemoryRegistry(HashMap::new());
        let tx = bare_signer_tx(2, Address([1u8; 32]), Scheme::Secp256k1);
        let err = signer.resolve_sender(&tx, &registry).unwrap_err();
        assert!(matches!(err, SignerError::ErrInvalidChainId));
    }

    #[test]
    fn rejects_missing_metadata_for_non_bootstrap_scheme() {
        let signer = ChainSigner { chain_id: 1 };
        let registry = InMemoryRegistry(HashMap::new());
        let tx = bare_signer_tx(1, Address([1u8; 32]), Scheme::Ed25519);
        let err = signer.resolve_sender(&tx, &registry).unwrap_err();
        assert!(matches!(err, SignerError::ErrAccountSignerRequiredMeta));
    }
}
