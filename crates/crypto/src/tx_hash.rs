//! Canonical transaction hash: `keccak256(signing_payload || signature)`.
//!
//! Binding the signature (not just the unsigned payload, as
//! `gtos_signer::resolver`'s `keccak_digest` does for recovery) means
//! two transactions that differ only in signature hash differently,
//! matching the teacher's `Transaction::hash` convention of hashing
//! the fully-signed encoding rather than the sign-digest preimage.

use gtos_common::{Digest, Transaction};

use crate::keccak::keccak256;

pub fn tx_hash(tx: &Transaction) -> Digest {
    let mut buf = tx.signing_payload();
    match tx {
        Transaction::Legacy(legacy) => {
            buf.push(legacy.v as u8);
            buf.extend_from_slice(&legacy.r);
            buf.extend_from_slice(&legacy.s);
        }
        Transaction::Signer(signer_tx) => {
            buf.push(signer_tx.signature.v);
            buf.extend_from_slice(&signer_tx.signature.r);
            buf.extend_from_slice(&signer_tx.signature.s);
        }
    }
    keccak256(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gtos_common::{LegacyTransaction, U256};

    fn sample() -> Transaction {
        Transaction::Legacy(LegacyTransaction {
            nonce: 1,
            gas_price: U256::from_u64(1),
            gas: 21_000,
            to: None,
            value: U256::ZERO,
            data: vec![],
            v: 27,
            r: [1u8; 32],
            s: [2u8; 32],
        })
    }

    #[test]
    fn differs_by_signature_alone() {
        let mut a = sample();
        let Transaction::Legacy(ref mut tx) = a else {
            unreachable!()
        };
        tx.s = [3u8; 32];
        assert_ne!(tx_hash(&sample()), tx_hash(&a));
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(tx_hash(&sample()), tx_hash(&sample()));
    }
}
