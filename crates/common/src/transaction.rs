//! On-wire transaction shapes (`spec.md` §3, §6).
//!
//! Two shapes exist: the legacy secp256k1-only shape (kept for
//! compatibility, mirroring the teacher's `LegacyTransaction`) and the
//! "signer transaction" shape this core is built around, which commits
//! `chain_id` and `signer_type` into the signing digest so that
//! cross-chain and cross-scheme replay are impossible (`spec.md` §3).

use gtos_rlp::structs::{Decoder, Encoder};
use gtos_rlp::{RLPDecode, RLPDecodeError, RLPEncode};
use serde::{Deserialize, Serialize};

use crate::fixed::{Address, StorageSlot, U256};
use crate::scheme::Scheme;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessListEntry {
    pub address: Address,
    pub storage_keys: Vec<StorageSlot>,
}

impl RLPEncode for AccessListEntry {
    fn encode(&self, buf: &mut dyn bytes::BufMut) {
        Encoder::new(buf)
            .encode_field(&self.address.0)
            .encode_field(
                &self
                    .storage_keys
                    .iter()
                    .map(|k| k.0)
                    .collect::<Vec<_>>(),
            )
            .finish();
    }
}

impl RLPDecode for AccessListEntry {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let decoder = Decoder::new(rlp)?;
        let (address, decoder) = decoder.decode_field::<[u8; 32]>("address")?;
        let (storage_keys, decoder) = decoder.decode_field::<Vec<[u8; 32]>>("storage_keys")?;
        Ok((
            AccessListEntry {
                address: Address(address),
                storage_keys: storage_keys.into_iter().map(StorageSlot).collect(),
            },
            decoder.finish()?,
        ))
    }
}

/// Scheme-tagged (R, S) signature tuple. Widths are fixed at 48 bytes
/// regardless of scheme (`DESIGN.md`'s resolution of the §9 Open
/// Question on BLS widening): narrower schemes zero-pad their unused
/// high bytes, and those zero bytes are part of the signing digest, so
/// they cannot be reused as a side channel. `v` is only meaningful for
/// the bootstrap ECDSA-recovery path (`spec.md` §4.B step 4).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureTuple {
    pub v: u8,
    pub r: [u8; 48],
    pub s: [u8; 48],
}

impl SignatureTuple {
    pub fn scheme_width(&self, scheme: Scheme) -> (&[u8], &[u8]) {
        let (rw, sw) = scheme.signature_widths();
        (&self.r[48 - rw..], &self.s[48 - sw..])
    }
}

impl RLPEncode for SignatureTuple {
    fn encode(&self, buf: &mut dyn bytes::BufMut) {
        Encoder::new(buf)
            .encode_field(&self.v)
            .encode_field(&self.r.to_vec())
            .encode_field(&self.s.to_vec())
            .finish();
    }
}

impl RLPDecode for SignatureTuple {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let decoder = Decoder::new(rlp)?;
        let (v, decoder) = decoder.decode_field("v")?;
        let (r, decoder) = decoder.decode_field::<Vec<u8>>("r")?;
        let (s, decoder) = decoder.decode_field::<Vec<u8>>("s")?;
        if r.len() != 48 || s.len() != 48 {
            return Err(RLPDecodeError::InvalidLength);
        }
        let mut r_arr = [0u8; 48];
        let mut s_arr = [0u8; 48];
        r_arr.copy_from_slice(&r);
        s_arr.copy_from_slice(&s);
        Ok((
            SignatureTuple {
                v,
                r: r_arr,
                s: s_arr,
            },
            decoder.finish()?,
        ))
    }
}

/// Legacy secp256k1-only transaction shape, kept for compatibility.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyTransaction {
    pub nonce: u64,
    pub gas_price: U256,
    pub gas: u64,
    pub to: Option<Address>,
    pub value: U256,
    pub data: Vec<u8>,
    pub v: u64,
    pub r: [u8; 32],
    pub s: [u8; 32],
}

/// The "signer transaction" shape (`spec.md` §3): the sole shape the
/// multi-scheme sender resolver (component B) accepts for non-secp256k1
/// signers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerTransaction {
    pub chain_id: u64,
    pub nonce: u64,
    pub to: Option<Address>,
    pub value: U256,
    pub gas: u64,
    pub gas_fee_cap: U256,
    pub gas_tip_cap: U256,
    pub data: Vec<u8>,
    pub access_list: Vec<AccessListEntry>,
    /// Echoed by the sender but authoritatively re-derived during
    /// validation (`spec.md` §3 invariant).
    pub from: Address,
    pub signer_type: Scheme,
    pub signature: SignatureTuple,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transaction {
    Legacy(LegacyTransaction),
    Signer(SignerTransaction),
}

impl Transaction {
    pub fn nonce(&self) -> u64 {
        match self {
            Transaction::Legacy(tx) => tx.nonce,
            Transaction::Signer(tx) => tx.nonce,
        }
    }

    pub fn to(&self) -> Option<Address> {
        match self {
            Transaction::Legacy(tx) => tx.to,
            Transaction::Signer(tx) => tx.to,
        }
    }

    pub fn value(&self) -> U256 {
        match self {
            Transaction::Legacy(tx) => tx.value,
            Transaction::Signer(tx) => tx.value,
        }
    }

    pub fn data(&self) -> &[u8] {
        match self {
            Transaction::Legacy(tx) => &tx.data,
            Transaction::Signer(tx) => &tx.data,
        }
    }

    pub fn gas_limit(&self) -> u64 {
        match self {
            Transaction::Legacy(tx) => tx.gas,
            Transaction::Signer(tx) => tx.gas,
        }
    }

    pub fn access_list(&self) -> &[AccessListEntry] {
        match self {
            Transaction::Legacy(_) => &[],
            Transaction::Signer(tx) => &tx.access_list,
        }
    }

    /// Echoed `from` field (unauthoritative — see `spec.md` §3 invariant;
    /// re-derivation happens in `gtos-signer::resolver`).
    pub fn claimed_from(&self) -> Option<Address> {
        match self {
            Transaction::Legacy(_) => None,
            Transaction::Signer(tx) => Some(tx.from),
        }
    }

    /// Canonical byte preimage fed into the signing digest. For the
    /// signer-transaction shape this commits `(chain_id, signer_type)`
    /// in addition to every other field, per `spec.md` §4.B step 3 and
    /// the §3 invariant that makes cross-chain / cross-scheme replay
    /// impossible.
    pub fn signing_payload(&self) -> Vec<u8> {
        match self {
            Transaction::Legacy(tx) => {
                let mut buf = Vec::new();
                Encoder::new(&mut buf)
                    .encode_field(&tx.nonce)
                    .encode_field(&tx.gas_price)
                    .encode_field(&tx.gas)
                    .encode_field(&tx.to.map(|a| a.0))
                    .encode_field(&tx.value)
                    .encode_field(&tx.data)
                    .finish();
                buf
            }
            Transaction::Signer(tx) => {
                let mut buf = Vec::new();
                Encoder::new(&mut buf)
                    .encode_field(&tx.chain_id)
                    .encode_field(&tx.signer_type.as_str().as_bytes().to_vec())
                    .encode_field(&tx.nonce)
                    .encode_field(&tx.to.map(|a| a.0))
                    .encode_field(&tx.value)
                    .encode_field(&tx.gas)
                    .encode_field(&tx.gas_fee_cap)
                    .encode_field(&tx.gas_tip_cap)
                    .encode_field(&tx.data)
                    .encode_field(&tx.from.0)
                    .finish();
                buf
            }
        }
    }
}

impl RLPEncode for U256 {
    fn encode(&self, buf: &mut dyn bytes::BufMut) {
        let bytes = self.to_big_endian();
        let first_nonzero = bytes.iter().position(|b| *b != 0);
        match first_nonzero {
            None => gtos_rlp::encode::encode_bytes(buf, &[]),
            Some(i) => gtos_rlp::encode::encode_bytes(buf, &bytes[i..]),
        }
    }
}

impl RLPDecode for U256 {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let bytes = Vec::<u8>::decode_unfinished(rlp)?;
        let (bytes, rest) = bytes;
        if bytes.len() > 32 {
            return Err(RLPDecodeError::InvalidLength);
        }
        let mut padded = [0u8; 32];
        padded[32 - bytes.len()..].copy_from_slice(&bytes);
        Ok((U256::from_big_endian(&padded), rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_signer_tx(chain_id: u64, signer_type: Scheme, from: Address) -> SignerTransaction {
        SignerTransaction {
            chain_id,
            nonce: 3,
            to: Some(Address([9u8; 32])),
            value: U256::from_u64(100),
            gas: 21_000,
            gas_fee_cap: U256::from_u64(10),
            gas_tip_cap: U256::from_u64(1),
            data: vec![],
            access_list: vec![],
            from,
            signer_type,
            signature: SignatureTuple {
                v: 0,
                r: [1u8; 48],
                s: [2u8; 48],
            },
        }
    }

    #[test]
    fn signing_payload_binds_chain_id_and_scheme() {
        let from = Address([5u8; 32]);
        let tx_a = Transaction::Signer(sample_signer_tx(1, Scheme::Ed25519, from));
        let tx_b = Transaction::Signer(sample_signer_tx(1, Scheme::Secp256k1, from));
        let tx_c = Transaction::Signer(sample_signer_tx(2, Scheme::Ed25519, from));

        assert_ne!(tx_a.signing_payload(), tx_b.signing_payload());
        assert_ne!(tx_a.signing_payload(), tx_c.signing_payload());
    }

    #[test]
    fn access_list_entry_roundtrip() {
        let entry = AccessListEntry {
            address: Address([3u8; 32]),
            storage_keys: vec![StorageSlot([4u8; 32]), StorageSlot([5u8; 32])],
        };
        let encoded = entry.encode_to_vec();
        let decoded = AccessListEntry::decode(&encoded).expect("decodes");
        assert_eq!(decoded, entry);
    }
}
