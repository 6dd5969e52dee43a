//! Minimal event-log encoding for `emit` (`spec.md` §4.G "Logging").
//! Value types encode as a 32-byte big-endian word; reference types
//! (byte strings) encode as `keccak(bytes)` when used as an indexed
//! topic (topics are fixed-width) and as `len(u256) || bytes padded to
//! a 32-byte boundary` in non-indexed `data` — a simplified stand-in
//! for full Solidity-style dynamic ABI tuple encoding, documented as
//! such since the spec abstracts the exact encoding and only commits to
//! `topics[0] = keccak(canonicalSig)` and a decodable `data` section.

use gtos_crypto::keccak256;

use crate::value::Value;

pub fn encode_topic(value: &Value) -> [u8; 32] {
    match value {
        Value::Uint(v) => v.to_big_endian(),
        Value::Bool(v) => {
            let mut word = [0u8; 32];
            word[31] = *v as u8;
            word
        }
        Value::Address(addr) => addr.0,
        Value::Bytes(bytes) => keccak256(bytes).0,
        Value::Nil => [0u8; 32],
    }
}

pub fn encode_data_field(out: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Uint(v) => out.extend_from_slice(&v.to_big_endian()),
        Value::Bool(v) => {
            let mut word = [0u8; 32];
            word[31] = *v as u8;
            out.extend_from_slice(&word);
        }
        Value::Address(addr) => out.extend_from_slice(&addr.0),
        Value::Bytes(bytes) => {
            let len = gtos_common::U256::from(bytes.len() as u64);
            out.extend_from_slice(&len.to_big_endian());
            let mut padded = bytes.clone();
            let remainder = padded.len() % 32;
            if remainder != 0 {
                padded.resize(padded.len() + (32 - remainder), 0);
            }
            out.extend_from_slice(&padded);
        }
        Value::Nil => out.extend_from_slice(&[0u8; 32]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_data_field_is_length_prefixed_and_padded() {
        let mut out = Vec::new();
        encode_data_field(&mut out, &Value::Bytes(vec![1, 2, 3]));
        assert_eq!(out.len(), 32 + 32);
        assert_eq!(out[31], 3);
        assert_eq!(&out[32..35], &[1, 2, 3]);
    }

    #[test]
    fn topic_for_bytes_is_keccak() {
        let bytes = vec![9u8, 9, 9];
        assert_eq!(encode_topic(&Value::Bytes(bytes.clone())), keccak256(&bytes).0);
    }
}
