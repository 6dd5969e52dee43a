//! Component I: set-code / TTL storage (`spec.md` §4.I), grounded in
//! the EIP-7702 precedent for attaching temporary code to an EOA
//! (`crates/common/types/transaction.rs`'s `EIP7702Transaction`),
//! generalized from authorization-tuple-gated to TTL-gated.

use gtos_common::Address;
use gtos_state::StateDb;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetCodeError {
    #[error("setCode requires a non-zero TTL")]
    ErrZeroTtl,

    #[error("setCode requires non-empty code")]
    ErrEmptyCode,

    #[error("setCode payload shorter than the 8-byte TTL prefix")]
    ErrMalformedPayload,
}

pub struct SetCodePayload {
    pub ttl_blocks: u64,
    pub code: Vec<u8>,
}

impl SetCodePayload {
    pub fn encode(ttl_blocks: u64, code: Vec<u8>) -> Result<Self, SetCodeError> {
        if ttl_blocks == 0 {
            return Err(SetCodeError::ErrZeroTtl);
        }
        if code.is_empty() {
            return Err(SetCodeError::ErrEmptyCode);
        }
        Ok(Self { ttl_blocks, code })
    }

    /// Decodes the `to == nil` transaction's `data` field (`spec.md`
    /// §4.E "applySetCode"): `ttl_blocks(u64 big-endian) || code`.
    pub fn decode(data: &[u8]) -> Result<Self, SetCodeError> {
        if data.len() < 8 {
            return Err(SetCodeError::ErrMalformedPayload);
        }
        let mut ttl_bytes = [0u8; 8];
        ttl_bytes.copy_from_slice(&data[..8]);
        let ttl_blocks = u64::from_be_bytes(ttl_bytes);
        Self::encode(ttl_blocks, data[8..].to_vec())
    }
}

/// Installs `payload.code` on `sender` with an expiry at
/// `current_block + ttl_blocks`. A live (non-expired) entry may be
/// overwritten by a fresh `setCode` at or after its own expiry without
/// an explicit clear (`spec.md` §4.I).
pub fn apply_set_code(state: &mut StateDb, sender: Address, payload: SetCodePayload, current_block: u64) {
    let code_hash = state.install_code(payload.code);
    let expire_at = current_block.saturating_add(payload.ttl_blocks);
    state.set_code_with_ttl(sender, code_hash, current_block, expire_at);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_ttl() {
        assert_eq!(SetCodePayload::encode(0, vec![1]), Err(SetCodeError::ErrZeroTtl));
    }

    #[test]
    fn rejects_empty_code() {
        assert_eq!(SetCodePayload::encode(5, vec![]), Err(SetCodeError::ErrEmptyCode));
    }

    #[test]
    fn installed_code_expires_lazily() {
        let mut state = StateDb::new();
        let sender = Address([3u8; 32]);
        let payload = SetCodePayload::encode(10, vec![0x01, 0x02]).expect("valid");
        apply_set_code(&mut state, sender, payload, 100);
        assert!(state.live_code_hash(sender, 105).is_some());
        assert!(state.live_code_hash(sender, 110).is_none());
    }

    #[test]
    fn decode_splits_ttl_prefix_from_code() {
        let mut data = 7u64.to_be_bytes().to_vec();
        data.extend_from_slice(&[0xaa, 0xbb]);
        let payload = SetCodePayload::decode(&data).expect("valid");
        assert_eq!(payload.ttl_blocks, 7);
        assert_eq!(payload.code, vec![0xaa, 0xbb]);
    }

    #[test]
    fn decode_rejects_short_payload() {
        assert_eq!(SetCodePayload::decode(&[1, 2, 3]), Err(SetCodeError::ErrMalformedPayload));
    }
}
