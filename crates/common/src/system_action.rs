//! System-action wire format (`spec.md` §4.F): a tag byte selecting the
//! action kind, followed by an RLP-encoded payload. Lives in this crate
//! (rather than in `gtos-system`, which executes these actions) because
//! `gtos-signer`'s bootstrap exception (`spec.md` §4.B step 7) also
//! needs to recognise an `AccountSetSigner` payload without depending
//! on the action-execution crate.

use gtos_rlp::structs::{Decoder, Encoder};
use gtos_rlp::{RLPDecode, RLPDecodeError, RLPEncode};
use thiserror::Error;

use crate::scheme::Scheme;

const TAG_ACCOUNT_SET_SIGNER: u8 = 0x01;
const TAG_KV_PUT: u8 = 0x02;
const TAG_KV_DELETE: u8 = 0x03;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SystemAction {
    AccountSetSigner {
        scheme: Scheme,
        public_key: Vec<u8>,
    },
    KvPut {
        namespace: Vec<u8>,
        key: Vec<u8>,
        value: Vec<u8>,
        ttl_blocks: u64,
    },
    KvDelete {
        namespace: Vec<u8>,
        key: Vec<u8>,
    },
}

#[derive(Debug, Error)]
pub enum SystemActionError {
    #[error("system action payload is empty")]
    EmptyPayload,

    #[error("unknown system action kind: {0:#x}")]
    UnknownKind(u8),

    #[error("malformed system action payload: {0}")]
    Malformed(#[from] RLPDecodeError),

    #[error("unknown signer scheme id in payload: {0}")]
    UnknownScheme(String),
}

impl SystemAction {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        match self {
            SystemAction::AccountSetSigner { scheme, public_key } => {
                out.push(TAG_ACCOUNT_SET_SIGNER);
                Encoder::new(&mut out)
                    .encode_field(&scheme.as_str().as_bytes().to_vec())
                    .encode_field(public_key)
                    .finish();
            }
            SystemAction::KvPut {
                namespace,
                key,
                value,
                ttl_blocks,
            } => {
                out.push(TAG_KV_PUT);
                Encoder::new(&mut out)
                    .encode_field(namespace)
                    .encode_field(key)
                    .encode_field(value)
                    .encode_field(ttl_blocks)
                    .finish();
            }
            SystemAction::KvDelete { namespace, key } => {
                out.push(TAG_KV_DELETE);
                Encoder::new(&mut out)
                    .encode_field(namespace)
                    .encode_field(key)
                    .finish();
            }
        }
        out
    }

    pub fn decode(data: &[u8]) -> Result<Self, SystemActionError> {
        let (tag, rest) = data.split_first().ok_or(SystemActionError::EmptyPayload)?;
        match *tag {
            TAG_ACCOUNT_SET_SIGNER => {
                let decoder = Decoder::new(rest)?;
                let (scheme_bytes, decoder) = decoder.decode_field::<Vec<u8>>("scheme")?;
                let (public_key, decoder) = decoder.decode_field::<Vec<u8>>("public_key")?;
                decoder.finish()?;
                let scheme_str = String::from_utf8_lossy(&scheme_bytes).to_string();
                let scheme = Scheme::from_str_id(&scheme_str)
                    .ok_or(SystemActionError::UnknownScheme(scheme_str))?;
                Ok(SystemAction::AccountSetSigner { scheme, public_key })
            }
            TAG_KV_PUT => {
                let decoder = Decoder::new(rest)?;
                let (namespace, decoder) = decoder.decode_field::<Vec<u8>>("namespace")?;
                let (key, decoder) = decoder.decode_field::<Vec<u8>>("key")?;
                let (value, decoder) = decoder.decode_field::<Vec<u8>>("value")?;
                let (ttl_blocks, decoder) = decoder.decode_field::<u64>("ttl_blocks")?;
                decoder.finish()?;
                Ok(SystemAction::KvPut {
                    namespace,
                    key,
                    value,
                    ttl_blocks,
                })
            }
            TAG_KV_DELETE => {
                let decoder = Decoder::new(rest)?;
                let (namespace, decoder) = decoder.decode_field::<Vec<u8>>("namespace")?;
                let (key, decoder) = decoder.decode_field::<Vec<u8>>("key")?;
                decoder.finish()?;
                Ok(SystemAction::KvDelete { namespace, key })
            }
            other => Err(SystemActionError::UnknownKind(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_set_signer_roundtrip() {
        let action = SystemAction::AccountSetSigner {
            scheme: Scheme::Ed25519,
            public_key: vec![1, 2, 3, 4],
        };
        let encoded = action.encode();
        let decoded = SystemAction::decode(&encoded).expect("decodes");
        assert_eq!(decoded, action);
    }

    #[test]
    fn kv_put_roundtrip() {
        let action = SystemAction::KvPut {
            namespace: b"ns".to_vec(),
            key: b"k".to_vec(),
            value: b"v".to_vec(),
            ttl_blocks: 42,
        };
        let encoded = action.encode();
        let decoded = SystemAction::decode(&encoded).expect("decodes");
        assert_eq!(decoded, action);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = SystemAction::decode(&[0xff]).unwrap_err();
        assert!(matches!(err, SystemActionError::UnknownKind(0xff)));
    }
}
