use bytes::BufMut;

use crate::decode::RLPDecode;
use crate::encode::{RLPEncode, encode_list_payload};
use crate::error::RLPDecodeError;

/// Builder that accumulates RLP-encoded fields into a list payload,
/// mirroring `ethrex_rlp::structs::Encoder`'s `encode_field` /
/// `encode_optional_field` / `finish` chain used throughout
/// `crates/common/types/transaction.rs`.
pub struct Encoder<'a> {
    buf: &'a mut dyn BufMut,
    payload: Vec<u8>,
}

impl<'a> Encoder<'a> {
    pub fn new(buf: &'a mut dyn BufMut) -> Self {
        Self {
            buf,
            payload: Vec::new(),
        }
    }

    pub fn encode_field<T: RLPEncode>(mut self, value: &T) -> Self {
        value.encode(&mut self.payload);
        self
    }

    pub fn encode_optional_field<T: RLPEncode>(mut self, value: &Option<T>) -> Self {
        value.encode(&mut self.payload);
        self
    }

    pub fn finish(self) {
        encode_list_payload(self.buf, &self.payload);
    }
}

/// Builder that walks an RLP list payload field by field, mirroring
/// `ethrex_rlp::structs::Decoder`.
pub struct Decoder<'a> {
    /// Cursor over the list's own payload, consumed field by field.
    payload_cursor: &'a [u8],
    /// Whatever trails the list item itself in the original buffer —
    /// returned by `finish()` as the outer `decode_unfinished` remainder.
    outer_remainder: &'a [u8],
}

impl<'a> Decoder<'a> {
    pub fn new(rlp: &'a [u8]) -> Result<Self, RLPDecodeError> {
        let (is_list, payload, outer_remainder) = crate::decode::decode_rlp_item(rlp)?;
        if !is_list {
            return Err(RLPDecodeError::ExpectedList);
        }
        Ok(Self {
            payload_cursor: payload,
            outer_remainder,
        })
    }

    pub fn decode_field<T: RLPDecode>(self, _name: &'static str) -> Result<(T, Self), RLPDecodeError> {
        let (value, rest) = T::decode_unfinished(self.payload_cursor)?;
        Ok((
            value,
            Self {
                payload_cursor: rest,
                outer_remainder: self.outer_remainder,
            },
        ))
    }

    pub fn decode_optional_field<T: RLPDecode>(self) -> (Option<T>, Self) {
        match T::decode_unfinished(self.payload_cursor) {
            Ok((value, rest)) => (
                Some(value),
                Self {
                    payload_cursor: rest,
                    outer_remainder: self.outer_remainder,
                },
            ),
            Err(_) => (None, self),
        }
    }

    /// Finish decoding: fails if the list's payload was not fully
    /// consumed, and returns whatever follows the list item itself.
    pub fn finish(self) -> Result<&'a [u8], RLPDecodeError> {
        if !self.payload_cursor.is_empty() {
            return Err(RLPDecodeError::TrailingBytes("Decoder::finish"));
        }
        Ok(self.outer_remainder)
    }
}
