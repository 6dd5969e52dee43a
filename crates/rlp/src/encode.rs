use bytes::BufMut;

use crate::constants::{LIST_LONG_OFFSET, LIST_OFFSET, SHORT_FORM_MAX_LEN, STRING_LONG_OFFSET, STRING_OFFSET};

pub trait RLPEncode {
    fn encode(&self, buf: &mut dyn BufMut);

    fn encode_to_vec(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode(&mut buf);
        buf
    }
}

/// Encodes the *payload* of a structure without RLP's own item framing
/// (used for the transaction-signing digest, which wraps the fields in
/// a type-byte-prefixed envelope rather than a bare RLP list — see
/// `spec.md` §6).
pub trait PayloadRLPEncode {
    fn encode_payload(&self, buf: &mut dyn BufMut);

    fn encode_payload_to_vec(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode_payload(&mut buf);
        buf
    }
}

pub(crate) fn encode_length_prefix(buf: &mut dyn BufMut, len: usize, short_offset: u8, long_offset: u8) {
    if len <= SHORT_FORM_MAX_LEN {
        buf.put_u8(short_offset + len as u8);
    } else {
        let len_bytes = len.to_be_bytes();
        let first_nonzero = len_bytes.iter().position(|b| *b != 0).unwrap_or(7);
        let trimmed = &len_bytes[first_nonzero..];
        buf.put_u8(long_offset + trimmed.len() as u8);
        buf.put_slice(trimmed);
    }
}

pub fn encode_bytes(buf: &mut dyn BufMut, bytes: &[u8]) {
    if bytes.len() == 1 && bytes[0] < 0x80 {
        buf.put_u8(bytes[0]);
        return;
    }
    encode_length_prefix(buf, bytes.len(), STRING_OFFSET, STRING_LONG_OFFSET);
    buf.put_slice(bytes);
}

pub fn encode_list_payload(buf: &mut dyn BufMut, payload: &[u8]) {
    encode_length_prefix(buf, payload.len(), LIST_OFFSET, LIST_LONG_OFFSET);
    buf.put_slice(payload);
}

impl RLPEncode for u8 {
    fn encode(&self, buf: &mut dyn BufMut) {
        if *self == 0 {
            buf.put_u8(STRING_OFFSET);
        } else {
            encode_bytes(buf, &[*self]);
        }
    }
}

macro_rules! impl_rlp_encode_uint {
    ($ty:ty) => {
        impl RLPEncode for $ty {
            fn encode(&self, buf: &mut dyn BufMut) {
                let bytes = self.to_be_bytes();
                let first_nonzero = bytes.iter().position(|b| *b != 0);
                match first_nonzero {
                    None => buf.put_u8(STRING_OFFSET),
                    Some(i) => encode_bytes(buf, &bytes[i..]),
                }
            }
        }
    };
}

impl_rlp_encode_uint!(u16);
impl_rlp_encode_uint!(u32);
impl_rlp_encode_uint!(u64);
impl_rlp_encode_uint!(u128);

impl RLPEncode for bool {
    fn encode(&self, buf: &mut dyn BufMut) {
        (*self as u8).encode(buf);
    }
}

impl RLPEncode for [u8] {
    fn encode(&self, buf: &mut dyn BufMut) {
        encode_bytes(buf, self);
    }
}

impl RLPEncode for Vec<u8> {
    fn encode(&self, buf: &mut dyn BufMut) {
        encode_bytes(buf, self);
    }
}

impl<const N: usize> RLPEncode for [u8; N] {
    fn encode(&self, buf: &mut dyn BufMut) {
        encode_bytes(buf, self);
    }
}

impl<T: RLPEncode> RLPEncode for Vec<T> {
    fn encode(&self, buf: &mut dyn BufMut) {
        let mut payload = Vec::new();
        for item in self {
            item.encode(&mut payload);
        }
        encode_list_payload(buf, &payload);
    }
}

impl<T: RLPEncode> RLPEncode for Option<T> {
    fn encode(&self, buf: &mut dyn BufMut) {
        match self {
            Some(value) => value.encode(buf),
            None => buf.put_u8(crate::constants::RLP_NULL),
        }
    }
}

impl<T: RLPEncode + ?Sized> RLPEncode for &T {
    fn encode(&self, buf: &mut dyn BufMut) {
        (**self).encode(buf);
    }
}
