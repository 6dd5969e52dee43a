use crate::error::RLPDecodeError;

/// Decodes the outer RLP item header, returning `(is_list, payload,
/// remainder)`. `payload` is the item's content bytes (without the
/// length prefix); `remainder` is whatever trails the item in `rlp`.
pub fn decode_rlp_item(rlp: &[u8]) -> Result<(bool, &[u8], &[u8]), RLPDecodeError> {
    let first = *rlp.first().ok_or(RLPDecodeError::InvalidLength)?;
    match first {
        0x00..=0x7f => Ok((false, &rlp[..1], &rlp[1..])),
        0x80..=0xb7 => {
            let len = (first - 0x80) as usize;
            let (payload, rest) = split_at_checked(&rlp[1..], len)?;
            Ok((false, payload, rest))
        }
        0xb8..=0xbf => {
            let len_of_len = (first - 0xb7) as usize;
            let (len_bytes, rest) = split_at_checked(&rlp[1..], len_of_len)?;
            let len = be_bytes_to_usize(len_bytes)?;
            let (payload, rest) = split_at_checked(rest, len)?;
            Ok((false, payload, rest))
        }
        0xc0..=0xf7 => {
            let len = (first - 0xc0) as usize;
            let (payload, rest) = split_at_checked(&rlp[1..], len)?;
            Ok((true, payload, rest))
        }
        0xf8..=0xff => {
            let len_of_len = (first - 0xf7) as usize;
            let (len_bytes, rest) = split_at_checked(&rlp[1..], len_of_len)?;
            let len = be_bytes_to_usize(len_bytes)?;
            let (payload, rest) = split_at_checked(rest, len)?;
            Ok((true, payload, rest))
        }
    }
}

fn split_at_checked(bytes: &[u8], at: usize) -> Result<(&[u8], &[u8]), RLPDecodeError> {
    if at > bytes.len() {
        return Err(RLPDecodeError::InvalidLength);
    }
    Ok(bytes.split_at(at))
}

fn be_bytes_to_usize(bytes: &[u8]) -> Result<usize, RLPDecodeError> {
    if bytes.len() > 8 {
        return Err(RLPDecodeError::MalformedLength);
    }
    let mut buf = [0u8; 8];
    buf[8 - bytes.len()..].copy_from_slice(bytes);
    Ok(u64::from_be_bytes(buf) as usize)
}

pub trait RLPDecode: Sized {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError>;

    fn decode(rlp: &[u8]) -> Result<Self, RLPDecodeError> {
        let (value, rest) = Self::decode_unfinished(rlp)?;
        if !rest.is_empty() {
            return Err(RLPDecodeError::TrailingBytes("decode"));
        }
        Ok(value)
    }
}

impl RLPDecode for u8 {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (is_list, payload, rest) = decode_rlp_item(rlp)?;
        if is_list {
            return Err(RLPDecodeError::ExpectedString);
        }
        match payload.len() {
            0 => Ok((0, rest)),
            1 => Ok((payload[0], rest)),
            _ => Err(RLPDecodeError::InvalidLength),
        }
    }
}

macro_rules! impl_rlp_decode_uint {
    ($ty:ty) => {
        impl RLPDecode for $ty {
            fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
                let (is_list, payload, rest) = decode_rlp_item(rlp)?;
                if is_list {
                    return Err(RLPDecodeError::ExpectedString);
                }
                if payload.len() > std::mem::size_of::<$ty>() {
                    return Err(RLPDecodeError::InvalidLength);
                }
                let mut buf = [0u8; std::mem::size_of::<$ty>()];
                let offset = buf.len() - payload.len();
                buf[offset..].copy_from_slice(payload);
                Ok((<$ty>::from_be_bytes(buf), rest))
            }
        }
    };
}

impl_rlp_decode_uint!(u16);
impl_rlp_decode_uint!(u32);
impl_rlp_decode_uint!(u64);
impl_rlp_decode_uint!(u128);

impl RLPDecode for bool {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (value, rest) = u8::decode_unfinished(rlp)?;
        Ok((value != 0, rest))
    }
}

impl RLPDecode for Vec<u8> {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (is_list, payload, rest) = decode_rlp_item(rlp)?;
        if is_list {
            return Err(RLPDecodeError::ExpectedString);
        }
        Ok((payload.to_vec(), rest))
    }
}

impl<const N: usize> RLPDecode for [u8; N] {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (is_list, payload, rest) = decode_rlp_item(rlp)?;
        if is_list {
            return Err(RLPDecodeError::ExpectedString);
        }
        if payload.len() != N {
            return Err(RLPDecodeError::InvalidLength);
        }
        let mut out = [0u8; N];
        out.copy_from_slice(payload);
        Ok((out, rest))
    }
}

impl<T: RLPDecode> RLPDecode for Vec<T> {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (is_list, payload, rest) = decode_rlp_item(rlp)?;
        if !is_list {
            return Err(RLPDecodeError::ExpectedList);
        }
        let mut items = Vec::new();
        let mut cursor = payload;
        while !cursor.is_empty() {
            let (item, remainder) = T::decode_unfinished(cursor)?;
            items.push(item);
            cursor = remainder;
        }
        Ok((items, rest))
    }
}

impl<T: RLPDecode> RLPDecode for Option<T> {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        if rlp.first() == Some(&crate::constants::RLP_NULL) {
            return Ok((None, &rlp[1..]));
        }
        let (value, rest) = T::decode_unfinished(rlp)?;
        Ok((Some(value), rest))
    }
}
