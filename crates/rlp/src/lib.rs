//! Canonical self-describing encoding (RLP) for the execution core's
//! on-wire transaction shapes (`spec.md` §6).

pub mod constants;
pub mod decode;
pub mod encode;
pub mod error;
pub mod structs;

pub use decode::{RLPDecode, decode_rlp_item};
pub use encode::{PayloadRLPEncode, RLPEncode};
pub use error::RLPDecodeError;
pub use structs::{Decoder, Encoder};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_u64_short_and_long() {
        for value in [0u64, 1, 127, 128, 255, 1_000_000, u64::MAX] {
            let encoded = value.encode_to_vec();
            let decoded = u64::decode(&encoded).expect("decodes");
            assert_eq!(decoded, value);
        }
    }

    #[test]
    fn roundtrip_bytes_short_and_long() {
        let short = vec![1u8, 2, 3];
        let long = vec![7u8; 200];
        for data in [short, long] {
            let encoded = data.encode_to_vec();
            let decoded = Vec::<u8>::decode(&encoded).expect("decodes");
            assert_eq!(decoded, data);
        }
    }

    #[test]
    fn struct_builder_roundtrip() {
        struct Pair {
            a: u64,
            b: Vec<u8>,
        }

        impl RLPEncode for Pair {
            fn encode(&self, buf: &mut dyn bytes::BufMut) {
                Encoder::new(buf)
                    .encode_field(&self.a)
                    .encode_field(&self.b)
                    .finish();
            }
        }

        impl RLPDecode for Pair {
            fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
                let decoder = Decoder::new(rlp)?;
                let (a, decoder) = decoder.decode_field("a")?;
                let (b, decoder) = decoder.decode_field("b")?;
                Ok((Pair { a, b }, decoder.finish()?))
            }
        }

        let pair = Pair { a: 42, b: vec![9, 9, 9] };
        let encoded = pair.encode_to_vec();
        let decoded = Pair::decode(&encoded).expect("decodes");
        assert_eq!(decoded.a, 42);
        assert_eq!(decoded.b, vec![9, 9, 9]);
    }

    #[test]
    fn list_of_lists_roundtrip() {
        let nested: Vec<Vec<u8>> = vec![vec![1, 2], vec![3, 4, 5]];
        let encoded = nested.encode_to_vec();
        let decoded = Vec::<Vec<u8>>::decode(&encoded).expect("decodes");
        assert_eq!(decoded, nested);
    }
}
