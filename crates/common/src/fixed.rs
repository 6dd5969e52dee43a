//! Fixed-width 32-byte containers shared across the execution core.
//!
//! Addresses, storage slots, storage words and digests are all 32 bytes
//! wide in this chain's data model (`spec.md` §3), unlike the 20-byte
//! addresses / 32-byte words split used by Ethereum. We keep them as
//! distinct newtypes over the same underlying `[u8; 32]` so the type
//! system catches accidental mixing (e.g. passing a digest where an
//! address is expected).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! fixed_bytes32 {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(pub [u8; 32]);

        impl $name {
            pub const ZERO: Self = Self([0u8; 32]);

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn from_slice(bytes: &[u8]) -> Option<Self> {
                if bytes.len() != 32 {
                    return None;
                }
                let mut out = [0u8; 32];
                out.copy_from_slice(bytes);
                Some(Self(out))
            }

            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; 32]
            }
        }

        impl From<[u8; 32]> for $name {
            fn from(value: [u8; 32]) -> Self {
                Self(value)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}(0x{})", stringify!($name), hex::encode(self.0))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl FromStr for $name {
            type Err = hex::FromHexError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let stripped = s.strip_prefix("0x").unwrap_or(s);
                let mut out = [0u8; 32];
                hex::decode_to_slice(stripped, &mut out)?;
                Ok(Self(out))
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

fixed_bytes32!(Address, "A 32-byte account address.");
fixed_bytes32!(Digest, "A 32-byte keccak-256 digest.");
fixed_bytes32!(StorageSlot, "A 32-byte storage slot key.");
fixed_bytes32!(StorageWord, "A 32-byte storage word value.");

impl From<Digest> for Address {
    /// Truncating conversion used by address-derivation routines that
    /// hash a public key and reinterpret the digest directly as the
    /// address (§4.A: "keccak(...) truncated/hashed to 32 B").
    fn from(value: Digest) -> Self {
        Address(value.0)
    }
}

impl From<Digest> for StorageSlot {
    fn from(value: Digest) -> Self {
        StorageSlot(value.0)
    }
}

/// 256-bit unsigned integer, stored big-endian, used for balances and
/// values. A minimal implementation sufficient for this core's
/// arithmetic (add/sub/mul/div with saturation and overflow detection) —
/// full-width modular arithmetic is delegated to `gtos-crypto` where
/// the spec requires it (`addmod`/`mulmod`).
///
/// `self.0[0]` is the least-significant limb (see `to_big_endian`), so
/// `Ord` is implemented by hand rather than derived — a derived,
/// index-order `Ord` would compare the least-significant limb first.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct U256(pub [u64; 4]);

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        for i in (0..4).rev() {
            match self.0[i].cmp(&other.0[i]) {
                std::cmp::Ordering::Equal => continue,
                ord => return ord,
            }
        }
        std::cmp::Ordering::Equal
    }
}

impl U256 {
    pub const ZERO: Self = Self([0, 0, 0, 0]);

    pub fn from_u64(value: u64) -> Self {
        Self([value, 0, 0, 0])
    }

    pub fn as_u64(&self) -> u64 {
        self.0[0]
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        let mut out = [0u64; 4];
        let mut carry = 0u128;
        for i in 0..4 {
            let sum = self.0[i] as u128 + rhs.0[i] as u128 + carry;
            out[i] = sum as u64;
            carry = sum >> 64;
        }
        if carry != 0 { None } else { Some(Self(out)) }
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        if self < rhs {
            return None;
        }
        let mut out = [0u64; 4];
        let mut borrow = 0i128;
        for i in 0..4 {
            let diff = self.0[i] as i128 - rhs.0[i] as i128 - borrow;
            if diff < 0 {
                out[i] = (diff + (1i128 << 64)) as u64;
                borrow = 1;
            } else {
                out[i] = diff as u64;
                borrow = 0;
            }
        }
        Some(Self(out))
    }

    pub fn saturating_add(self, rhs: Self) -> Self {
        self.checked_add(rhs).unwrap_or(Self([u64::MAX; 4]))
    }

    pub fn saturating_sub(self, rhs: Self) -> Self {
        self.checked_sub(rhs).unwrap_or(Self::ZERO)
    }

    /// Saturating multiplication by a `u64` scalar (sufficient for
    /// `gas * price`-shaped products in this core).
    pub fn saturating_mul_u64(self, rhs: u64) -> Self {
        let mut out = [0u64; 4];
        let mut carry = 0u128;
        for i in 0..4 {
            let product = self.0[i] as u128 * rhs as u128 + carry;
            out[i] = product as u64;
            carry = product >> 64;
        }
        if carry != 0 {
            Self([u64::MAX; 4])
        } else {
            Self(out)
        }
    }

    /// Full 256-bit schoolbook multiplication; `None` if the product
    /// overflows 256 bits.
    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        let mut out = [0u64; 8];
        for i in 0..4 {
            if self.0[i] == 0 {
                continue;
            }
            let mut carry = 0u128;
            for j in 0..4 {
                let product = self.0[i] as u128 * rhs.0[j] as u128 + out[i + j] as u128 + carry;
                out[i + j] = product as u64;
                carry = product >> 64;
            }
            let mut k = i + 4;
            while carry != 0 {
                let sum = out[k] as u128 + carry;
                out[k] = sum as u64;
                carry = sum >> 64;
                k += 1;
            }
        }
        if out[4..8].iter().any(|&limb| limb != 0) {
            None
        } else {
            Some(Self([out[0], out[1], out[2], out[3]]))
        }
    }

    pub fn saturating_mul(self, rhs: Self) -> Self {
        self.checked_mul(rhs).unwrap_or(Self([u64::MAX; 4]))
    }

    /// Full-width unsigned division via binary long division: `rhs ==
    /// ZERO` and any overflow are impossible here (the quotient of two
    /// 256-bit values always fits in 256 bits), so `None` only signals
    /// division by zero.
    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        if rhs == Self::ZERO {
            return None;
        }
        let mut quotient = Self::ZERO;
        let mut remainder = Self::ZERO;
        for i in (0..256).rev() {
            remainder = remainder.shl1();
            if self.bit(i) {
                remainder.0[0] |= 1;
            }
            if remainder >= rhs {
                remainder = remainder.saturating_sub(rhs);
                quotient.set_bit(i);
            }
        }
        Some(quotient)
    }

    fn bit(&self, i: usize) -> bool {
        (self.0[i / 64] >> (i % 64)) & 1 == 1
    }

    fn set_bit(&mut self, i: usize) {
        self.0[i / 64] |= 1 << (i % 64);
    }

    fn shl1(&self) -> Self {
        let mut out = [0u64; 4];
        let mut carry = 0u64;
        for i in 0..4 {
            let next_carry = self.0[i] >> 63;
            out[i] = (self.0[i] << 1) | carry;
            carry = next_carry;
        }
        Self(out)
    }

    pub fn to_big_endian(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (i, limb) in self.0.iter().rev().enumerate() {
            out[i * 8..i * 8 + 8].copy_from_slice(&limb.to_be_bytes());
        }
        out
    }

    pub fn from_big_endian(bytes: &[u8; 32]) -> Self {
        let mut limbs = [0u64; 4];
        for (i, limb) in limbs.iter_mut().rev().enumerate() {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(&bytes[i * 8..i * 8 + 8]);
            *limb = u64::from_be_bytes(buf);
        }
        Self(limbs)
    }
}

impl fmt::Debug for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_big_endian()))
    }
}

impl From<u64> for U256 {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_hex_roundtrip() {
        let addr = Address([7u8; 32]);
        let s = addr.to_string();
        let parsed: Address = s.parse().expect("valid hex");
        assert_eq!(addr, parsed);
    }

    #[test]
    fn u256_saturating_sub_floors_at_zero() {
        let a = U256::from_u64(5);
        let b = U256::from_u64(10);
        assert_eq!(a.saturating_sub(b), U256::ZERO);
    }

    #[test]
    fn u256_big_endian_roundtrip() {
        let value = U256::from_u64(0x1234_5678_9abc_def0);
        let bytes = value.to_big_endian();
        assert_eq!(U256::from_big_endian(&bytes), value);
    }

    #[test]
    fn u256_checked_add_overflow() {
        let max = U256([u64::MAX; 4]);
        assert_eq!(max.checked_add(U256::from_u64(1)), None);
    }

    #[test]
    fn u256_ord_weighs_the_most_significant_limb_first() {
        let mut big = [0u8; 32];
        big[0] = 0x01; // ~2^248, lives entirely in the high limb
        let big = U256::from_big_endian(&big);
        let small = U256::from_u64(5);
        assert!(big > small);
        assert!(small < big);
    }

    #[test]
    fn u256_checked_mul_full_width() {
        assert_eq!(U256::from_u64(1).saturating_mul(U256::ZERO), U256::ZERO);

        // 2^192 * 2 = 2^193, representable, exercises carry past limb 3.
        let mut two_pow_192_bytes = [0u8; 32];
        two_pow_192_bytes[7] = 1;
        let two_pow_192 = U256::from_big_endian(&two_pow_192_bytes);

        let mut expected_bytes = [0u8; 32];
        expected_bytes[7] = 2;
        let expected = U256::from_big_endian(&expected_bytes);

        assert_eq!(two_pow_192.checked_mul(U256::from_u64(2)), Some(expected));
    }

    #[test]
    fn u256_checked_mul_overflow_is_none() {
        let max = U256([u64::MAX; 4]);
        assert_eq!(max.checked_mul(U256::from_u64(2)), None);
    }

    #[test]
    fn u256_checked_div_matches_u64_division_in_range() {
        let a = U256::from_u64(100);
        let b = U256::from_u64(7);
        assert_eq!(a.checked_div(b), Some(U256::from_u64(100 / 7)));
    }

    #[test]
    fn u256_checked_div_by_zero_is_none() {
        let a = U256::from_u64(100);
        assert_eq!(a.checked_div(U256::ZERO), None);
    }

    #[test]
    fn u256_checked_div_above_u64_range_does_not_truncate() {
        // A value living entirely above 2^64 divided by 2 must not
        // collapse to zero the way a `.as_u64() / rhs.as_u64()`
        // shortcut would.
        let mut bytes = [0u8; 32];
        bytes[0] = 0x01; // ~2^248
        let big = U256::from_big_endian(&bytes);
        let half = big.checked_div(U256::from_u64(2)).expect("nonzero divisor");
        assert!(half > U256::from_u64(0));
        assert_eq!(half.checked_mul(U256::from_u64(2)), Some(big));
    }
}
