//! `addmod`/`mulmod` host primitives (`spec.md` §6), mirroring the
//! teacher's `op_addmod`/`op_mulmod` semantics (modulus-zero yields
//! zero rather than a revert) but over this crate's 256-bit integer
//! rather than a 512-bit scratch type, via a binary long-division
//! reduction.

use gtos_common::U256;

/// `(a + b) mod m`; returns zero when `m` is zero.
pub fn addmod(a: U256, b: U256, m: U256) -> U256 {
    if m == U256::ZERO {
        return U256::ZERO;
    }
    let a_be = a.to_big_endian();
    let b_be = b.to_big_endian();

    let mut wide = [0u8; 33];
    let mut carry = 0u16;
    for i in (0..32).rev() {
        let sum = a_be[i] as u16 + b_be[i] as u16 + carry;
        wide[i + 1] = sum as u8;
        carry = sum >> 8;
    }
    wide[0] = carry as u8;

    U256::from_big_endian(&reduce_wide(&wide, &m.to_big_endian()))
}

/// `(a * b) mod m`; returns zero when `m`, `a` or `b` is zero.
pub fn mulmod(a: U256, b: U256, m: U256) -> U256 {
    if m == U256::ZERO || a == U256::ZERO || b == U256::ZERO {
        return U256::ZERO;
    }
    let a_be = a.to_big_endian();
    let b_be = b.to_big_endian();

    let mut wide = [0u8; 64];
    for (i, &a_byte) in a_be.iter().enumerate().rev() {
        let mut carry = 0u32;
        for (j, &b_byte) in b_be.iter().enumerate().rev() {
            let idx = i + j + 1;
            let product = a_byte as u32 * b_byte as u32 + wide[idx] as u32 + carry;
            wide[idx] = product as u8;
            carry = product >> 8;
        }
        let mut k = i;
        while carry > 0 {
            let sum = wide[k] as u32 + carry;
            wide[k] = sum as u8;
            carry = sum >> 8;
            if k == 0 {
                break;
            }
            k -= 1;
        }
    }

    U256::from_big_endian(&reduce_wide(&wide, &m.to_big_endian()))
}

/// Binary long division: reduces a big-endian byte string of any width
/// modulo a 32-byte modulus, processing one bit at a time.
fn reduce_wide(value: &[u8], modulus: &[u8; 32]) -> [u8; 32] {
    let mut remainder = [0u8; 32];
    for &byte in value {
        for bit in (0..8).rev() {
            let carry = (byte >> bit) & 1;
            shift_left_one_with_carry(&mut remainder, carry);
            if ge(&remainder, modulus) {
                sub_in_place(&mut remainder, modulus);
            }
        }
    }
    remainder
}

fn shift_left_one_with_carry(value: &mut [u8; 32], carry_in: u8) {
    let mut carry = carry_in;
    for byte in value.iter_mut().rev() {
        let new_carry = *byte >> 7;
        *byte = (*byte << 1) | carry;
        carry = new_carry;
    }
}

fn ge(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a >= b
}

fn sub_in_place(a: &mut [u8; 32], b: &[u8; 32]) {
    let mut borrow = 0i16;
    for i in (0..32).rev() {
        let diff = a[i] as i16 - b[i] as i16 - borrow;
        if diff < 0 {
            a[i] = (diff + 256) as u8;
            borrow = 1;
        } else {
            a[i] = diff as u8;
            borrow = 0;
        }
    }
}
