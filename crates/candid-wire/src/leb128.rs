//! LEB128 variable-length integers.
//!
//! Seven payload bits per byte, least significant group first, high bit set
//! on every byte but the last. Signed values sign-extend from bit 6 of the
//! last byte. Fixed-width readers cap the byte count at 5 (32-bit) or
//! 9 (64-bit); the big-integer readers are bounded only by the input.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, ToPrimitive, Zero};

use crate::error::{Error, Result};
use crate::reader::Reader;

const MAX_BYTES_32: usize = 5;
const MAX_BYTES_64: usize = 9;

fn read_unsigned_capped(r: &mut Reader<'_>, max_bytes: usize) -> Result<u64> {
    let start = r.offset();
    let mut result: u64 = 0;
    for i in 0..max_bytes {
        let byte = r.read_u8()?;
        result |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(result);
        }
    }
    Err(Error::VarintOverflow { offset: start })
}

fn read_signed_capped(r: &mut Reader<'_>, max_bytes: usize) -> Result<i64> {
    let start = r.offset();
    let mut result: i64 = 0;
    let mut shift = 0;
    for _ in 0..max_bytes {
        let byte = r.read_u8()?;
        result |= i64::from(byte & 0x7f) << shift;
        shift += 7;
        if byte & 0x80 == 0 {
            if shift < 64 && byte & 0x40 != 0 {
                result |= -1i64 << shift;
            }
            return Ok(result);
        }
    }
    Err(Error::VarintOverflow { offset: start })
}

pub fn read_u32(r: &mut Reader<'_>) -> Result<u32> {
    let start = r.offset();
    let value = read_unsigned_capped(r, MAX_BYTES_32)?;
    u32::try_from(value).map_err(|_| Error::VarintOverflow { offset: start })
}

pub fn read_u64(r: &mut Reader<'_>) -> Result<u64> {
    read_unsigned_capped(r, MAX_BYTES_64)
}

pub fn read_i32(r: &mut Reader<'_>) -> Result<i32> {
    let start = r.offset();
    let value = read_signed_capped(r, MAX_BYTES_32)?;
    i32::try_from(value).map_err(|_| Error::VarintOverflow { offset: start })
}

pub fn read_i64(r: &mut Reader<'_>) -> Result<i64> {
    read_signed_capped(r, MAX_BYTES_64)
}

/// Length or count prefix.
pub fn read_len(r: &mut Reader<'_>) -> Result<usize> {
    let start = r.offset();
    let value = read_u64(r)?;
    usize::try_from(value).map_err(|_| Error::VarintOverflow { offset: start })
}

/// Raw 7-bit groups, least significant first.
fn read_groups(r: &mut Reader<'_>) -> Result<Vec<u8>> {
    let mut groups = Vec::new();
    loop {
        let byte = r.read_u8()?;
        groups.push(byte & 0x7f);
        if byte & 0x80 == 0 {
            return Ok(groups);
        }
    }
}

fn groups_to_biguint(groups: &[u8]) -> BigUint {
    groups
        .iter()
        .rev()
        .fold(BigUint::zero(), |acc, &g| (acc << 7u32) | BigUint::from(g))
}

pub fn read_nat(r: &mut Reader<'_>) -> Result<BigUint> {
    let groups = read_groups(r)?;
    Ok(groups_to_biguint(&groups))
}

pub fn read_int(r: &mut Reader<'_>) -> Result<BigInt> {
    let groups = read_groups(r)?;
    let unsigned = BigInt::from(groups_to_biguint(&groups));
    let negative = groups.last().is_some_and(|g| g & 0x40 != 0);
    if negative {
        Ok(unsigned - (BigInt::one() << (7 * groups.len())))
    } else {
        Ok(unsigned)
    }
}

pub fn write_unsigned(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

pub fn write_signed(out: &mut Vec<u8>, mut value: i64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        let done = (value == 0 && byte & 0x40 == 0) || (value == -1 && byte & 0x40 != 0);
        if done {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Minimal 7-bit groups of `n`, least significant first. Zero is one group.
fn biguint_groups(n: &BigUint) -> Vec<u8> {
    let mut groups = Vec::new();
    let mut acc: u32 = 0;
    let mut bits = 0u32;
    for byte in n.to_bytes_le() {
        acc |= u32::from(byte) << bits;
        bits += 8;
        while bits >= 7 {
            groups.push((acc & 0x7f) as u8);
            acc >>= 7;
            bits -= 7;
        }
    }
    if bits > 0 {
        groups.push((acc & 0x7f) as u8);
    }
    while groups.len() > 1 && groups.last() == Some(&0) {
        groups.pop();
    }
    groups
}

fn push_groups(out: &mut Vec<u8>, groups: &[u8]) {
    let last = groups.len().saturating_sub(1);
    for (i, &g) in groups.iter().enumerate() {
        out.push(if i < last { g | 0x80 } else { g });
    }
}

pub fn write_nat(out: &mut Vec<u8>, n: &BigUint) {
    match n.to_u64() {
        Some(small) => write_unsigned(out, small),
        None => push_groups(out, &biguint_groups(n)),
    }
}

pub fn write_int(out: &mut Vec<u8>, n: &BigInt) {
    if let Some(small) = n.to_i64() {
        return write_signed(out, small);
    }
    let magnitude = n.magnitude();
    let groups = if n.sign() == Sign::Minus {
        // k groups hold [-2^(7k-1), 2^(7k-1)); emit 2^(7k) - |n| in k groups.
        let bits = (magnitude - BigUint::one()).bits() as usize;
        let count = (bits + 1).div_ceil(7);
        let complement = (BigUint::one() << (7 * count)) - magnitude;
        let mut groups = biguint_groups(&complement);
        groups.resize(count, 0);
        groups
    } else {
        let mut groups = biguint_groups(magnitude);
        if groups.last().is_some_and(|g| g & 0x40 != 0) {
            groups.push(0);
        }
        groups
    };
    push_groups(out, &groups);
}
