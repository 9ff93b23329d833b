// Variable-length integer layout read by the inputs.
//
// Base-128, big-endian: most-significant group first.
// Each byte has bit 7 set except the final byte.
//
// Decoding proper lives on `DataInput`; this module holds the bit-level
// step shared by every decoder, plus a small encoder used to build
// fixtures and test data.

use std::io::{self, Write};

/// Maximum encoded length for a 64-bit value (ceil(64/7) = 10).
pub const MAX_VARINT_LEN: usize = 10;

/// Set on every byte of an encoded value except the last.
pub const CONTINUATION_BIT: u8 = 0x80;

// ---------------------------------------------------------------------------
// Decoding step
// ---------------------------------------------------------------------------

/// Shift one 7-bit group into a 64-bit accumulator.
///
/// Bits shifted past the top are discarded; no overflow is reported.
#[inline(always)]
pub fn push_u64(acc: u64, byte: u8) -> u64 {
    (acc << 7) | u64::from(byte & 0x7F)
}

/// 32-bit variant of [`push_u64`].
#[inline(always)]
pub fn push_u32(acc: u32, byte: u8) -> u32 {
    (acc << 7) | u32::from(byte & 0x7F)
}

/// True if `byte` terminates an encoded value.
#[inline(always)]
pub fn is_last(byte: u8) -> bool {
    byte & CONTINUATION_BIT == 0
}

/// Decode a `u64` from the front of `data`.
/// Returns `(value, bytes_consumed)`, or `None` if `data` ends before a
/// terminating byte.
pub fn read_u64(data: &[u8]) -> Option<(u64, usize)> {
    let mut val: u64 = 0;
    for (i, &byte) in data.iter().enumerate() {
        val = push_u64(val, byte);
        if is_last(byte) {
            return Some((val, i + 1));
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Encoding (fixtures)
// ---------------------------------------------------------------------------

/// Encode a `u64` into `buf`, right-aligned.
/// Returns the number of bytes written (1..=10); the encoding is
/// `buf[MAX_VARINT_LEN - len..]`.
#[inline]
pub fn encode_u64(mut num: u64, buf: &mut [u8; MAX_VARINT_LEN]) -> usize {
    let mut i = MAX_VARINT_LEN;
    loop {
        i -= 1;
        buf[i] = (num as u8 & 0x7F) | CONTINUATION_BIT;
        num >>= 7;
        if num == 0 {
            break;
        }
    }
    buf[MAX_VARINT_LEN - 1] &= 0x7F; // clear MSB on last byte
    MAX_VARINT_LEN - i
}

/// Encode a `u64` and write to a `Write` sink.
pub fn write_u64<W: Write>(w: &mut W, num: u64) -> io::Result<()> {
    let mut buf = [0u8; MAX_VARINT_LEN];
    let len = encode_u64(num, &mut buf);
    w.write_all(&buf[MAX_VARINT_LEN - len..])
}

/// Encode a `u32` and write to a `Write` sink.
pub fn write_u32<W: Write>(w: &mut W, num: u32) -> io::Result<()> {
    write_u64(w, u64::from(num))
}

/// Encode `values` as successive differences, each written as a varint.
///
/// Inverse of delta-compressed array decoding; `values` is expected to be
/// non-decreasing (differences wrap otherwise).
pub fn write_delta_array<W: Write>(w: &mut W, values: &[u64]) -> io::Result<()> {
    let mut prev = 0u64;
    for &v in values {
        write_u64(w, v.wrapping_sub(prev))?;
        prev = v;
    }
    Ok(())
}

/// Encode a single value into a fresh `Vec`.
pub fn to_vec(num: u64) -> Vec<u8> {
    let mut buf = [0u8; MAX_VARINT_LEN];
    let len = encode_u64(num, &mut buf);
    buf[MAX_VARINT_LEN - len..].to_vec()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Return the encoded byte-length of a `u64` value.
#[inline]
pub fn sizeof_u64(num: u64) -> usize {
    let bits = 64 - num.leading_zeros();
    (bits.max(1).div_ceil(7) as usize).min(MAX_VARINT_LEN)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
