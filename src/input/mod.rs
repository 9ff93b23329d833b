// Sequential decoding inputs.
//
// `DataInput` is the read protocol shared by every input: a cursor plus
// fixed-width, varint and delta-array decoders that advance it. The bit
// loops are written once here in terms of `read_unsigned_byte`.
//
// - `store`: `StoreInput`, reads through a `Store` at an absolute cursor
// - `slice`: `SliceInput`, reads an in-memory byte slice

use log::trace;

use crate::error::{Result, StoreError};
use crate::varint;

pub mod slice;
pub mod store;

pub use slice::SliceInput;
pub use store::StoreInput;

/// Upper bound on up-front allocation for caller-sized arrays.
const MAX_PREALLOC: usize = 4096;

/// Cursor-advancing decoder.
///
/// Not safe for concurrent use: every method reads and writes the cursor.
/// Decoded values are plain return values; the cursor is the only state.
pub trait DataInput {
    /// Cursor as a 32-bit position. Wider cursors are truncated.
    fn pos(&self) -> u32;

    /// Move the cursor. No validation is performed.
    fn set_pos(&mut self, pos: u32);

    /// Fill `dest` with the next `dest.len()` bytes.
    fn read_fully(&mut self, dest: &mut [u8]) -> Result<()>;

    /// Advance the cursor by `n` bytes without reading. Returns `n`.
    fn skip_bytes(&mut self, n: usize) -> usize;

    /// Read one byte, advancing by 1.
    fn read_unsigned_byte(&mut self) -> Result<u8>;

    fn read_short(&mut self) -> Result<i16>;
    fn read_int(&mut self) -> Result<i32>;
    fn read_long(&mut self) -> Result<i64>;
    fn read_float(&mut self) -> Result<f32>;
    fn read_double(&mut self) -> Result<f64>;

    /// True iff the next byte is exactly `1`.
    fn read_boolean(&mut self) -> Result<bool> {
        Ok(self.read_unsigned_byte()? == 1)
    }

    fn read_byte(&mut self) -> Result<i8> {
        Ok(self.read_unsigned_byte()? as i8)
    }

    /// Two bytes composed big-endian, independent of any typed-getter order.
    fn read_char(&mut self) -> Result<u16> {
        let hi = self.read_unsigned_byte()?;
        let lo = self.read_unsigned_byte()?;
        Ok((u16::from(hi) << 8) | u16::from(lo))
    }

    /// Decode one varint.
    ///
    /// Unbounded: a stream without a terminating byte is consumed until the
    /// underlying source fails.
    fn unpack_long(&mut self) -> Result<u64> {
        let mut result = 0u64;
        loop {
            let v = self.read_unsigned_byte()?;
            result = varint::push_u64(result, v);
            if varint::is_last(v) {
                return Ok(result);
            }
        }
    }

    /// Decode one varint into a 32-bit accumulator.
    fn unpack_int(&mut self) -> Result<u32> {
        let mut result = 0u32;
        loop {
            let v = self.read_unsigned_byte()?;
            result = varint::push_u32(result, v);
            if varint::is_last(v) {
                return Ok(result);
            }
        }
    }

    /// Decode `size` varints as running deltas from 0.
    fn unpack_long_array_delta_compression(&mut self, size: usize) -> Result<Vec<u64>> {
        trace!("delta array: {size} values at pos {}", self.pos());
        // `size` comes from the caller; capacity grows with bytes actually read.
        let mut out = Vec::with_capacity(size.min(MAX_PREALLOC));
        let mut prev = 0u64;
        for _ in 0..size {
            prev = prev.wrapping_add(self.unpack_long()?);
            out.push(prev);
        }
        Ok(out)
    }

    /// Decode `end - start` raw varints into `buf[start..end]`.
    ///
    /// An empty or reversed range reads nothing. A range reaching past `buf`
    /// fails with [`StoreError::OutOfBounds`] before any byte is read.
    fn unpack_long_array(&mut self, buf: &mut [u64], start: usize, end: usize) -> Result<()> {
        if start >= end {
            return Ok(());
        }
        trace!("varint array: [{start}, {end}) at pos {}", self.pos());
        let size = buf.len() as u64;
        let slots = buf.get_mut(start..end).ok_or(StoreError::OutOfBounds {
            offset: start as u64,
            len: end - start,
            size,
        })?;
        for slot in slots {
            *slot = self.unpack_long()?;
        }
        Ok(())
    }

    /// Consume bytes until `count` of them had the continuation bit set.
    ///
    /// This counts continuation bytes, not terminators: it stops right after
    /// the `count`-th byte with bit 7 set, which is generally *inside* an
    /// encoded value and never past a run of single-byte values.
    fn unpack_long_skip(&mut self, mut count: usize) -> Result<()> {
        trace!("varint skip: {count} at pos {}", self.pos());
        while count > 0 {
            let v = self.read_unsigned_byte()?;
            count -= usize::from((v & varint::CONTINUATION_BIT) >> 7);
        }
        Ok(())
    }

    /// Backing array, when the input is a contiguous in-memory buffer.
    fn internal_byte_array(&self) -> Option<&[u8]> {
        None
    }

    /// Unread remainder of the backing buffer, when one exists.
    fn internal_byte_buffer(&self) -> Option<&[u8]> {
        None
    }

    /// Release resources. Inputs here hold none.
    fn close(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn empty_or_reversed_array_range_reads_nothing() {
        let store = MemoryStore::new(vec![0x05]);
        let mut input = StoreInput::new(&store);
        let mut buf = [0u64; 2];
        input.unpack_long_array(&mut buf, 2, 1).unwrap();
        input.unpack_long_array(&mut buf, 5, 5).unwrap();
        assert_eq!(buf, [0, 0]);
        assert_eq!(input.pos(), 0);
    }

    #[test]
    fn array_range_past_buffer_fails_before_reading() {
        let store = MemoryStore::new(vec![0x05, 0x06, 0x07]);
        let mut input = StoreInput::new(&store);
        let mut buf = [0u64; 2];
        let err = input.unpack_long_array(&mut buf, 1, 3).unwrap_err();
        assert!(matches!(
            err,
            StoreError::OutOfBounds { offset: 1, len: 2, size: 2 }
        ));
        assert_eq!(input.pos(), 0);
    }

    #[test]
    fn huge_delta_size_surfaces_store_error() {
        let store = MemoryStore::new(vec![1, 2, 3]);
        let mut input = StoreInput::new(&store);
        let err = input
            .unpack_long_array_delta_compression(1 << 61)
            .unwrap_err();
        assert!(matches!(err, StoreError::OutOfBounds { offset: 3, .. }));
        assert_eq!(input.pos(), 4);
    }
}
