// In-memory input over a borrowed byte slice.

use super::DataInput;
use crate::error::{Result, StoreError};

/// Decoder over a contiguous byte slice with big-endian typed reads.
///
/// Unlike [`StoreInput`](super::StoreInput) it only moves the cursor on
/// success, and it exposes its backing buffer.
#[derive(Debug, Clone, Copy)]
pub struct SliceInput<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> SliceInput<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn at(buf: &'a [u8], pos: usize) -> Self {
        Self { buf, pos }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let (buf, pos) = (self.buf, self.pos);
        let bytes = pos
            .checked_add(N)
            .and_then(|end| buf.get(pos..end))
            .ok_or(StoreError::OutOfBounds {
                offset: self.pos as u64,
                len: N,
                size: self.buf.len() as u64,
            })?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        self.pos += N;
        Ok(out)
    }
}

impl DataInput for SliceInput<'_> {
    fn pos(&self) -> u32 {
        self.pos as u32
    }

    fn set_pos(&mut self, pos: u32) {
        self.pos = pos as usize;
    }

    fn read_fully(&mut self, dest: &mut [u8]) -> Result<()> {
        let (buf, pos) = (self.buf, self.pos);
        let src = pos
            .checked_add(dest.len())
            .and_then(|end| buf.get(pos..end))
            .ok_or(StoreError::OutOfBounds {
                offset: self.pos as u64,
                len: dest.len(),
                size: self.buf.len() as u64,
            })?;
        dest.copy_from_slice(src);
        self.pos += dest.len();
        Ok(())
    }

    fn skip_bytes(&mut self, n: usize) -> usize {
        self.pos = self.pos.wrapping_add(n);
        n
    }

    #[inline]
    fn read_unsigned_byte(&mut self) -> Result<u8> {
        Ok(self.take::<1>()?[0])
    }

    fn read_short(&mut self) -> Result<i16> {
        Ok(i16::from_be_bytes(self.take()?))
    }

    fn read_int(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.take()?))
    }

    fn read_long(&mut self) -> Result<i64> {
        Ok(i64::from_be_bytes(self.take()?))
    }

    fn read_float(&mut self) -> Result<f32> {
        Ok(f32::from_be_bytes(self.take()?))
    }

    fn read_double(&mut self) -> Result<f64> {
        Ok(f64::from_be_bytes(self.take()?))
    }

    fn internal_byte_array(&self) -> Option<&[u8]> {
        Some(self.buf)
    }

    fn internal_byte_buffer(&self) -> Option<&[u8]> {
        Some(self.buf.get(self.pos..).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::varint;

    #[test]
    fn exposes_backing_buffer() {
        let data = [1u8, 2, 3, 4];
        let mut input = SliceInput::new(&data);
        input.skip_bytes(1);
        assert_eq!(input.internal_byte_array(), Some(&data[..]));
        assert_eq!(input.internal_byte_buffer(), Some(&data[1..]));
        input.skip_bytes(10);
        assert_eq!(input.internal_byte_buffer(), Some(&[][..]));
    }

    #[test]
    fn failed_read_keeps_cursor() {
        let data = [0u8; 3];
        let mut input = SliceInput::at(&data, 1);
        assert!(input.read_int().is_err());
        assert_eq!(input.pos(), 1);
        let mut dest = [0u8; 4];
        assert!(input.read_fully(&mut dest).is_err());
        assert_eq!(input.remaining(), 2);
    }

    #[test]
    fn shares_varint_and_delta_decoding() {
        let mut bytes = Vec::new();
        varint::write_delta_array(&mut bytes, &[10, 10, 500, 100_000]).unwrap();
        let mut input = SliceInput::new(&bytes);
        assert_eq!(
            input.unpack_long_array_delta_compression(4).unwrap(),
            vec![10, 10, 500, 100_000]
        );
        assert_eq!(input.remaining(), 0);
    }

    #[test]
    fn typed_reads_are_big_endian() {
        let data = [0x01, 0x02, 0x01, 0x02];
        let mut input = SliceInput::new(&data);
        assert_eq!(input.read_short().unwrap(), 0x0102);
        assert_eq!(input.read_char().unwrap(), 0x0102);
    }
}
