// Sequential reader over a backing store.
//
// Holds an absolute cursor and reads through the store's getters at that
// cursor. Nothing is buffered; every call goes to the store.
//
// Cursor movement on failure:
//   - byte-at-a-time reads (bytes, booleans, chars, varints) advance the
//     cursor before each store call
//   - `read_fully` advances by the full length before the copy
//   - typed getters (short/int/long/float/double) advance after the call
// so a failed read may leave the cursor past the bytes actually decoded.

use super::DataInput;
use crate::error::Result;
use crate::store::Store;

/// Decoder reading from a [`Store`] at an exclusively owned cursor.
///
/// `S` is usually a reference (`&MemoryStore`, `&MmapStore`) or an `Arc`;
/// the reader never closes or mutates the store.
#[derive(Debug, Clone)]
pub struct StoreInput<S: Store> {
    store: S,
    pos: u64,
}

impl<S: Store> StoreInput<S> {
    /// Reader positioned at offset 0.
    pub fn new(store: S) -> Self {
        Self::at(store, 0)
    }

    /// Reader positioned at `offset`.
    pub fn at(store: S, offset: u64) -> Self {
        Self { store, pos: offset }
    }

    /// Full-width cursor.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.pos
    }

    #[inline]
    pub fn set_offset(&mut self, offset: u64) {
        self.pos = offset;
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Return the current cursor and advance it by `n`.
    #[inline(always)]
    fn bump(&mut self, n: u64) -> u64 {
        let at = self.pos;
        self.pos = self.pos.wrapping_add(n);
        at
    }
}

impl<S: Store> DataInput for StoreInput<S> {
    #[inline]
    fn pos(&self) -> u32 {
        self.pos as u32
    }

    #[inline]
    fn set_pos(&mut self, pos: u32) {
        self.pos = u64::from(pos);
    }

    /// Advances the cursor by `dest.len()` *before* copying; a store failure
    /// leaves the cursor past the unread region.
    fn read_fully(&mut self, dest: &mut [u8]) -> Result<()> {
        let at = self.bump(dest.len() as u64);
        self.store.get_bytes(at, dest)
    }

    fn skip_bytes(&mut self, n: usize) -> usize {
        self.bump(n as u64);
        n
    }

    #[inline]
    fn read_unsigned_byte(&mut self) -> Result<u8> {
        let at = self.bump(1);
        self.store.get_byte(at)
    }

    fn read_short(&mut self) -> Result<i16> {
        let v = self.store.get_short(self.pos)?;
        self.bump(2);
        Ok(v)
    }

    fn read_int(&mut self) -> Result<i32> {
        let v = self.store.get_int(self.pos)?;
        self.bump(4);
        Ok(v)
    }

    fn read_long(&mut self) -> Result<i64> {
        let v = self.store.get_long(self.pos)?;
        self.bump(8);
        Ok(v)
    }

    fn read_float(&mut self) -> Result<f32> {
        let v = self.store.get_float(self.pos)?;
        self.bump(4);
        Ok(v)
    }

    fn read_double(&mut self) -> Result<f64> {
        let v = self.store.get_double(self.pos)?;
        self.bump(8);
        Ok(v)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::{ByteOrder, MemoryStore, StoreOptions};
    use crate::varint;

    fn le_options() -> StoreOptions {
        StoreOptions {
            byte_order: ByteOrder::LittleEndian,
            ..Default::default()
        }
    }

    #[test]
    fn varint_decode_advances_by_encoded_len() {
        for n in [0u64, 1, 127, 128, 16383, (1 << 31) - 1, 1 << 62] {
            let bytes = varint::to_vec(n);
            let store = MemoryStore::new(bytes.clone());
            let mut input = StoreInput::new(&store);
            assert_eq!(input.unpack_long().unwrap(), n);
            assert_eq!(input.offset(), bytes.len() as u64, "advance for {n}");
        }
    }

    #[test]
    fn unpack_int_truncates_to_32_bits() {
        let store = MemoryStore::new(varint::to_vec((1 << 31) - 1));
        assert_eq!(StoreInput::new(&store).unpack_int().unwrap(), i32::MAX as u32);

        // Only the low 32 bits of the accumulator survive.
        let store = MemoryStore::new(varint::to_vec((1 << 40) | 0x1234));
        assert_eq!(StoreInput::new(&store).unpack_int().unwrap(), 0x1234);
    }

    #[test]
    fn delta_array_accumulates() {
        let mut bytes = Vec::new();
        for d in [3u64, 0, 5] {
            varint::write_u64(&mut bytes, d).unwrap();
        }
        let store = MemoryStore::new(bytes);
        let mut input = StoreInput::new(&store);
        assert_eq!(
            input.unpack_long_array_delta_compression(3).unwrap(),
            vec![3, 3, 8]
        );
        assert_eq!(input.offset(), 3);
    }

    #[test]
    fn delta_array_cursor_sums_component_lengths() {
        let deltas = [200u64, 1, 70_000];
        let mut bytes = vec![0xEE; 4];
        for d in deltas {
            varint::write_u64(&mut bytes, d).unwrap();
        }
        let store = MemoryStore::new(bytes);
        let mut input = StoreInput::at(&store, 4);
        let out = input.unpack_long_array_delta_compression(3).unwrap();
        assert_eq!(out, vec![200, 201, 70_201]);
        let expected: usize = deltas.iter().map(|&d| varint::sizeof_u64(d)).sum();
        assert_eq!(input.offset(), 4 + expected as u64);
    }

    #[test]
    fn empty_delta_array_reads_nothing() {
        let store = MemoryStore::new(Vec::new());
        let mut input = StoreInput::new(&store);
        assert!(input.unpack_long_array_delta_compression(0).unwrap().is_empty());
        assert_eq!(input.offset(), 0);
    }

    #[test]
    fn varint_array_fills_range_only() {
        let mut bytes = Vec::new();
        for v in [7u64, 128, 9] {
            varint::write_u64(&mut bytes, v).unwrap();
        }
        let store = MemoryStore::new(bytes);
        let mut input = StoreInput::new(&store);
        let mut buf = [u64::MAX; 5];
        input.unpack_long_array(&mut buf, 1, 4).unwrap();
        assert_eq!(buf, [u64::MAX, 7, 128, 9, u64::MAX]);
        assert_eq!(input.offset(), 4);
    }

    #[test]
    fn read_int_preserves_sign() {
        let store = MemoryStore::new(vec![0xFF; 4]);
        let mut input = StoreInput::new(&store);
        assert_eq!(input.read_int().unwrap(), -1);
        assert_eq!(input.offset(), 4);
    }

    #[test]
    fn fixed_width_reads_advance() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&(-2i16).to_be_bytes());
        bytes.extend_from_slice(&i64::MIN.to_be_bytes());
        bytes.extend_from_slice(&0.5f32.to_be_bytes());
        bytes.extend_from_slice(&1e100f64.to_be_bytes());
        let store = MemoryStore::new(bytes);
        let mut input = StoreInput::new(&store);
        assert_eq!(input.read_short().unwrap(), -2);
        assert_eq!(input.offset(), 2);
        assert_eq!(input.read_long().unwrap(), i64::MIN);
        assert_eq!(input.offset(), 10);
        assert_eq!(input.read_float().unwrap(), 0.5);
        assert_eq!(input.offset(), 14);
        assert_eq!(input.read_double().unwrap(), 1e100);
        assert_eq!(input.offset(), 22);
    }

    #[test]
    fn char_is_big_endian_short_follows_store() {
        let store = MemoryStore::with_options(vec![0x01, 0x02, 0x01, 0x02], le_options());
        let mut input = StoreInput::new(&store);
        assert_eq!(input.read_char().unwrap(), 0x0102);
        assert_eq!(input.read_short().unwrap(), 0x0201);
        assert_eq!(input.offset(), 4);
    }

    #[test]
    fn boolean_only_one_is_true() {
        let store = MemoryStore::new(vec![1, 0, 2, 0xFF]);
        let mut input = StoreInput::new(&store);
        let got: Vec<bool> = (0..4).map(|_| input.read_boolean().unwrap()).collect();
        assert_eq!(got, [true, false, false, false]);
    }

    #[test]
    fn signed_and_unsigned_bytes() {
        let store = MemoryStore::new(vec![0xFE, 0xFE]);
        let mut input = StoreInput::new(&store);
        assert_eq!(input.read_byte().unwrap(), -2);
        assert_eq!(input.read_unsigned_byte().unwrap(), 0xFE);
        assert_eq!(input.offset(), 2);
    }

    #[test]
    fn read_fully_copies_from_old_cursor() {
        let store = MemoryStore::new((0u8..32).collect::<Vec<_>>());
        let mut input = StoreInput::at(&store, 10);
        let mut buf = [0u8; 8];
        input.read_fully(&mut buf[2..7]).unwrap();
        assert_eq!(buf, [0, 0, 10, 11, 12, 13, 14, 0]);
        assert_eq!(input.offset(), 15);
    }

    #[test]
    fn read_fully_advances_even_when_store_fails() {
        let store = MemoryStore::new(vec![0u8; 12]);
        let mut input = StoreInput::at(&store, 10);
        let mut buf = [0u8; 5];
        let err = input.read_fully(&mut buf).unwrap_err();
        assert!(matches!(err, StoreError::OutOfBounds { offset: 10, .. }));
        assert_eq!(input.offset(), 15);
    }

    #[test]
    fn typed_read_failure_keeps_cursor() {
        let store = MemoryStore::new(vec![0u8; 6]);
        let mut input = StoreInput::at(&store, 4);
        assert!(input.read_int().is_err());
        assert_eq!(input.offset(), 4);
    }

    #[test]
    fn typed_reads_wrap_at_the_top_of_the_address_space() {
        // A store that accepts any offset, so the read at u64::MAX - 1 succeeds.
        struct Zeros;
        impl Store for Zeros {
            fn get_byte(&self, _: u64) -> Result<u8> {
                Ok(0)
            }
            fn get_bytes(&self, _: u64, dest: &mut [u8]) -> Result<()> {
                dest.fill(0);
                Ok(())
            }
        }
        let mut input = StoreInput::at(Zeros, u64::MAX - 1);
        assert_eq!(input.read_int().unwrap(), 0);
        assert_eq!(input.offset(), 2);
        input.set_offset(u64::MAX);
        assert_eq!(input.read_double().unwrap(), 0.0);
        assert_eq!(input.offset(), 7);
    }

    #[test]
    fn skip_bytes_moves_without_reading() {
        let store = MemoryStore::new(Vec::new());
        let mut input = StoreInput::new(&store);
        assert_eq!(input.skip_bytes(1000), 1000);
        assert_eq!(input.offset(), 1000);
    }

    #[test]
    fn pos_truncates_to_32_bits() {
        let store = MemoryStore::new(Vec::new());
        let mut input = StoreInput::at(&store, (1 << 32) + 5);
        assert_eq!(input.pos(), 5);
        input.set_pos(u32::MAX);
        assert_eq!(input.offset(), u64::from(u32::MAX));
    }

    #[test]
    fn skip_counts_continuation_bytes() {
        // 0x81 0x00 encodes 128; 0x05 encodes 5.
        let store = MemoryStore::new(vec![0x81, 0x00, 0x05, 0x82, 0x01, 0x07]);
        let mut input = StoreInput::new(&store);
        input.unpack_long_skip(2).unwrap();
        // Decoding two values (128, 5) would end at offset 3; the skip stops
        // just past the second continuation byte instead.
        assert_eq!(input.offset(), 4);
    }

    #[test]
    fn skip_of_single_byte_values_runs_to_store_end() {
        let store = MemoryStore::new(vec![1, 2, 3]);
        let mut input = StoreInput::new(&store);
        assert!(input.unpack_long_skip(1).is_err());
        assert_eq!(input.offset(), 4);
    }

    #[test]
    fn unterminated_varint_surfaces_store_error() {
        let store = MemoryStore::new(vec![0x80, 0x80, 0x80]);
        let mut input = StoreInput::new(&store);
        assert!(matches!(
            input.unpack_long(),
            Err(StoreError::OutOfBounds { offset: 3, .. })
        ));
    }

    #[test]
    fn no_internal_buffers() {
        let store = MemoryStore::new(vec![1, 2, 3]);
        let mut input = StoreInput::new(&store);
        assert!(input.internal_byte_array().is_none());
        assert!(input.internal_byte_buffer().is_none());
        input.close();
        assert_eq!(input.read_unsigned_byte().unwrap(), 1);
    }

    #[test]
    fn works_over_boxed_dyn_store() {
        let store: Box<dyn Store> = Box::new(MemoryStore::new(vec![0x00, 0x2A]));
        let mut input = StoreInput::new(store);
        assert_eq!(input.read_short().unwrap(), 42);
    }
}
