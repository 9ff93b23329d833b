// In-memory store over any contiguous byte container.

use super::{ByteOrder, Store, StoreOptions, check_range};
use crate::error::Result;

/// Store backed by a contiguous byte buffer (`Vec<u8>`, `&[u8]`, ...).
///
/// Out-of-range reads return `StoreError::OutOfBounds`.
#[derive(Debug, Clone)]
pub struct MemoryStore<B = Vec<u8>> {
    bytes: B,
    byte_order: ByteOrder,
}

impl<B: AsRef<[u8]>> MemoryStore<B> {
    /// Wrap `bytes` with big-endian typed getters.
    pub fn new(bytes: B) -> Self {
        Self::with_options(bytes, StoreOptions::default())
    }

    pub fn with_options(bytes: B, opts: StoreOptions) -> Self {
        Self {
            bytes,
            byte_order: opts.byte_order,
        }
    }

    /// Store size in bytes.
    pub fn len(&self) -> u64 {
        self.bytes.as_ref().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.as_ref().is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_ref()
    }

    pub fn into_inner(self) -> B {
        self.bytes
    }
}

impl<B: AsRef<[u8]>> Store for MemoryStore<B> {
    #[inline]
    fn get_byte(&self, offset: u64) -> Result<u8> {
        let range = check_range(offset, 1, self.len())?;
        Ok(self.bytes.as_ref()[range.start])
    }

    fn get_bytes(&self, offset: u64, dest: &mut [u8]) -> Result<()> {
        let range = check_range(offset, dest.len(), self.len())?;
        dest.copy_from_slice(&self.bytes.as_ref()[range]);
        Ok(())
    }

    fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }
}
