// Backing store capability consumed by the readers.
//
// A store hands out raw bytes and fixed-width values at absolute offsets.
// It owns its byte order and its bounds policy; readers trust both.
//
// # Modules
//
// - `memory`: owned or borrowed in-memory bytes
// - `file`: positioned reads on an open file handle (unix)
// - `paged`: fixed-size pages, reads may straddle page boundaries
// - `mmap`: read-only memory-mapped file (feature `mmap`)

use std::sync::Arc;

use crate::error::Result;

#[cfg(unix)]
pub mod file;
pub mod memory;
#[cfg(feature = "mmap")]
pub mod mmap;
pub mod paged;

#[cfg(unix)]
pub use file::FileStore;
pub use memory::MemoryStore;
#[cfg(feature = "mmap")]
pub use mmap::MmapStore;
pub use paged::PagedStore;

/// Default page size for paged stores (1 MiB).
pub const DEFAULT_PAGE_SIZE: usize = 1 << 20;

// ---------------------------------------------------------------------------
// Byte order
// ---------------------------------------------------------------------------

/// Byte order a store uses for its typed getters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    BigEndian,
    LittleEndian,
}

impl ByteOrder {
    #[inline]
    pub fn i16(self, b: [u8; 2]) -> i16 {
        match self {
            Self::BigEndian => i16::from_be_bytes(b),
            Self::LittleEndian => i16::from_le_bytes(b),
        }
    }

    #[inline]
    pub fn i32(self, b: [u8; 4]) -> i32 {
        match self {
            Self::BigEndian => i32::from_be_bytes(b),
            Self::LittleEndian => i32::from_le_bytes(b),
        }
    }

    #[inline]
    pub fn i64(self, b: [u8; 8]) -> i64 {
        match self {
            Self::BigEndian => i64::from_be_bytes(b),
            Self::LittleEndian => i64::from_le_bytes(b),
        }
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Construction options shared by the store backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Byte order of the typed getters.
    pub byte_order: ByteOrder,
    /// Page size for `PagedStore`; must be a nonzero power of two.
    pub page_size: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::BigEndian,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

// ---------------------------------------------------------------------------
// Store trait
// ---------------------------------------------------------------------------

/// Random-access byte provider.
///
/// Backends implement `get_byte`, `get_bytes` and `byte_order`; the typed
/// getters default to assembling bytes in that order and may be overridden
/// by stores with a faster path.
///
/// No bounds contract is imposed: a store may fail on out-of-range access
/// (all bundled backends return [`StoreError::OutOfBounds`]) and readers
/// propagate whatever it returns.
///
/// [`StoreError::OutOfBounds`]: crate::error::StoreError::OutOfBounds
pub trait Store {
    /// Read one byte at `offset`.
    fn get_byte(&self, offset: u64) -> Result<u8>;

    /// Fill `dest` with the bytes starting at `offset`.
    fn get_bytes(&self, offset: u64, dest: &mut [u8]) -> Result<()>;

    /// Byte order of the typed getters.
    fn byte_order(&self) -> ByteOrder {
        ByteOrder::BigEndian
    }

    fn get_short(&self, offset: u64) -> Result<i16> {
        let mut b = [0u8; 2];
        self.get_bytes(offset, &mut b)?;
        Ok(self.byte_order().i16(b))
    }

    fn get_int(&self, offset: u64) -> Result<i32> {
        let mut b = [0u8; 4];
        self.get_bytes(offset, &mut b)?;
        Ok(self.byte_order().i32(b))
    }

    fn get_long(&self, offset: u64) -> Result<i64> {
        let mut b = [0u8; 8];
        self.get_bytes(offset, &mut b)?;
        Ok(self.byte_order().i64(b))
    }

    fn get_float(&self, offset: u64) -> Result<f32> {
        Ok(f32::from_bits(self.get_int(offset)? as u32))
    }

    fn get_double(&self, offset: u64) -> Result<f64> {
        Ok(f64::from_bits(self.get_long(offset)? as u64))
    }
}

macro_rules! forward_store {
    ($($ty:ty),*) => {$(
        impl<S: Store + ?Sized> Store for $ty {
            fn get_byte(&self, offset: u64) -> Result<u8> {
                (**self).get_byte(offset)
            }
            fn get_bytes(&self, offset: u64, dest: &mut [u8]) -> Result<()> {
                (**self).get_bytes(offset, dest)
            }
            fn byte_order(&self) -> ByteOrder {
                (**self).byte_order()
            }
            fn get_short(&self, offset: u64) -> Result<i16> {
                (**self).get_short(offset)
            }
            fn get_int(&self, offset: u64) -> Result<i32> {
                (**self).get_int(offset)
            }
            fn get_long(&self, offset: u64) -> Result<i64> {
                (**self).get_long(offset)
            }
            fn get_float(&self, offset: u64) -> Result<f32> {
                (**self).get_float(offset)
            }
            fn get_double(&self, offset: u64) -> Result<f64> {
                (**self).get_double(offset)
            }
        }
    )*};
}

forward_store!(&S, Box<S>, Arc<S>);

/// Bounds check shared by the slice-backed stores.
#[inline]
pub(crate) fn check_range(offset: u64, len: usize, size: u64) -> Result<std::ops::Range<usize>> {
    let end = offset.checked_add(len as u64);
    match end {
        Some(end) if end <= size => Ok(offset as usize..end as usize),
        _ => Err(crate::error::StoreError::OutOfBounds { offset, len, size }),
    }
}
