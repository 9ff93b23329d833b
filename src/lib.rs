//! Storecursor: sequential decoding straight out of random-access byte stores.
//!
//! The crate provides:
//! - The `Store` capability and its backends: in-memory, paged, file-handle, memory-mapped (`store`)
//! - Cursor-based decoders for primitives, varints and delta arrays (`input`)
//! - The varint layout helpers (`varint`)
//! - Concurrent multi-array decoding (`parallel` feature)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use storecursor::input::{DataInput, StoreInput};
//! use storecursor::store::MemoryStore;
//! use storecursor::varint;
//!
//! let mut bytes = Vec::new();
//! varint::write_delta_array(&mut bytes, &[3, 3, 8]).unwrap();
//!
//! let store = MemoryStore::new(bytes);
//! let mut input = StoreInput::new(&store);
//! assert_eq!(input.unpack_long_array_delta_compression(3).unwrap(), [3, 3, 8]);
//! assert_eq!(input.offset(), 3);
//! ```

pub mod error;
pub mod input;
pub mod store;
pub mod varint;

#[cfg(feature = "parallel")]
pub mod parallel;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Result, StoreError};
pub use input::{DataInput, SliceInput, StoreInput};
pub use store::{ByteOrder, MemoryStore, PagedStore, Store, StoreOptions};
#[cfg(feature = "mmap")]
pub use store::MmapStore;
#[cfg(unix)]
pub use store::FileStore;
