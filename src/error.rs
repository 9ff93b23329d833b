// Errors raised by backing stores.
//
// The reader never produces errors of its own: every failure surfaces from
// the store it reads through and is propagated unchanged.

use std::io;
use std::path::PathBuf;

/// Failure of a backing store access.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested range lies (partly) outside the store.
    #[error("out of bounds: {len} bytes at offset {offset} (store size {size})")]
    OutOfBounds { offset: u64, len: usize, size: u64 },

    /// A paged store has no page allocated for the requested offset.
    #[error("page {page} not allocated (offset {offset})")]
    PageMissing { page: u64, offset: u64 },

    /// The store could not be opened.
    #[error("cannot open store {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Invalid store configuration.
    #[error("invalid store options: {0}")]
    InvalidOptions(String),

    /// I/O failure while reading the store.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
