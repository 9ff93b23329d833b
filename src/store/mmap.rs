// Read-only memory-mapped file store.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::debug;
use memmap2::Mmap;

use super::{ByteOrder, Store, StoreOptions, check_range};
use crate::error::{Result, StoreError};

/// Store over a read-only memory map of a file.
///
/// The file must not be truncated by another process while mapped.
pub struct MmapStore {
    path: PathBuf,
    mmap: Mmap,
    byte_order: ByteOrder,
}

impl MmapStore {
    /// Map `path` with big-endian typed getters.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, StoreOptions::default())
    }

    pub fn open_with_options(path: impl AsRef<Path>, opts: StoreOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| StoreError::Open {
            path: path.clone(),
            source,
        })?;
        // SAFETY: the map is read-only; concurrent truncation of the file is
        // excluded by the type's contract.
        let mmap = unsafe {
            Mmap::map(&file).map_err(|source| StoreError::Open {
                path: path.clone(),
                source,
            })?
        };
        debug!("mapped {} ({} bytes)", path.display(), mmap.len());
        Ok(Self {
            path,
            mmap,
            byte_order: opts.byte_order,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> u64 {
        self.mmap.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }
}

impl std::fmt::Debug for MmapStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MmapStore")
            .field("path", &self.path)
            .field("len", &self.mmap.len())
            .field("byte_order", &self.byte_order)
            .finish()
    }
}

impl Store for MmapStore {
    #[inline]
    fn get_byte(&self, offset: u64) -> Result<u8> {
        let range = check_range(offset, 1, self.len())?;
        Ok(self.mmap[range.start])
    }

    fn get_bytes(&self, offset: u64, dest: &mut [u8]) -> Result<()> {
        let range = check_range(offset, dest.len(), self.len())?;
        dest.copy_from_slice(&self.mmap[range]);
        Ok(())
    }

    fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }
}
