// File-handle store: positioned reads on an open file, no mapping and no
// buffering. Each getter is one `pread`.

use std::fs::File;
use std::io;
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};

use log::debug;

use super::{ByteOrder, Store, StoreOptions};
use crate::error::{Result, StoreError};

/// Store reading a file through positioned reads.
///
/// Reads are not checked against the file size: a read past the end fails
/// with [`StoreError::Io`] of kind `UnexpectedEof`, as does any read the
/// file can no longer satisfy after being truncated.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    file: File,
    len: u64,
    byte_order: ByteOrder,
}

impl FileStore {
    /// Open `path` with big-endian typed getters.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, StoreOptions::default())
    }

    pub fn open_with_options(path: impl AsRef<Path>, opts: StoreOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let open_err = |source: io::Error| StoreError::Open {
            path: path.clone(),
            source,
        };
        let file = File::open(&path).map_err(open_err)?;
        let len = file.metadata().map_err(open_err)?.len();
        debug!("opened {} for positioned reads ({len} bytes)", path.display());
        Ok(Self {
            path,
            file,
            len,
            byte_order: opts.byte_order,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File size when the store was opened.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Store for FileStore {
    fn get_byte(&self, offset: u64) -> Result<u8> {
        let mut b = [0u8; 1];
        self.file.read_exact_at(&mut b, offset)?;
        Ok(b[0])
    }

    fn get_bytes(&self, offset: u64, dest: &mut [u8]) -> Result<()> {
        self.file.read_exact_at(dest, offset)?;
        Ok(())
    }

    fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }
}
