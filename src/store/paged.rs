// Paged store: the address space is cut into fixed-size pages that are
// allocated on first write. Reads may straddle page boundaries and are
// assembled page by page.

use log::debug;

use super::{ByteOrder, DEFAULT_PAGE_SIZE, Store, StoreOptions};
use crate::error::{Result, StoreError};

/// Sparse store made of fixed-size, lazily allocated pages.
#[derive(Debug, Clone)]
pub struct PagedStore {
    pages: Vec<Option<Box<[u8]>>>,
    page_shift: u32,
    /// One past the highest byte ever written.
    len: u64,
    byte_order: ByteOrder,
}

impl PagedStore {
    /// Empty store with default options (1 MiB pages, big-endian).
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            page_shift: DEFAULT_PAGE_SIZE.trailing_zeros(),
            len: 0,
            byte_order: ByteOrder::BigEndian,
        }
    }

    /// Empty store; fails unless `page_size` is a nonzero power of two.
    pub fn with_options(opts: StoreOptions) -> Result<Self> {
        if opts.page_size == 0 || !opts.page_size.is_power_of_two() {
            return Err(StoreError::InvalidOptions(format!(
                "page size {} is not a power of two",
                opts.page_size
            )));
        }
        Ok(Self {
            pages: Vec::new(),
            page_shift: opts.page_size.trailing_zeros(),
            len: 0,
            byte_order: opts.byte_order,
        })
    }

    /// Store holding a copy of `bytes` starting at offset 0.
    pub fn from_bytes(bytes: &[u8], opts: StoreOptions) -> Result<Self> {
        let mut store = Self::with_options(opts)?;
        store.write_at(0, bytes)?;
        Ok(store)
    }

    #[inline]
    pub fn page_size(&self) -> usize {
        1 << self.page_shift
    }

    /// Logical size: one past the highest written byte.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of pages currently allocated.
    pub fn allocated_pages(&self) -> usize {
        self.pages.iter().filter(|p| p.is_some()).count()
    }

    /// Copy `data` into the store at `offset`, allocating pages as needed.
    ///
    /// Fails without writing if the range would end past `u64::MAX`.
    pub fn write_at(&mut self, offset: u64, data: &[u8]) -> Result<()> {
        let end = offset
            .checked_add(data.len() as u64)
            .ok_or(StoreError::OutOfBounds {
                offset,
                len: data.len(),
                size: u64::MAX,
            })?;
        let page_size = self.page_size();
        let mut pos = offset;
        let mut rest = data;
        while !rest.is_empty() {
            let page_no = (pos >> self.page_shift) as usize;
            let in_page = (pos as usize) & (page_size - 1);
            if page_no >= self.pages.len() {
                self.pages.resize(page_no + 1, None);
            }
            let page = self.pages[page_no].get_or_insert_with(|| {
                debug!("allocating page {page_no} ({page_size} bytes)");
                vec![0u8; page_size].into_boxed_slice()
            });
            let n = rest.len().min(page_size - in_page);
            page[in_page..in_page + n].copy_from_slice(&rest[..n]);
            rest = &rest[n..];
            // Cannot overflow: pos + rest.len() == end.
            pos += n as u64;
        }
        self.len = self.len.max(end);
        Ok(())
    }

    /// Append `data` after the current logical end, returning where it starts.
    pub fn append(&mut self, data: &[u8]) -> Result<u64> {
        let at = self.len;
        self.write_at(at, data)?;
        Ok(at)
    }

    fn page(&self, offset: u64) -> Result<&[u8]> {
        let page_no = offset >> self.page_shift;
        self.pages
            .get(page_no as usize)
            .and_then(|p| p.as_deref())
            .ok_or(StoreError::PageMissing {
                page: page_no,
                offset,
            })
    }
}

impl Default for PagedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for PagedStore {
    fn get_byte(&self, offset: u64) -> Result<u8> {
        if offset >= self.len {
            return Err(StoreError::OutOfBounds {
                offset,
                len: 1,
                size: self.len,
            });
        }
        let page = self.page(offset)?;
        Ok(page[(offset as usize) & (self.page_size() - 1)])
    }

    fn get_bytes(&self, offset: u64, dest: &mut [u8]) -> Result<()> {
        match offset.checked_add(dest.len() as u64) {
            Some(end) if end <= self.len => {}
            _ => {
                return Err(StoreError::OutOfBounds {
                    offset,
                    len: dest.len(),
                    size: self.len,
                });
            }
        }
        let page_size = self.page_size();
        let mut pos = offset;
        let mut filled = 0;
        while filled < dest.len() {
            let page = self.page(pos)?;
            let in_page = (pos as usize) & (page_size - 1);
            let n = (dest.len() - filled).min(page_size - in_page);
            dest[filled..filled + n].copy_from_slice(&page[in_page..in_page + n]);
            filled += n;
            pos += n as u64;
        }
        Ok(())
    }

    fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }
}
