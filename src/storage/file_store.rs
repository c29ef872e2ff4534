//! File-backed page store.
//!
//! [`FilePageStore`] keeps all pages in a single file:
//! - Reading and writing whole pages
//! - Allocating contiguous runs of new pages
//! - Best-effort deallocation (pages are zeroed, ids are not recycled)

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::common::config::PAGE_SIZE;
use crate::common::{Error, PageId, Result};
use crate::storage::{Page, PageStore};

/// Page store backed by a single file.
///
/// # File Layout
/// Pages are laid out sequentially; page N lives at offset `N × PAGE_SIZE`:
/// ```text
/// ┌─────────┬─────────┬─────────┬─────────┐
/// │ Page 0  │ Page 1  │  ...    │ Page N  │
/// │ (4KB)   │ (4KB)   │         │ (4KB)   │
/// └─────────┴─────────┴─────────┴─────────┘
/// ```
///
/// # Durability
/// Every write and allocation is followed by `fsync()`.
///
/// # Deallocation
/// `deallocate` zeroes the page range but does not shrink the file or
/// recycle identifiers; a later read of a freed page returns zeroes.
pub struct FilePageStore {
    file: File,
    /// Number of pages in the file.
    page_count: u32,
}

impl FilePageStore {
    /// Create a new store file.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)?;

        Ok(Self {
            file,
            page_count: 0,
        })
    }

    /// Open an existing store file.
    ///
    /// # Errors
    /// Returns an error if the file doesn't exist or cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(&path)?;

        // Page count is derived from the file size
        let metadata = file.metadata()?;
        let page_count = (metadata.len() / PAGE_SIZE as u64) as u32;

        Ok(Self { file, page_count })
    }

    /// Open an existing store file, or create if it doesn't exist.
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    /// Get the number of pages in the store.
    #[inline]
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Get the total size of the store file in bytes.
    #[inline]
    pub fn file_size(&self) -> u64 {
        (self.page_count as u64) * (PAGE_SIZE as u64)
    }

    fn check_bounds(&self, page_id: PageId) -> Result<()> {
        if !page_id.is_valid() || page_id.0 >= self.page_count {
            return Err(Error::OutOfRange(page_id));
        }
        Ok(())
    }

    fn seek_to(&mut self, page_id: PageId) -> Result<()> {
        let offset = (page_id.0 as u64) * (PAGE_SIZE as u64);
        self.file.seek(SeekFrom::Start(offset))?;
        Ok(())
    }
}

impl PageStore for FilePageStore {
    fn allocate(&mut self, count: u32) -> Result<PageId> {
        let first = PageId::new(self.page_count);

        // Extend the file with `count` zeroed pages; contiguity follows
        // from sequential layout.
        self.seek_to(first)?;
        let zeros = [0u8; PAGE_SIZE];
        for _ in 0..count {
            self.file.write_all(&zeros)?;
        }
        self.file.sync_all()?;

        self.page_count += count;
        Ok(first)
    }

    fn deallocate(&mut self, first: PageId, count: u32) -> Result<()> {
        self.check_bounds(first)?;
        let last = first.advance(count.saturating_sub(1));
        self.check_bounds(last)?;

        // Ids are never recycled; zero the range so stale content cannot
        // leak into a future read.
        self.seek_to(first)?;
        let zeros = [0u8; PAGE_SIZE];
        for _ in 0..count {
            self.file.write_all(&zeros)?;
        }
        self.file.sync_all()?;

        Ok(())
    }

    fn read(&mut self, page_id: PageId, page: &mut Page) -> Result<()> {
        self.check_bounds(page_id)?;
        self.seek_to(page_id)?;
        self.file.read_exact(page.as_mut_slice())?;
        Ok(())
    }

    fn write(&mut self, page_id: PageId, page: &Page) -> Result<()> {
        self.check_bounds(page_id)?;
        self.seek_to(page_id)?;
        self.file.write_all(page.as_slice())?;
        self.file.sync_all()?;
        Ok(())
    }
}
