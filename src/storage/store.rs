//! The page store boundary consumed by the buffer pool.

use crate::common::{PageId, Result};
use crate::storage::Page;

/// Durable storage for fixed-size pages.
///
/// The buffer pool is the only caller; it serializes access, so
/// implementations may assume one operation at a time. All failures are
/// reported through [`Result`] and are never swallowed by the pool.
///
/// Methods take `&mut self` because store I/O mutates internal state
/// (file cursor, allocation watermark).
pub trait PageStore {
    /// Allocate `count` contiguous new pages, returning the first id.
    ///
    /// `count` must be at least 1. The new pages read back as zeroes
    /// until written.
    fn allocate(&mut self, count: u32) -> Result<PageId>;

    /// Deallocate the run of `count` pages starting at `first`.
    fn deallocate(&mut self, first: PageId, count: u32) -> Result<()>;

    /// Read a page's bytes into `page`.
    fn read(&mut self, page_id: PageId, page: &mut Page) -> Result<()>;

    /// Write a page's bytes to durable storage.
    fn write(&mut self, page_id: PageId, page: &Page) -> Result<()>;
}
