//! Reference to a pinned page.

use parking_lot::{RwLockReadGuard, RwLockWriteGuard};

use crate::common::{FrameId, PageId};
use crate::storage::{Page, PageStore};

use super::pool::BufferPool;

/// A reference to a page pinned in the buffer pool.
///
/// A `PageRef` is an index plus a borrow into the pool's frame arena. It
/// does not unpin on drop; the caller balances every [`BufferPool::pin`]
/// with a [`BufferPool::unpin`], declaring dirtiness and affinity there.
///
/// # Validity
/// The reference is meaningful only while its pin is outstanding. Reading
/// through a `PageRef` after unpinning the page is not memory-unsafe (the
/// frame arena lives as long as the pool), but the frame may by then hold
/// a different page's bytes.
///
/// # Example
/// ```no_run
/// use framepool::{Affinity, BufferPool, FilePageStore, PoolConfig};
///
/// # fn main() -> framepool::Result<()> {
/// let store = FilePageStore::create("pool.db")?;
/// let pool = BufferPool::new(PoolConfig::new(8), store);
///
/// let (pid, page) = pool.allocate_and_pin(1)?;
/// page.data_mut().as_mut_slice()[0] = 0xAB;
/// pool.unpin(pid, true, Affinity::Favored)?;
/// # Ok(())
/// # }
/// ```
pub struct PageRef<'a, S: PageStore> {
    pool: &'a BufferPool<S>,
    frame_id: FrameId,
    page_id: PageId,
}

impl<'a, S: PageStore> PageRef<'a, S> {
    pub(crate) fn new(pool: &'a BufferPool<S>, frame_id: FrameId, page_id: PageId) -> Self {
        Self {
            pool,
            frame_id,
            page_id,
        }
    }

    /// Get the page ID.
    #[inline]
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    /// Get the frame ID.
    #[inline]
    pub fn frame_id(&self) -> FrameId {
        self.frame_id
    }

    /// Lock the page bytes for reading.
    #[inline]
    pub fn data(&self) -> RwLockReadGuard<'a, Page> {
        self.pool.frame(self.frame_id).page()
    }

    /// Lock the page bytes for writing.
    ///
    /// Writing through this guard does not mark the page dirty by itself;
    /// declare the modification when unpinning.
    #[inline]
    pub fn data_mut(&self) -> RwLockWriteGuard<'a, Page> {
        self.pool.frame(self.frame_id).page_mut()
    }
}
