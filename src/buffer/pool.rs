//! Buffer pool manager - the core page caching layer.
//!
//! The [`BufferPool`] mediates all access between callers and the page
//! store:
//! - Page caching with pin-based reference counting
//! - Dirty tracking and write-back before frame reuse
//! - Affinity-biased victim selection when the pool is full

use std::collections::HashMap;
use std::sync::atomic::Ordering;

use log::{debug, error, warn};
use parking_lot::{Mutex, RwLock};

use crate::buffer::replacer::{Affinity, AffinityReplacer};
use crate::buffer::{Frame, PageRef, PoolStats};
use crate::common::{Error, FrameId, PageId, PoolConfig, Result};
use crate::storage::PageStore;

/// Manages a fixed pool of frames caching pages from a [`PageStore`].
///
/// ```text
/// ┌─────────────────────────────────────────────────────────────┐
/// │                        BufferPool                           │
/// │  ┌──────────────┐  ┌───────────────────────────────────┐    │
/// │  │ page_table   │  │        frames: Vec<Frame>         │    │
/// │  │PageId → Fid  │─▶│  [Frame0] [Frame1] [Frame2] ...   │    │
/// │  └──────────────┘  └───────────────────────────────────┘    │
/// │  ┌──────────────┐  ┌──────────────────┐  ┌────────────┐     │
/// │  │  free_list   │  │     replacer     │  │   store    │     │
/// │  │ Vec<FrameId> │  │ AffinityReplacer │  │   Mutex    │     │
/// │  └──────────────┘  └──────────────────┘  └────────────┘     │
/// └─────────────────────────────────────────────────────────────┘
/// ```
///
/// The pin protocol is explicit: every [`pin`] must be balanced by an
/// [`unpin`] carrying the caller's dirty declaration and reuse hint. A
/// frame becomes an eviction candidate the instant its pin count reaches
/// zero and stops being one the instant it is re-pinned or freed.
///
/// Operations are expected to be driven by one logical thread of control;
/// the internal locks keep `&self` methods sound, they are not a
/// transaction layer.
///
/// [`pin`]: BufferPool::pin
/// [`unpin`]: BufferPool::unpin
///
/// # Usage
/// ```ignore
/// let store = FilePageStore::create("pool.db")?;
/// let pool = BufferPool::new(PoolConfig::new(8), store);
///
/// let (pid, page) = pool.allocate_and_pin(1)?;
/// page.data_mut().as_mut_slice()[0] = 0xAB;
/// pool.unpin(pid, true, Affinity::Favored)?;
/// ```
pub struct BufferPool<S: PageStore> {
    /// Fixed arena of frames allocated at construction.
    frames: Vec<Frame>,

    /// Maps resident page IDs to frame IDs.
    page_table: RwLock<HashMap<PageId, FrameId>>,

    /// Stack of empty frame IDs.
    free_list: Mutex<Vec<FrameId>>,

    /// Eviction candidate bookkeeping.
    replacer: Mutex<AffinityReplacer>,

    /// The external page store; all durable I/O goes through here.
    store: Mutex<S>,

    /// Performance counters.
    stats: PoolStats,

    /// Number of frames (immutable after construction).
    pool_size: usize,
}

impl<S: PageStore> BufferPool<S> {
    /// Create a new buffer pool.
    ///
    /// Allocates all frames upfront; the pool never grows.
    ///
    /// # Panics
    /// Panics if `config.pool_size` is 0.
    pub fn new(config: PoolConfig, store: S) -> Self {
        assert!(config.pool_size > 0, "pool_size must be > 0");

        let frames: Vec<Frame> = (0..config.pool_size).map(|_| Frame::new()).collect();
        let free_list: Vec<FrameId> = (0..config.pool_size).map(FrameId::new).collect();

        Self {
            frames,
            page_table: RwLock::new(HashMap::new()),
            free_list: Mutex::new(free_list),
            replacer: Mutex::new(AffinityReplacer::new()),
            store: Mutex::new(store),
            stats: PoolStats::new(),
            pool_size: config.pool_size,
        }
    }

    // ========================================================================
    // Public API: pin / unpin
    // ========================================================================

    /// Pin a page, returning a reference to its bytes.
    ///
    /// On a hit the resident frame's pin count is incremented. On a miss
    /// the page is loaded into an empty frame, or into a victim chosen by
    /// the replacement policy when no frame is empty (a dirty victim is
    /// written back first). With `for_new_page` set, the frame is zeroed
    /// instead of read - the page was just allocated and has no content
    /// on the store yet.
    ///
    /// # Errors
    /// - [`Error::PoolExhausted`] if every frame is pinned
    /// - store errors from the page read
    pub fn pin(&self, page_id: PageId, for_new_page: bool) -> Result<PageRef<'_, S>> {
        {
            let pt = self.page_table.read();
            if let Some(&frame_id) = pt.get(&page_id) {
                let frame = &self.frames[frame_id.0];
                frame.pin();

                // A pinned frame must not sit in a candidate list; take it
                // out the moment the count leaves zero.
                self.replacer.lock().remove(frame_id);

                self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
                return Ok(PageRef::new(self, frame_id, page_id));
            }
        }

        self.stats.cache_misses.fetch_add(1, Ordering::Relaxed);

        let frame_id = self.acquire_frame()?;
        let frame = &self.frames[frame_id.0];

        if for_new_page {
            frame.page_mut().reset();
        } else {
            let read_result = {
                let mut page = frame.page_mut();
                self.store.lock().read(page_id, &mut page)
            };
            if let Err(e) = read_result {
                // The frame was never bound to the page; hand it back.
                self.free_list.lock().push(frame_id);
                return Err(e);
            }
            self.stats.pages_read.fetch_add(1, Ordering::Relaxed);
        }

        frame.set_page_id(Some(page_id));
        frame.pin();
        frame.clear_dirty();

        self.page_table.write().insert(page_id, frame_id);

        Ok(PageRef::new(self, frame_id, page_id))
    }

    /// Unpin a page, declaring whether it was modified and how soon it is
    /// likely to be reused.
    ///
    /// The dirty flag is sticky: once any pinner declares a modification
    /// it stays set until the page is flushed, regardless of later
    /// `dirty = false` unpins. When the pin count reaches zero the frame
    /// joins the candidate list named by `affinity`.
    ///
    /// # Errors
    /// - [`Error::NotResident`] if the page is not in the pool
    /// - [`Error::PinCount`] if the pin count is already zero
    pub fn unpin(&self, page_id: PageId, dirty: bool, affinity: Affinity) -> Result<()> {
        let frame_id = {
            let pt = self.page_table.read();
            *pt.get(&page_id).ok_or(Error::NotResident(page_id))?
        };

        let frame = &self.frames[frame_id.0];
        if frame.pin_count() == 0 {
            return Err(Error::PinCount(page_id));
        }

        if dirty {
            frame.mark_dirty();
        }

        if frame.unpin() == 0 {
            self.replacer.lock().enqueue(frame_id, affinity);
        }

        Ok(())
    }

    // ========================================================================
    // Public API: page lifecycle
    // ========================================================================

    /// Allocate `count` contiguous new pages on the store and pin the
    /// first one.
    ///
    /// Allocation and pinning are atomic from the caller's perspective:
    /// if no frame can be obtained, all `count` pages are deallocated
    /// before the error is returned.
    ///
    /// # Errors
    /// - store errors from allocation (or from the rollback deallocation)
    /// - [`Error::PoolExhausted`] if no frame could be obtained
    ///
    /// # Panics
    /// Panics if `count` is 0: the first page of an empty run would name
    /// a page the store never materialized.
    pub fn allocate_and_pin(&self, count: u32) -> Result<(PageId, PageRef<'_, S>)> {
        assert!(count > 0, "count must be > 0");

        let first = self.store.lock().allocate(count)?;

        match self.pin(first, true) {
            Ok(page_ref) => Ok((first, page_ref)),
            Err(pin_err) => {
                self.store.lock().deallocate(first, count)?;
                Err(pin_err)
            }
        }
    }

    /// Free a page: drop it from the pool and deallocate it on the store.
    ///
    /// Only legal for a resident, unpinned page. The frame is emptied and
    /// returned to the free list before the store deallocation, so a
    /// deallocation failure leaves the page already gone from memory.
    ///
    /// # Errors
    /// - [`Error::FreePinned`] if the page is pinned or not resident
    /// - [`Error::CandidateMissing`] if the frame was in neither candidate
    ///   list (a bookkeeping defect; the frame is still released)
    /// - store errors from deallocation
    pub fn free(&self, page_id: PageId) -> Result<()> {
        let frame_id = {
            let mut pt = self.page_table.write();
            let frame_id = match pt.get(&page_id) {
                Some(&fid) if !self.frames[fid.0].is_pinned() => fid,
                _ => return Err(Error::FreePinned(page_id)),
            };
            pt.remove(&page_id);
            frame_id
        };

        let frame = &self.frames[frame_id.0];
        frame.set_page_id(None);
        frame.clear_dirty();

        // An unpinned resident frame is always enqueued somewhere. The
        // frame is already detached, so it goes back on the free list
        // even when that bookkeeping turns out to be off.
        let was_candidate = self.replacer.lock().remove(frame_id);
        self.free_list.lock().push(frame_id);
        if !was_candidate {
            return Err(Error::CandidateMissing(frame_id));
        }

        self.store.lock().deallocate(page_id, 1)?;
        Ok(())
    }

    // ========================================================================
    // Public API: flushing
    // ========================================================================

    /// Flush a page to the store if it is resident and dirty.
    ///
    /// A clean or non-resident page is a no-op success.
    pub fn flush(&self, page_id: PageId) -> Result<()> {
        let frame_id = {
            let pt = self.page_table.read();
            match pt.get(&page_id) {
                Some(&fid) => fid,
                None => return Ok(()),
            }
        };

        self.flush_frame(frame_id, page_id)
    }

    /// Flush every resident dirty page to the store.
    ///
    /// Stops at the first failure; pages flushed before it stay flushed.
    /// Idempotent: a second call with no interleaved writes does nothing.
    pub fn flush_all(&self) -> Result<()> {
        let pages: Vec<(PageId, FrameId)> = {
            let pt = self.page_table.read();
            pt.iter().map(|(&pid, &fid)| (pid, fid)).collect()
        };

        for (page_id, frame_id) in pages {
            self.flush_frame(frame_id, page_id)?;
        }

        Ok(())
    }

    // ========================================================================
    // Public API: introspection
    // ========================================================================

    /// Get buffer pool statistics.
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    /// Get the pool size.
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Get the number of empty frames.
    pub fn free_frame_count(&self) -> usize {
        self.free_list.lock().len()
    }

    /// Get the number of resident pages.
    pub fn resident_count(&self) -> usize {
        self.page_table.read().len()
    }

    /// Whether a page is currently resident.
    pub fn is_resident(&self, page_id: PageId) -> bool {
        self.page_table.read().contains_key(&page_id)
    }

    /// Pin count of a resident page, or None if not resident.
    pub fn pin_count(&self, page_id: PageId) -> Option<u32> {
        let pt = self.page_table.read();
        pt.get(&page_id).map(|fid| self.frames[fid.0].pin_count())
    }

    // ========================================================================
    // Internal
    // ========================================================================

    /// Access a frame by id. Used by [`PageRef`].
    pub(crate) fn frame(&self, frame_id: FrameId) -> &Frame {
        &self.frames[frame_id.0]
    }

    /// Get an empty frame, evicting if none is available.
    fn acquire_frame(&self) -> Result<FrameId> {
        if let Some(frame_id) = self.free_list.lock().pop() {
            return Ok(frame_id);
        }

        self.evict_frame()
    }

    /// Evict a victim frame and return it, emptied.
    fn evict_frame(&self) -> Result<FrameId> {
        let frame_id = self
            .replacer
            .lock()
            .victim()
            .ok_or(Error::PoolExhausted)?;

        self.stats.evictions.fetch_add(1, Ordering::Relaxed);

        let frame = &self.frames[frame_id.0];
        let old_page_id = frame.page_id();
        debug!("evicting {} from {}", old_page_id.unwrap_or(PageId::INVALID), frame_id);

        // Write back a dirty victim. A failed write does not stop the
        // eviction; the pool is a cache, not the durability layer - but
        // the loss is surfaced in the log and the stats.
        if frame.is_dirty() {
            if let Some(pid) = old_page_id {
                let write_result = {
                    let page = frame.page();
                    self.store.lock().write(pid, &page)
                };
                match write_result {
                    Ok(()) => {
                        self.stats.pages_written.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(e) => {
                        self.stats.dirty_evictions_lost.fetch_add(1, Ordering::Relaxed);
                        warn!("evicting dirty {pid} without write-back: {e}");
                    }
                }
            }
        }

        if let Some(pid) = old_page_id {
            self.page_table.write().remove(&pid);
        }

        frame.clear_dirty();
        frame.set_page_id(None);

        Ok(frame_id)
    }

    /// Write a frame to the store if dirty, then clear the dirty flag.
    fn flush_frame(&self, frame_id: FrameId, page_id: PageId) -> Result<()> {
        let frame = &self.frames[frame_id.0];

        if frame.is_dirty() {
            {
                let page = frame.page();
                self.store.lock().write(page_id, &page)?;
            }

            frame.clear_dirty();
            self.stats.pages_written.fetch_add(1, Ordering::Relaxed);
        }

        Ok(())
    }
}

impl<S: PageStore> Drop for BufferPool<S> {
    /// Teardown flushes every resident dirty frame, best-effort: each
    /// frame is attempted independently, every I/O failure is reported in
    /// the log, and none of them blocks the release of memory.
    fn drop(&mut self) {
        let pages: Vec<(PageId, FrameId)> = {
            let pt = self.page_table.read();
            pt.iter().map(|(&pid, &fid)| (pid, fid)).collect()
        };

        for (page_id, frame_id) in pages {
            if let Err(e) = self.flush_frame(frame_id, page_id) {
                error!("teardown flush of {page_id} failed, content lost: {e}");
            }
        }
    }
}
