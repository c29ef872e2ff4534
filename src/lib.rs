//! framepool - a buffer pool manager with affinity-biased page replacement.
//!
//! # Architecture
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                 Callers (indexes, record managers)        │
//! └───────────────────────────┬───────────────────────────────┘
//!                             ↓ pin / unpin / free / flush
//! ┌───────────────────────────────────────────────────────────┐
//! │                  Buffer Pool (buffer/)                    │
//! │   BufferPool + Frame arena + AffinityReplacer + stats     │
//! │   ┌───────────────────────────────────────────────────┐   │
//! │   │ Eviction: disfavored (LIFO) before favored (FIFO) │   │
//! │   └───────────────────────────────────────────────────┘   │
//! └───────────────────────────┬───────────────────────────────┘
//!                             ↓ read / write / allocate / deallocate
//! ┌───────────────────────────────────────────────────────────┐
//! │                 Page Store (storage/)                     │
//! │           PageStore trait + FilePageStore                 │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Pinned pages are never evicted; an unpinned page waits in one of two
//! candidate lists, ordered by the caller's reuse hint: disfavored pages
//! go first (most recent first), favored pages last (oldest first).
//!
//! # Modules
//! - [`common`] - shared primitives (PageId, FrameId, Error, PoolConfig)
//! - [`buffer`] - the pool, frames, and eviction policy
//! - [`storage`] - page buffers and the page store boundary
//!
//! # Quick Start
//! ```no_run
//! use framepool::{Affinity, BufferPool, FilePageStore, PoolConfig};
//!
//! # fn main() -> framepool::Result<()> {
//! let store = FilePageStore::create("my_pool.db")?;
//! let pool = BufferPool::new(PoolConfig::new(16), store);
//!
//! let (pid, page) = pool.allocate_and_pin(1)?;
//! page.data_mut().as_mut_slice()[0] = 0xAB;
//! pool.unpin(pid, true, Affinity::Favored)?;
//! # Ok(())
//! # }
//! ```

pub mod buffer;
pub mod common;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use common::config::{PoolConfig, PAGE_SIZE};
pub use common::{Error, FrameId, PageId, Result};

pub use buffer::{Affinity, BufferPool, PageRef, PoolStats, StatsSnapshot};
pub use storage::{FilePageStore, Page, PageStore};
