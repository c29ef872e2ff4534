//! Buffer pool management.
//!
//! The buffer pool is the in-memory cache layer between callers (index
//! structures, record managers) and the page store. It manages a fixed
//! arena of frames, each holding one page.
//!
//! # Components
//! - [`BufferPool`] - the manager; pin/unpin, allocate, free, flush
//! - [`Frame`] - a pool slot holding a page plus descriptor state
//! - [`PageRef`] - reference to a pinned page's bytes
//! - [`replacer`] - the affinity-biased eviction policy
//! - [`PoolStats`] - performance counters

mod frame;
mod page_ref;
mod pool;
pub mod replacer;
mod stats;

pub use frame::Frame;
pub use page_ref::PageRef;
pub use pool::BufferPool;
pub use replacer::{Affinity, AffinityReplacer};
pub use stats::{PoolStats, StatsSnapshot};
