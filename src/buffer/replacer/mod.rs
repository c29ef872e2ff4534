//! Eviction policy for the buffer pool.
//!
//! The pool uses a two-class, affinity-biased policy: callers tag each
//! unpinned page as [`Affinity::Favored`] (likely reused soon) or
//! [`Affinity::Disfavored`] (unlikely), and [`AffinityReplacer`] picks
//! victims accordingly.

mod affinity;

pub use affinity::{Affinity, AffinityReplacer};
