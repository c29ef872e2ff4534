//! Common types shared across framepool.
//!
//! Fundamental primitives used throughout the crate:
//! - Configuration constants and [`PoolConfig`]
//! - Error types
//! - Identifiers (PageId, FrameId)

pub mod config;
pub mod error;
mod frame_id;
mod page_id;

pub use config::PoolConfig;
pub use error::{Error, Result};
pub use frame_id::FrameId;
pub use page_id::PageId;
