//! Page buffers and the page store boundary.
//!
//! The buffer pool consumes a [`PageStore`] for all durable I/O; it never
//! touches files itself. [`FilePageStore`] is the standard single-file
//! implementation.

mod file_store;
mod page;
mod store;

pub use file_store::FilePageStore;
pub use page::Page;
pub use store::PageStore;
