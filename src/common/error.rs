//! Error types for framepool.

use thiserror::Error;

use crate::common::{FrameId, PageId};

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in framepool.
///
/// Every error is reported to the immediate caller; the pool never retries
/// and remains usable afterwards. Store failures are chained unaltered.
#[derive(Debug, Error)]
pub enum Error {
    /// The page store reported an I/O failure on read/write/allocate/deallocate.
    #[error("page store I/O error")]
    Io(#[from] std::io::Error),

    /// The store was asked for a page outside its allocated range.
    #[error("page {0} is outside the store's allocated range")]
    OutOfRange(PageId),

    /// Operation referenced a page that is not currently resident in the pool.
    #[error("page {0} is not resident in the buffer pool")]
    NotResident(PageId),

    /// Unpin called on a page whose pin count is already zero.
    #[error("pin count underflow: page {0} is not pinned")]
    PinCount(PageId),

    /// No empty frame and no eviction candidate: every resident frame is pinned.
    #[error("buffer pool exhausted: all frames are pinned")]
    PoolExhausted,

    /// Free requested on a page that is still pinned (or not resident at all).
    #[error("cannot free page {0}: still pinned or not resident")]
    FreePinned(PageId),

    /// An unpinned resident frame was missing from both candidate lists.
    ///
    /// This is a bookkeeping defect in the pool itself, not a normal
    /// runtime condition; it gets a distinct kind so tests can detect it.
    #[error("frame {0} missing from the eviction candidate lists")]
    CandidateMissing(FrameId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotResident(PageId::new(42));
        assert_eq!(
            format!("{}", err),
            "page Page(42) is not resident in the buffer pool"
        );

        let err = Error::PoolExhausted;
        assert_eq!(
            format!("{}", err),
            "buffer pool exhausted: all frames are pinned"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        match err {
            Error::Io(_) => {}
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_io_error_source_is_chained() {
        use std::error::Error as _;

        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err: Error = io_err.into();
        assert!(err.source().is_some());
    }
}
