//! Configuration for framepool.

/// Size of a page in bytes (4KB).
///
/// Chosen to match the OS page size on most systems and common database
/// page sizes. Pages are aligned to this size for efficient direct I/O.
pub const PAGE_SIZE: usize = 4096;

/// Default number of frames in a pool when none is specified.
pub const DEFAULT_POOL_SIZE: usize = 64;

/// Construction-time configuration for a [`BufferPool`].
///
/// All pool tuning lives here rather than in process-wide globals; a pool
/// instance owns its configuration for its whole lifetime and never grows.
///
/// [`BufferPool`]: crate::buffer::BufferPool
///
/// # Example
/// ```
/// use framepool::PoolConfig;
///
/// let config = PoolConfig::new(16);
/// assert_eq!(config.pool_size, 16);
/// assert_eq!(PoolConfig::default().pool_size, framepool::common::config::DEFAULT_POOL_SIZE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of frames the pool allocates at construction. Must be ≥ 1.
    pub pool_size: usize,
}

impl PoolConfig {
    /// Create a configuration with the given frame count.
    pub fn new(pool_size: usize) -> Self {
        Self { pool_size }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_is_power_of_two() {
        assert!(PAGE_SIZE.is_power_of_two());
        assert_eq!(PAGE_SIZE, 4096);
    }

    #[test]
    fn test_default_config() {
        assert_eq!(PoolConfig::default().pool_size, DEFAULT_POOL_SIZE);
        assert_eq!(PoolConfig::new(8).pool_size, 8);
    }
}
