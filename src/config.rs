//! Page cache configuration.
//!
//! Settings come from defaults, optionally overridden by environment
//! variables:
//!
//! | Variable                    | Setting           | Default |
//! |-----------------------------|-------------------|---------|
//! | `PAGECACHE_BUCKET_CAPACITY` | `bucket_capacity` | 64      |
//! | `PAGECACHE_POOL_SIZE`       | `pool_size`       | 1000    |

mod error;

use tracing::debug;

pub use error::ConfigError;

use crate::storage::PageTable;
use crate::storage::buffer::{FrameId, LruReplacer};
use crate::storage::hash::DEFAULT_BUCKET_CAPACITY;

/// Environment variable overriding [`PageCacheConfig::bucket_capacity`].
pub const BUCKET_CAPACITY_ENV: &str = "PAGECACHE_BUCKET_CAPACITY";

/// Environment variable overriding [`PageCacheConfig::pool_size`].
pub const POOL_SIZE_ENV: &str = "PAGECACHE_POOL_SIZE";

/// Default number of frames in the buffer pool.
pub const DEFAULT_POOL_SIZE: usize = 1000;

/// Sizing for the page table and replacer of one buffer pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCacheConfig {
    /// Entries per page table bucket.
    pub bucket_capacity: usize,

    /// Number of frames in the buffer pool; the replacer is pre-sized to it.
    pub pool_size: usize,
}

impl Default for PageCacheConfig {
    fn default() -> Self {
        Self {
            bucket_capacity: DEFAULT_BUCKET_CAPACITY,
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

impl PageCacheConfig {
    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// - `ConfigError::InvalidValue` if a variable is set but not a number
    /// - `ConfigError::ZeroBucketCapacity` / `ConfigError::ZeroPoolSize` if
    ///   a setting is 0
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration, reading variables through `lookup`.
    ///
    /// Unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            bucket_capacity: parse_var(&lookup, BUCKET_CAPACITY_ENV, defaults.bucket_capacity)?,
            pool_size: parse_var(&lookup, POOL_SIZE_ENV, defaults.pool_size)?,
        };
        config.validate()?;

        debug!(
            bucket_capacity = config.bucket_capacity,
            pool_size = config.pool_size,
            "page cache configuration loaded"
        );
        Ok(config)
    }

    /// Checks that every setting is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bucket_capacity == 0 {
            return Err(ConfigError::ZeroBucketCapacity);
        }
        if self.pool_size == 0 {
            return Err(ConfigError::ZeroPoolSize);
        }
        Ok(())
    }

    /// Creates an empty page table with the configured bucket capacity.
    pub fn page_table(&self) -> Result<PageTable, ConfigError> {
        self.validate()?;
        Ok(PageTable::new(self.bucket_capacity))
    }

    /// Creates an empty replacer pre-sized for the configured pool.
    pub fn replacer(&self) -> Result<LruReplacer<FrameId>, ConfigError> {
        self.validate()?;
        Ok(LruReplacer::with_capacity(self.pool_size))
    }
}

fn parse_var<F>(lookup: &F, key: &str, default: usize) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}
