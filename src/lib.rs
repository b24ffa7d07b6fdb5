pub mod config;
pub mod storage;

pub use config::{ConfigError, PageCacheConfig};
