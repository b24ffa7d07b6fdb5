//! Configuration errors.

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Buckets must hold at least one entry.
    ///
    /// A zero-capacity bucket can never accept a key, so every insert would
    /// split forever.
    ZeroBucketCapacity,

    /// The buffer pool must have at least one frame.
    ZeroPoolSize,

    /// A setting could not be parsed.
    InvalidValue {
        /// Name of the setting (environment variable).
        key: String,
        /// The raw value that failed to parse.
        value: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ZeroBucketCapacity => write!(f, "bucket capacity must be > 0"),
            ConfigError::ZeroPoolSize => write!(f, "pool size must be > 0"),
            ConfigError::InvalidValue { key, value } => {
                write!(f, "invalid value for {}: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
