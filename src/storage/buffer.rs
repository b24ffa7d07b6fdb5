//! Eviction bookkeeping for the buffer pool.
//!
//! The buffer pool caches pages in a fixed number of frames. When every
//! frame is occupied it asks a [`Replacer`] for a victim among the unpinned
//! frames.
//!
//! # Components
//!
//! - [`FrameId`]: Identity of a frame in the pool
//! - [`Replacer`]: Trait for page replacement policies
//! - [`LruReplacer`]: LRU (Least Recently Used) implementation
//!
//! # Example
//!
//! ```
//! use pagecache::storage::buffer::{FrameId, LruReplacer, Replacer};
//!
//! let replacer = LruReplacer::with_capacity(3);
//!
//! // Frames are unpinned in this order...
//! replacer.insert(FrameId::new(0));
//! replacer.insert(FrameId::new(1));
//! replacer.insert(FrameId::new(2));
//!
//! // ...then frame 0 is pinned again.
//! assert!(replacer.erase(&FrameId::new(0)));
//!
//! assert_eq!(replacer.victim(), Some(FrameId::new(1)));
//! assert_eq!(replacer.size(), 1);
//! ```

mod frame;
mod replacer;

pub use frame::FrameId;
pub use replacer::{LruReplacer, Replacer};
