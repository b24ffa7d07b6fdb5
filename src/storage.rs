//! In-memory core of the page cache.
//!
//! A buffer pool manager keeps disk pages in a fixed set of memory frames.
//! This layer provides the two lookup structures it is built on; the manager
//! itself (frame allocation, disk I/O, pin counting, dirty flush) lives
//! outside this crate.
//!
//! # Architecture
//!
//! ```text
//! +-------------------------------+
//! | Buffer Pool Manager (caller)  |
//! +-------------------------------+
//!       |                  |
//!       | PageId -> FrameId| FrameId
//!       v                  v
//! +---------------+  +--------------+
//! | PageTable     |  | LruReplacer  |
//! | (extendible   |  | (eviction    |
//! |  hash table)  |  |  candidates) |
//! +---------------+  +--------------+
//! ```
//!
//! # Collaborator Contract
//!
//! - Pinning a frame: `replacer.erase(&frame_id)`
//! - Unpinning a frame: `replacer.insert(frame_id)`
//! - No free frame: `replacer.victim()`, then `page_table.remove(&old_page)`
//! - Loading a page: `page_table.insert(page_id, frame_id)`
//!
//! # Example
//!
//! ```
//! use pagecache::storage::buffer::{FrameId, LruReplacer, Replacer};
//! use pagecache::storage::{PageId, PageTable};
//!
//! let page_table = PageTable::new(4);
//! let replacer = LruReplacer::with_capacity(2);
//!
//! page_table.insert(PageId::new(10), FrameId::new(0));
//! page_table.insert(PageId::new(11), FrameId::new(1));
//! replacer.insert(FrameId::new(0));
//! replacer.insert(FrameId::new(1));
//!
//! // Reclaim a frame for a new page.
//! let frame = replacer.victim().unwrap();
//! assert_eq!(frame, FrameId::new(0));
//! assert!(page_table.remove(&PageId::new(10)));
//! page_table.insert(PageId::new(12), frame);
//!
//! assert_eq!(page_table.find(&PageId::new(12)), Some(FrameId::new(0)));
//! ```

pub mod buffer;
pub mod hash;
pub mod page;

pub use hash::{ExtendibleHashTable, HashTable};
pub use page::{INVALID_PAGE_ID, PageId};

/// Page table: maps a resident page to the frame holding it.
pub type PageTable = ExtendibleHashTable<PageId, buffer::FrameId>;
