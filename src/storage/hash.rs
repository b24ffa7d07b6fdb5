//! Concurrent hash tables for in-memory lookup structures.
//!
//! # Components
//!
//! - [`HashTable`]: Trait for the page table interface
//! - [`ExtendibleHashTable`]: Extendible hashing with per-bucket locks
//!
//! The buffer pool uses a hash table as its page table, mapping
//! [`PageId`](crate::storage::PageId) to the
//! [`FrameId`](crate::storage::buffer::FrameId) holding the page. It stays
//! responsible for keeping entries consistent with real frame occupancy.

mod bucket;
mod extendible;
#[cfg(test)]
mod proptests;

pub use extendible::{DEFAULT_BUCKET_CAPACITY, ExtendibleHashTable};

/// Thread-safe key-value table.
///
/// Every operation is total: a missing key is reported through the return
/// value and leaves the table unchanged.
pub trait HashTable<K, V>: Send + Sync {
    /// Returns the value stored for `key`.
    fn find(&self, key: &K) -> Option<V>;

    /// Stores `value` for `key`, replacing any previous value.
    fn insert(&self, key: K, value: V);

    /// Removes `key`. Returns whether it was present.
    fn remove(&self, key: &K) -> bool;
}
