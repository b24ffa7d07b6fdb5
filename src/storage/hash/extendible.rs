//! Extendible hash table.
//!
//! A directory of `2^global_depth` slots indexes buckets by the low-order
//! bits of a key's hash. A bucket with local depth `L` is shared by every
//! slot that agrees with it on the low `L` bits, i.e. by
//! `2^(global_depth - L)` slots. When a bucket overflows only that bucket is
//! split; the directory doubles (by duplicating slot pointers, never by
//! rehashing) only when the splitting bucket was already as deep as the
//! directory.
//!
//! ```text
//! global_depth = 2                  after splitting bucket A (depth 1):
//!
//!   slot 00 ──► A (L=1, prefix 0)     slot 00 ──► A  (L=2, prefix 00)
//!   slot 01 ──► B (L=1, prefix 1)     slot 01 ──► B  (L=1, prefix 1)
//!   slot 10 ──► A                     slot 10 ──► A' (L=2, prefix 10)
//!   slot 11 ──► B                     slot 11 ──► B
//! ```
//!
//! # Locking
//!
//! The directory lock guards the slot array, the global depth and the bucket
//! count. Each bucket's lock guards its entries and local depth. A bucket
//! lock may be held while taking the directory lock (a split does this to
//! grow and repoint slots); the directory lock is never held while taking a
//! bucket lock.
//!
//! Slot resolution therefore clones the bucket handle under the directory
//! lock, releases it, and only then locks the bucket. If a split moved the
//! key's hash range to a new bucket in between, the locked bucket no longer
//! owns the hash and the lookup resolves again.

use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::{FxBuildHasher, FxHashSet};
use tracing::{debug, trace};

use super::HashTable;
use super::bucket::{Bucket, BucketInner, low_bits};

/// Bucket capacity used by [`ExtendibleHashTable::default`].
pub const DEFAULT_BUCKET_CAPACITY: usize = 64;

/// Slot array and global counters, guarded together by the directory lock.
struct Directory<K, V> {
    slots: Vec<Arc<Bucket<K, V>>>,
    global_depth: u32,
    bucket_count: usize,
}

impl<K, V> Directory<K, V> {
    fn bucket_for(&self, hash: u64) -> Arc<Bucket<K, V>> {
        let slot = (hash & low_bits(self.global_depth)) as usize;
        Arc::clone(&self.slots[slot])
    }

    /// Doubles the slot array. Slot `i + n` starts out sharing slot `i`'s
    /// bucket.
    fn grow(&mut self) {
        self.slots.extend_from_within(..);
        self.global_depth += 1;
        debug!(
            global_depth = self.global_depth,
            slots = self.slots.len(),
            "directory doubled"
        );
    }
}

/// Thread-safe extendible hash table.
///
/// Used by the buffer pool as its page table (see
/// [`PageTable`](crate::storage::PageTable)), but generic over any hashable
/// key. Hashing goes through `S`, which defaults to the deterministic
/// [`FxBuildHasher`].
///
/// Buckets never merge: removing entries leaves the directory as deep as it
/// was.
///
/// # Limitations
///
/// Splitting separates keys only by their hash bits. If more than
/// `bucket_capacity` distinct keys share the same hash in every bit the
/// directory can reach, inserting them keeps splitting without end.
pub struct ExtendibleHashTable<K, V, S = FxBuildHasher> {
    directory: Mutex<Directory<K, V>>,
    bucket_capacity: usize,
    hash_builder: S,
}

impl<K: Hash + Eq, V> ExtendibleHashTable<K, V> {
    /// Creates a table whose buckets hold up to `bucket_capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `bucket_capacity` is 0.
    pub fn new(bucket_capacity: usize) -> Self {
        Self::with_hasher(bucket_capacity, FxBuildHasher::default())
    }
}

impl<K, V, S> ExtendibleHashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a table that hashes keys with `hash_builder`.
    ///
    /// The hasher must be deterministic for the lifetime of the table.
    ///
    /// # Panics
    ///
    /// Panics if `bucket_capacity` is 0.
    pub fn with_hasher(bucket_capacity: usize, hash_builder: S) -> Self {
        assert!(bucket_capacity > 0, "bucket_capacity must be > 0");

        let directory = Directory {
            slots: vec![Arc::new(Bucket::new(0, 0, Vec::with_capacity(bucket_capacity)))],
            global_depth: 0,
            bucket_count: 1,
        };

        Self {
            directory: Mutex::new(directory),
            bucket_capacity,
            hash_builder,
        }
    }

    fn hash<Q: Hash + ?Sized>(&self, key: &Q) -> u64 {
        self.hash_builder.hash_one(key)
    }

    /// Runs `f` on the bucket that owns `hash`, with the bucket locked.
    fn with_owner<R>(&self, hash: u64, f: impl FnOnce(&mut BucketInner<K, V>) -> R) -> R {
        loop {
            let bucket = self.directory.lock().bucket_for(hash);
            let mut inner = bucket.lock();
            if inner.owns(hash) {
                return f(&mut *inner);
            }
        }
    }

    /// Returns a copy of the value stored for `key`.
    pub fn find<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let hash = self.hash(key);
        self.with_owner(hash, |bucket| bucket.get(hash, key).cloned())
    }

    /// Returns true if `key` is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash(key);
        self.with_owner(hash, |bucket| bucket.position(hash, key).is_some())
    }

    /// Removes `key`. Returns whether it was present.
    ///
    /// The bucket is left in place even if it becomes empty.
    pub fn remove<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash(key);
        self.with_owner(hash, |bucket| bucket.remove(hash, key))
    }

    /// Inserts `value` for `key`, overwriting any previous value.
    ///
    /// A full bucket is split (doubling the directory if needed) until the
    /// key fits.
    pub fn insert(&self, key: K, value: V) {
        let hash = self.hash(&key);
        let mut pending = (key, value);

        loop {
            let bucket = self.directory.lock().bucket_for(hash);
            let mut inner = bucket.lock();
            if !inner.owns(hash) {
                continue;
            }

            let (key, value) = pending;
            match inner.try_insert(hash, key, value, self.bucket_capacity) {
                Ok(()) => return,
                Err(rejected) => {
                    pending = rejected;
                    self.split(&bucket, &mut *inner);
                }
            }
        }
    }

    /// Splits a full bucket in two.
    ///
    /// Entries are redistributed under the bucket lock first; the directory
    /// lock is then taken to grow the slot array if needed and to point the
    /// new bucket's slots at it.
    fn split(&self, bucket: &Arc<Bucket<K, V>>, inner: &mut BucketInner<K, V>) {
        let moved = inner.split_off();
        let depth = inner.local_depth;
        let sibling_prefix = inner.prefix | (1u64 << (depth - 1));
        let moved_count = moved.len();
        let sibling = Arc::new(Bucket::new(depth, sibling_prefix, moved));

        let mut directory = self.directory.lock();
        if depth > directory.global_depth {
            directory.grow();
        }

        // Slots agreeing with the sibling on the low `depth` bits.
        let stride = 1usize << depth;
        let len = directory.slots.len();
        for slot in (sibling_prefix as usize..len).step_by(stride) {
            debug_assert!(Arc::ptr_eq(&directory.slots[slot], bucket));
            directory.slots[slot] = Arc::clone(&sibling);
        }
        directory.bucket_count += 1;

        trace!(
            local_depth = depth,
            prefix = inner.prefix,
            moved = moved_count,
            kept = inner.entries.len(),
            "bucket split"
        );
    }

    /// Returns the number of hash bits indexing the directory.
    ///
    /// Never decreases.
    pub fn global_depth(&self) -> u32 {
        self.directory.lock().global_depth
    }

    /// Returns the number of distinct buckets.
    pub fn bucket_count(&self) -> usize {
        self.directory.lock().bucket_count
    }

    /// Returns the maximum number of entries per bucket.
    pub fn bucket_capacity(&self) -> usize {
        self.bucket_capacity
    }

    /// Returns the local depth of the bucket at directory slot `slot`.
    ///
    /// Returns `None` if `slot` is out of range **or** the bucket is empty:
    /// a bucket drained by [`remove`](Self::remove) reports the same as a
    /// bucket that was never created. Use
    /// [`slot_local_depth`](Self::slot_local_depth) for the raw depth.
    pub fn local_depth(&self, slot: usize) -> Option<u32> {
        let bucket = self.slot(slot)?;
        let inner = bucket.lock();
        if inner.entries.is_empty() {
            None
        } else {
            Some(inner.local_depth)
        }
    }

    /// Returns the local depth of the bucket at directory slot `slot`,
    /// whether or not it holds entries.
    pub fn slot_local_depth(&self, slot: usize) -> Option<u32> {
        let bucket = self.slot(slot)?;
        let depth = bucket.lock().local_depth;
        Some(depth)
    }

    fn slot(&self, slot: usize) -> Option<Arc<Bucket<K, V>>> {
        self.directory.lock().slots.get(slot).cloned()
    }

    /// Returns the number of stored entries.
    ///
    /// Buckets are counted one at a time, so under concurrent writes the
    /// result is not a snapshot.
    pub fn len(&self) -> usize {
        let slots = self.directory.lock().slots.clone();

        let mut seen = FxHashSet::default();
        slots
            .iter()
            .filter(|bucket| seen.insert(Arc::as_ptr(bucket)))
            .map(|bucket| bucket.lock().entries.len())
            .sum()
    }

    /// Returns true if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V, S> Default for ExtendibleHashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(DEFAULT_BUCKET_CAPACITY, S::default())
    }
}

impl<K, V, S> std::fmt::Debug for ExtendibleHashTable<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let directory = self.directory.lock();
        f.debug_struct("ExtendibleHashTable")
            .field("bucket_capacity", &self.bucket_capacity)
            .field("global_depth", &directory.global_depth)
            .field("bucket_count", &directory.bucket_count)
            .finish()
    }
}

impl<K, V, S> HashTable<K, V> for ExtendibleHashTable<K, V, S>
where
    K: Hash + Eq + Send,
    V: Clone + Send,
    S: BuildHasher + Send + Sync,
{
    fn find(&self, key: &K) -> Option<V> {
        ExtendibleHashTable::find(self, key)
    }

    fn insert(&self, key: K, value: V) {
        ExtendibleHashTable::insert(self, key, value)
    }

    fn remove(&self, key: &K) -> bool {
        ExtendibleHashTable::remove(self, key)
    }
}
