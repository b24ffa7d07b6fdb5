//! Fixed-capacity buckets for the extendible hash table.

use std::borrow::Borrow;

use parking_lot::{Mutex, MutexGuard};

/// A key-value pair together with the key's full hash.
///
/// The hash is kept so a split can redistribute entries without rehashing.
#[derive(Debug)]
pub(super) struct Entry<K, V> {
    pub(super) hash: u64,
    pub(super) key: K,
    pub(super) value: V,
}

/// A bucket shared by one or more directory slots.
///
/// The lock protects the entries together with the depth bookkeeping, so
/// a split is atomic with respect to anyone holding the bucket.
#[derive(Debug)]
pub(super) struct Bucket<K, V> {
    inner: Mutex<BucketInner<K, V>>,
}

/// Contents of a bucket.
#[derive(Debug)]
pub(super) struct BucketInner<K, V> {
    /// Stored entries. Order is irrelevant.
    pub(super) entries: Vec<Entry<K, V>>,

    /// Number of low-order hash bits shared by every key this bucket owns.
    pub(super) local_depth: u32,

    /// The shared low-order bits themselves (`local_depth` bits wide).
    pub(super) prefix: u64,
}

impl<K, V> Bucket<K, V> {
    pub(super) fn new(local_depth: u32, prefix: u64, entries: Vec<Entry<K, V>>) -> Self {
        Self {
            inner: Mutex::new(BucketInner {
                entries,
                local_depth,
                prefix,
            }),
        }
    }

    pub(super) fn lock(&self) -> MutexGuard<'_, BucketInner<K, V>> {
        self.inner.lock()
    }
}

/// Returns a mask selecting the low `depth` bits of a hash.
pub(super) const fn low_bits(depth: u32) -> u64 {
    if depth >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << depth) - 1
    }
}

impl<K: Eq, V> BucketInner<K, V> {
    /// Returns true if a key with this hash belongs in this bucket.
    ///
    /// A caller that resolved its slot before a concurrent split may end up
    /// holding a bucket that no longer owns the key's hash range; it must
    /// then resolve again.
    pub(super) fn owns(&self, hash: u64) -> bool {
        hash & low_bits(self.local_depth) == self.prefix
    }

    pub(super) fn position<Q>(&self, hash: u64, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.entries
            .iter()
            .position(|e| e.hash == hash && e.key.borrow() == key)
    }

    pub(super) fn get<Q>(&self, hash: u64, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.position(hash, key).map(|i| &self.entries[i].value)
    }

    pub(super) fn remove<Q>(&mut self, hash: u64, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        match self.position(hash, key) {
            Some(i) => {
                self.entries.swap_remove(i);
                true
            }
            None => false,
        }
    }

    /// Stores the entry if the key is present or there is room.
    ///
    /// Hands the key and value back when the bucket is full and the key is
    /// new, in which case the bucket must be split first.
    pub(super) fn try_insert(
        &mut self,
        hash: u64,
        key: K,
        value: V,
        capacity: usize,
    ) -> Result<(), (K, V)> {
        if let Some(i) = self.position(hash, &key) {
            self.entries[i].value = value;
            return Ok(());
        }
        if self.entries.len() < capacity {
            self.entries.push(Entry { hash, key, value });
            return Ok(());
        }
        Err((key, value))
    }

    /// Deepens this bucket by one bit and moves out every entry whose hash
    /// has the newly significant bit set.
    ///
    /// Returns the moved entries; they form the new sibling bucket, whose
    /// prefix is this bucket's prefix with the new bit set.
    pub(super) fn split_off(&mut self) -> Vec<Entry<K, V>> {
        let high_bit = 1u64 << self.local_depth;
        self.local_depth += 1;

        let (moved, kept): (Vec<_>, Vec<_>) = self
            .entries
            .drain(..)
            .partition(|e| e.hash & high_bit != 0);
        self.entries = kept;
        moved
    }
}
