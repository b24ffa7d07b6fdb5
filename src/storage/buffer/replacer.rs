//! Page replacement policies for the buffer pool.

use std::hash::Hash;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::trace;

/// Page replacement policy trait.
///
/// Tracks values (normally [`FrameId`](super::FrameId)s) eligible for
/// eviction. Values become evictable when unpinned and are removed from
/// candidates when pinned again.
///
/// # Usage Contract
///
/// - `insert(frame_id)`: Called when a frame becomes unpinned
/// - `erase(frame_id)`: Called when a frame becomes pinned
/// - `victim()`: Called only when no free frame is available
///
/// The replacer performs no cross-validation against real frame occupancy;
/// keeping the two consistent is the caller's job.
///
/// Methods take `&self`: implementations synchronize internally and must be
/// `Send + Sync` so a single replacer can be shared by the buffer pool's
/// threads.
pub trait Replacer<T>: Send + Sync {
    /// Marks `value` as most recently used, tracking it if it was not.
    fn insert(&self, value: T);

    /// Removes and returns the least recently used value, or `None` if
    /// nothing is tracked.
    fn victim(&self) -> Option<T>;

    /// Stops tracking `value`. Returns whether it was tracked.
    fn erase(&self, value: &T) -> bool;

    /// Returns the number of tracked values.
    fn size(&self) -> usize;
}

/// Arena index of the head sentinel (LRU end).
const HEAD: usize = 0;
/// Arena index of the tail sentinel (MRU end).
const TAIL: usize = 1;

/// A node in the arena-backed recency list.
///
/// Sentinels carry no value.
#[derive(Debug)]
struct RecencyNode<T> {
    value: Option<T>,
    prev: usize,
    next: usize,
}

/// Recency list: a doubly-linked list threaded through an arena of nodes,
/// plus a map from value to its node index.
///
/// Order runs from `HEAD` (least recently used) to `TAIL` (most recently
/// used). Freed node slots are recycled through `free`.
#[derive(Debug)]
struct RecencyList<T> {
    map: FxHashMap<T, usize>,
    nodes: Vec<RecencyNode<T>>,
    free: Vec<usize>,
}

impl<T: Hash + Eq + Clone> RecencyList<T> {
    fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity + 2);
        nodes.push(RecencyNode {
            value: None,
            prev: HEAD,
            next: TAIL,
        });
        nodes.push(RecencyNode {
            value: None,
            prev: HEAD,
            next: TAIL,
        });

        Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            nodes,
            free: Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    fn link_mru(&mut self, idx: usize) {
        let last = self.nodes[TAIL].prev;
        self.nodes[idx].prev = last;
        self.nodes[idx].next = TAIL;
        self.nodes[last].next = idx;
        self.nodes[TAIL].prev = idx;
    }

    fn allocate(&mut self, value: T) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx].value = Some(value);
                idx
            }
            None => {
                self.nodes.push(RecencyNode {
                    value: Some(value),
                    prev: HEAD,
                    next: TAIL,
                });
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, idx: usize) -> Option<T> {
        self.free.push(idx);
        self.nodes[idx].value.take()
    }

    fn touch(&mut self, value: T) {
        if let Some(&idx) = self.map.get(&value) {
            self.unlink(idx);
            self.link_mru(idx);
        } else {
            let idx = self.allocate(value.clone());
            self.link_mru(idx);
            self.map.insert(value, idx);
        }
    }

    fn pop_lru(&mut self) -> Option<T> {
        let idx = self.nodes[HEAD].next;
        if idx == TAIL {
            return None;
        }

        self.unlink(idx);
        let value = self.release(idx)?;
        self.map.remove(&value);
        Some(value)
    }

    fn remove(&mut self, value: &T) -> bool {
        match self.map.remove(value) {
            Some(idx) => {
                self.unlink(idx);
                self.release(idx);
                true
            }
            None => false,
        }
    }

    /// Values from LRU to MRU.
    #[cfg(test)]
    fn order(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len());
        let mut idx = self.nodes[HEAD].next;
        while idx != TAIL {
            out.extend(self.nodes[idx].value.clone());
            idx = self.nodes[idx].next;
        }
        out
    }
}

/// LRU (Least Recently Used) page replacement policy.
///
/// Evicts the least recently inserted value. Insert, victim and erase are
/// O(1): a hash map locates a value's node in an arena-backed doubly-linked
/// list, so a repeat insert relinks in place instead of scanning.
///
/// All operations serialize on a single lock. The list holds only small
/// recency metadata, so a finer-grained scheme would buy little and would
/// make the ordering guarantee harder to keep.
pub struct LruReplacer<T> {
    list: Mutex<RecencyList<T>>,
}

impl<T: Hash + Eq + Clone> LruReplacer<T> {
    /// Creates an empty LRU replacer.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new LRU replacer with pre-allocated capacity.
    ///
    /// The capacity is normally the buffer pool size; the replacer still
    /// grows past it if more values are inserted.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            list: Mutex::new(RecencyList::with_capacity(capacity)),
        }
    }

    /// Returns true if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.list.lock().len() == 0
    }
}

impl<T: Hash + Eq + Clone> Default for LruReplacer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for LruReplacer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruReplacer")
            .field("size", &self.list.lock().map.len())
            .finish()
    }
}

impl<T> Replacer<T> for LruReplacer<T>
where
    T: Hash + Eq + Clone + Send + std::fmt::Debug,
{
    fn insert(&self, value: T) {
        self.list.lock().touch(value);
    }

    fn victim(&self) -> Option<T> {
        let victim = self.list.lock().pop_lru();
        if let Some(value) = &victim {
            trace!(?value, "replacer victim");
        }
        victim
    }

    fn erase(&self, value: &T) -> bool {
        self.list.lock().remove(value)
    }

    fn size(&self) -> usize {
        self.list.lock().len()
    }
}
