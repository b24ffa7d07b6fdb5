//! Integration tests for LruReplacer.

use std::sync::Arc;
use std::thread;

use pagecache::storage::buffer::{FrameId, LruReplacer, Replacer};

fn frame(id: u32) -> FrameId {
    FrameId::new(id)
}

#[test]
fn test_victims_in_insertion_order() {
    let replacer = LruReplacer::new();

    replacer.insert("a");
    replacer.insert("b");
    replacer.insert("c");

    assert_eq!(replacer.victim(), Some("a"));
    assert_eq!(replacer.victim(), Some("b"));
    assert_eq!(replacer.victim(), Some("c"));
    assert_eq!(replacer.victim(), None);
}

#[test]
fn test_reinsert_refreshes_recency() {
    let replacer = LruReplacer::new();

    replacer.insert("a");
    replacer.insert("b");
    replacer.insert("a");

    assert_eq!(replacer.size(), 2);
    assert_eq!(replacer.victim(), Some("b"));
    assert_eq!(replacer.victim(), Some("a"));
}

#[test]
fn test_erase_semantics() {
    let replacer = LruReplacer::with_capacity(4);
    replacer.insert(frame(1));
    replacer.insert(frame(2));

    // Untracked: nothing changes.
    assert!(!replacer.erase(&frame(9)));
    assert_eq!(replacer.size(), 2);

    // Tracked: removed for good.
    assert!(replacer.erase(&frame(1)));
    assert_eq!(replacer.size(), 1);
    assert_eq!(replacer.victim(), Some(frame(2)));
    assert_eq!(replacer.victim(), None);
}

#[test]
fn test_pin_unpin_cycle() {
    let replacer = LruReplacer::with_capacity(3);

    // Unpin
    replacer.insert(frame(0));
    assert_eq!(replacer.size(), 1);

    // Pin
    replacer.erase(&frame(0));
    assert_eq!(replacer.size(), 0);

    // Unpin again
    replacer.insert(frame(0));
    assert_eq!(replacer.size(), 1);

    assert_eq!(replacer.victim(), Some(frame(0)));
    assert!(replacer.is_empty());
}

#[test]
fn test_as_trait_object() {
    let replacer: Box<dyn Replacer<FrameId>> = Box::new(LruReplacer::<FrameId>::default());

    for id in 0..10 {
        replacer.insert(frame(id));
    }
    for id in (0..10).step_by(2) {
        assert!(replacer.erase(&frame(id)));
    }

    let victims: Vec<_> = std::iter::from_fn(|| replacer.victim()).collect();
    assert_eq!(victims, vec![frame(1), frame(3), frame(5), frame(7), frame(9)]);
}

#[test]
fn test_large_workload_keeps_order() {
    let replacer = LruReplacer::with_capacity(1000);

    for id in 0..1000 {
        replacer.insert(frame(id));
    }
    // Touch every third frame again; those move to the MRU end in order.
    for id in (0..1000).step_by(3) {
        replacer.insert(frame(id));
    }

    let untouched = (0..1000).filter(|id| id % 3 != 0);
    let touched = (0..1000).step_by(3);
    let expected: Vec<_> = untouched.chain(touched).map(frame).collect();

    let victims: Vec<_> = std::iter::from_fn(|| replacer.victim()).collect();
    assert_eq!(victims, expected);
}

#[test]
fn test_concurrent_insert_erase_victim() {
    let replacer = Arc::new(LruReplacer::with_capacity(800));

    let mut handles = Vec::new();
    for t in 0..8u32 {
        let replacer = Arc::clone(&replacer);
        handles.push(thread::spawn(move || {
            let base = t * 100;
            for i in 0..100 {
                replacer.insert(frame(base + i));
            }
            // Pin the odd frames of this range again.
            for i in (1..100).step_by(2) {
                assert!(replacer.erase(&frame(base + i)));
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(replacer.size(), 400);

    let mut victims: Vec<_> = std::iter::from_fn(|| replacer.victim()).collect();
    victims.sort();
    let expected: Vec<_> = (0..800).filter(|id| id % 2 == 0).map(frame).collect();
    assert_eq!(victims, expected);
}
