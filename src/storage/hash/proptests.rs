use std::collections::HashMap;

use proptest::prelude::*;

use super::extendible::tests::{assert_directory_invariants, identity_table};
use super::ExtendibleHashTable;

#[derive(Debug, Clone)]
enum Op {
    Insert(u64, u32),
    Remove(u64),
    Find(u64),
}

/// Keys that either spread over the low bits or pile up on a shared
/// low-bit pattern, forcing repeated splits of one bucket.
fn key() -> impl Strategy<Value = u64> {
    prop_oneof![0u64..64, (0u64..32).prop_map(|k| (k << 6) | 0b101)]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (key(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        1 => key().prop_map(Op::Remove),
        2 => key().prop_map(Op::Find),
    ]
}

proptest! {
    #[test]
    fn matches_hashmap_model(capacity in 1usize..6, ops in prop::collection::vec(op(), 1..200)) {
        let table = identity_table(capacity);
        let mut model = HashMap::new();
        let mut depth = table.global_depth();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    table.insert(k, v);
                    model.insert(k, v);
                }
                Op::Remove(k) => {
                    prop_assert_eq!(table.remove(&k), model.remove(&k).is_some());
                }
                Op::Find(k) => {
                    prop_assert_eq!(table.find(&k), model.get(&k).copied());
                }
            }

            let now = table.global_depth();
            prop_assert!(now >= depth, "global depth went from {} to {}", depth, now);
            depth = now;
        }

        prop_assert_eq!(table.len(), model.len());
        for (k, v) in &model {
            prop_assert_eq!(table.find(k), Some(*v));
        }
        assert_directory_invariants(&table);
    }

    #[test]
    fn reinsert_is_idempotent(keys in prop::collection::hash_set(key(), 1..40)) {
        let table = identity_table(2);
        for &k in &keys {
            table.insert(k, k);
        }
        let buckets = table.bucket_count();
        let depth = table.global_depth();

        for &k in &keys {
            table.insert(k, k);
        }
        prop_assert_eq!(table.bucket_count(), buckets);
        prop_assert_eq!(table.global_depth(), depth);
    }

    #[test]
    fn default_hasher_round_trip(entries in prop::collection::vec((any::<u64>(), any::<i64>()), 0..300)) {
        let table = ExtendibleHashTable::new(3);
        let mut model = HashMap::new();
        for (k, v) in entries {
            table.insert(k, v);
            model.insert(k, v);
        }

        for (k, v) in &model {
            prop_assert_eq!(table.find(k), Some(*v));
        }
        assert_directory_invariants(&table);
    }
}
