//! Property-Based Tests for Storage Module
//!
//! Uses proptest to check storage operations against simple models.

use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

use crate::storage::Storage;

// == Test Configuration ==
const LONG_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
/// Generates keys made of letters, digits and a separator
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-c0-2:]{1,8}".prop_map(|s| s)
}

/// Generates TTLs that will not elapse during a test case
fn ttl_strategy() -> impl Strategy<Value = Duration> {
    prop_oneof![Just(Duration::ZERO), Just(LONG_TTL)]
}

/// Generates a sequence of storage operations for testing
#[derive(Debug, Clone)]
enum StorageOp {
    Set { key: String, value: u32 },
    Get { key: String },
    Rem { key: String },
    Flush { prefix: String },
}

fn storage_op_strategy() -> impl Strategy<Value = StorageOp> {
    prop_oneof![
        (key_strategy(), any::<u32>()).prop_map(|(key, value)| StorageOp::Set { key, value }),
        key_strategy().prop_map(|key| StorageOp::Get { key }),
        key_strategy().prop_map(|key| StorageOp::Rem { key }),
        "[a-c]{0,2}".prop_map(|prefix| StorageOp::Flush { prefix }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any key and value, Set followed by Get returns the stored value.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in any::<u64>(), ttl in ttl_strategy()) {
        let storage = Storage::new();

        storage.set(key.clone(), value, ttl);

        prop_assert_eq!(storage.get(&key), Some(value));
    }

    // A second Set on the same key replaces the first value.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        value1 in any::<u32>(),
        value2 in any::<u32>()
    ) {
        let storage = Storage::new();

        storage.set(key.clone(), value1, LONG_TTL);
        storage.set(key.clone(), value2, Duration::ZERO);

        prop_assert_eq!(storage.get(&key), Some(value2));
        prop_assert_eq!(storage.len(), 1, "Should have exactly one entry after overwrite");
        prop_assert!(storage.expiration(&key).is_none());
    }

    // Rem returns the stored value once, then reports the key as missing.
    #[test]
    fn prop_rem_removes_entry(key in key_strategy(), value in any::<u32>()) {
        let storage = Storage::new();

        storage.set(key.clone(), value, LONG_TTL);

        prop_assert_eq!(storage.rem(&key), Some(value));
        prop_assert_eq!(storage.rem(&key), None);
        prop_assert_eq!(storage.get(&key), None);
    }

    // Any sequence of operations leaves the storage agreeing with a HashMap.
    #[test]
    fn prop_operations_match_model(ops in prop::collection::vec(storage_op_strategy(), 1..60)) {
        let storage = Storage::new();
        let mut model: HashMap<String, u32> = HashMap::new();

        for op in ops {
            match op {
                StorageOp::Set { key, value } => {
                    storage.set(key.clone(), value, LONG_TTL);
                    model.insert(key, value);
                }
                StorageOp::Get { key } => {
                    prop_assert_eq!(storage.get(&key), model.get(&key).copied());
                }
                StorageOp::Rem { key } => {
                    prop_assert_eq!(storage.rem(&key), model.remove(&key));
                }
                StorageOp::Flush { prefix } => {
                    storage.flush(&prefix);
                    model.retain(|key, _| !key.starts_with(&prefix));
                }
            }
            prop_assert_eq!(storage.len(), model.len());
        }
    }

    // Keys only reports keys the pattern matches from start to end.
    #[test]
    fn prop_keys_match_whole_key(keys in prop::collection::hash_set(key_strategy(), 0..20)) {
        let storage = Storage::new();
        for key in &keys {
            storage.set(key.clone(), (), Duration::ZERO);
        }

        let mut digits = storage.keys("[0-9]+").unwrap();
        digits.sort();
        let mut expected: Vec<String> = keys
            .iter()
            .filter(|key| key.chars().all(|c| c.is_ascii_digit()))
            .cloned()
            .collect();
        expected.sort();
        prop_assert_eq!(digits, expected);

        let mut namespaced = storage.keys("a.*").unwrap();
        namespaced.sort();
        let mut expected: Vec<String> = keys
            .iter()
            .filter(|key| key.starts_with('a'))
            .cloned()
            .collect();
        expected.sort();
        prop_assert_eq!(namespaced, expected);
    }

    // Flush removes exactly the keys that start with the prefix.
    #[test]
    fn prop_flush_prefix(
        keys in prop::collection::hash_set(key_strategy(), 0..20),
        prefix in "[a-c0-2:]{0,3}"
    ) {
        let storage = Storage::new();
        for key in &keys {
            storage.set(key.clone(), (), LONG_TTL);
        }

        storage.flush(&prefix);

        for key in &keys {
            let kept = storage.get(key).is_some();
            prop_assert_eq!(kept, !key.starts_with(prefix.as_str()), "key {:?}", key);
        }
    }
}
