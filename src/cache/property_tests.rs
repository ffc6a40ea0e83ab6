//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check key canonicalization and store behaviour against a
//! plain HashMap model.

use proptest::prelude::*;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::cache::{build_key, CachePolicy, TtlCache};

// == Test Configuration ==
const LONG_TTL: f64 = 3600.0;

// == Strategies ==
fn arg_name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_]{0,11}"
}

fn operation_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9]{0,15}"
}

/// Leaf JSON values an argument bag typically carries.
fn leaf_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 |:]{0,16}".prop_map(Value::from),
        prop::collection::vec("[A-Za-z]{1,8}", 0..4).prop_map(Value::from),
    ]
}

fn args_strategy() -> impl Strategy<Value = Vec<(String, Value)>> {
    prop::collection::hash_map(arg_name_strategy(), leaf_value_strategy(), 0..8)
        .prop_map(|m| m.into_iter().collect())
}

fn to_map(pairs: impl IntoIterator<Item = (String, Value)>) -> Map<String, Value> {
    pairs.into_iter().collect()
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: u32 },
    Get { key: String },
    Delete { key: String },
    Clear,
}

fn cache_key_strategy() -> impl Strategy<Value = String> {
    "[a-e]{1,2}"
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (cache_key_strategy(), any::<u32>())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        4 => cache_key_strategy().prop_map(|key| CacheOp::Get { key }),
        2 => cache_key_strategy().prop_map(|key| CacheOp::Delete { key }),
        1 => Just(CacheOp::Clear),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Insertion order of arguments never changes the key.
    #[test]
    fn prop_key_order_independent(op in operation_strategy(), pairs in args_strategy()) {
        let forward = to_map(pairs.clone());
        let reversed = to_map(pairs.into_iter().rev());

        prop_assert_eq!(build_key(&op, &forward).unwrap(), build_key(&op, &reversed).unwrap());
    }

    // Same arguments under different operation names never share a key.
    #[test]
    fn prop_key_separates_operations(
        a in operation_strategy(),
        b in operation_strategy(),
        pairs in args_strategy(),
    ) {
        prop_assume!(a != b);
        let args = to_map(pairs);

        prop_assert_ne!(build_key(&a, &args).unwrap(), build_key(&b, &args).unwrap());
    }

    // Changing one integer argument changes the key.
    #[test]
    fn prop_key_separates_values(
        op in operation_strategy(),
        name in arg_name_strategy(),
        x in any::<i64>(),
        y in any::<i64>(),
    ) {
        prop_assume!(x != y);
        let first = to_map([(name.clone(), Value::from(x))]);
        let second = to_map([(name, Value::from(y))]);

        prop_assert_ne!(build_key(&op, &first).unwrap(), build_key(&op, &second).unwrap());
    }

    // The key always starts with the operation name followed by ':'.
    #[test]
    fn prop_key_prefixed_by_operation(op in operation_strategy(), pairs in args_strategy()) {
        let key = build_key(&op, &to_map(pairs)).unwrap();
        let prefix = format!("{}:", op);
        prop_assert!(key.starts_with(&prefix));
    }

    // Without expiry in play, the cache behaves exactly like a HashMap.
    #[test]
    fn prop_store_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let cache: TtlCache<u32> = TtlCache::new();
        let mut model: HashMap<String, u32> = HashMap::new();
        let mut expected_hits = 0u64;
        let mut expected_misses = 0u64;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(key.clone(), value, LONG_TTL).unwrap();
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    let got = cache.get(&key);
                    prop_assert_eq!(got, model.get(&key).copied());
                    if got.is_some() {
                        expected_hits += 1;
                    } else {
                        expected_misses += 1;
                    }
                }
                CacheOp::Delete { key } => {
                    prop_assert_eq!(cache.delete(&key), model.remove(&key).is_some());
                }
                CacheOp::Clear => {
                    cache.clear();
                    model.clear();
                }
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.total_entries, model.len());
        prop_assert_eq!(stats.active_entries, model.len());
        prop_assert_eq!(stats.expired_entries, 0);
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
    }

    // Only successful fetches are stored; every failure leads to a retry.
    #[test]
    fn prop_failures_never_cached(outcomes in prop::collection::vec(any::<bool>(), 1..12)) {
        let cache: TtlCache<u32> = TtlCache::new();
        let calls = &AtomicUsize::new(0);
        let policy = CachePolicy::from_secs(LONG_TTL).unwrap();

        let first_success = outcomes.iter().position(|ok| *ok);

        for (i, ok) in outcomes.iter().copied().enumerate() {
            let result = tokio_test::block_on(cache.get_or_try_insert_with(
                "op:",
                policy,
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    if ok { Ok(i as u32) } else { Err("boom") }
                },
            ));

            match first_success {
                Some(s) if i >= s => prop_assert_eq!(result, Ok(s as u32)),
                _ => prop_assert_eq!(result, Err("boom")),
            }
        }

        let expected_calls = match first_success {
            Some(s) => s + 1,
            None => outcomes.len(),
        };
        prop_assert_eq!(calls.load(Ordering::SeqCst), expected_calls);
        prop_assert_eq!(cache.len(), usize::from(first_success.is_some()));
    }
}

// == Concurrent Access ==
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    // Readers on other threads only ever see a value some writer stored.
    #[test]
    fn prop_concurrent_values_are_whole(values in prop::collection::vec(1u32..1000, 1..20)) {
        let cache: Arc<TtlCache<(u32, u32)>> = Arc::new(TtlCache::new());

        let writers: Vec<_> = values
            .iter()
            .copied()
            .map(|v| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    cache.set("shared", (v, v * 2), LONG_TTL).unwrap();
                })
            })
            .collect();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    (0..50).filter_map(|_| cache.get("shared")).collect::<Vec<_>>()
                })
            })
            .collect();

        for writer in writers {
            writer.join().unwrap();
        }
        for reader in readers {
            for (a, b) in reader.join().unwrap() {
                prop_assert_eq!(b, a * 2);
                prop_assert!(values.contains(&a));
            }
        }

        prop_assert_eq!(cache.len(), 1);
    }
}
