// ChainedHashMap iteration properties over the public API.
//
// Property 1: global order.
//  - Model: keys with identity hashing, so bucket = key mod bucket_count.
//  - Invariant: iteration yields every live key once, sorted by bucket,
//    most recent insert first within a bucket.
//
// Property 2: cursor walk and iterator agree.
//  - Invariant: walking `begin()`/`next()` to the end yields the same
//    sequence as `iter()`, and its length equals `len()`.
//
// Property 3: erase by key.
//  - Invariant: erasing a present key removes exactly that entry and
//    leaves every other value unchanged; absent keys change nothing.
use chained_hashmap::{ChainedHashMap, DefaultEq};
use proptest::prelude::*;
use std::collections::HashMap;

type Identity = fn(&u64) -> u64;

fn identity_map(buckets: usize) -> ChainedHashMap<u64, u32, Identity, DefaultEq> {
    ChainedHashMap::with_buckets_hasher_and_eq(buckets, (|k: &u64| *k) as Identity, DefaultEq)
}

proptest! {
    #[test]
    fn prop_global_order(buckets in 0usize..16, keys in proptest::collection::vec(0u64..64, 0..60)) {
        let mut m = identity_map(buckets);
        let mut order: Vec<u64> = Vec::new();
        for (i, k) in keys.iter().enumerate() {
            if m.insert(*k, i as u32).1 {
                order.push(*k);
            }
        }
        let n = m.bucket_count() as u64;
        let mut expected: Vec<(u64, usize, u64)> = order
            .iter()
            .enumerate()
            .map(|(seq, k)| (k % n, usize::MAX - seq, *k))
            .collect();
        expected.sort();
        let expected: Vec<u64> = expected.into_iter().map(|(_, _, k)| k).collect();
        let got: Vec<u64> = m.keys().copied().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_cursor_walk_matches_iter(buckets in 0usize..16, keys in proptest::collection::vec(any::<u64>(), 0..60)) {
        let mut m = identity_map(buckets);
        m.extend(keys.into_iter().map(|k| (k, 0)));
        let mut walked = Vec::new();
        let mut c = m.begin();
        while !c.is_end() {
            walked.push(*c.key(&m).unwrap());
            c = c.next(&m);
        }
        let iterated: Vec<u64> = m.keys().copied().collect();
        prop_assert_eq!(walked.len(), m.len());
        prop_assert_eq!(walked, iterated);
    }

    #[test]
    fn prop_erase_key_is_precise(
        buckets in 0usize..16,
        keys in proptest::collection::vec(0u64..40, 0..40),
        target in 0u64..50,
    ) {
        let mut m = identity_map(buckets);
        let mut model: HashMap<u64, u32> = HashMap::new();
        for (i, k) in keys.into_iter().enumerate() {
            m.insert(k, i as u32);
            model.entry(k).or_insert(i as u32);
        }
        let present = model.remove(&target).is_some();
        let len_before = m.len();
        prop_assert_eq!(m.erase_key(&target), usize::from(present));
        prop_assert_eq!(m.len(), len_before - usize::from(present));
        prop_assert!(m.find(&target).is_end());
        for (k, v) in &model {
            prop_assert_eq!(m.get(k), Some(v));
        }
        prop_assert_eq!(m.len(), model.len());
    }
}
