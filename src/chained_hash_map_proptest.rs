#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can
// check the internal chain invariants after every operation.

use crate::chained_hash_map::ChainedHashMap;
use crate::cursor::Cursor;
use crate::hash_functions::{Fnv1aHash, KeyHasher, PolynomialRollingHash, StdHash};
use crate::key_eq::DefaultEq;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    Upsert(usize, i32),
    EraseKey(usize),
    EraseAtCursor(usize),
    Find(usize),
    Mutate(usize, i32),
    Iterate,
    Clear,
}

// Pool-indexed operations so shrinking moves toward earlier keys.
fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<Op>)> {
    (
        0usize..12,
        proptest::collection::vec("[a-z]{0,4}", 1..=10),
    )
        .prop_flat_map(|(buckets, pool)| {
            let idx = 0..pool.len();
            let op = prop_oneof![
                4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
                2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Upsert(i, v)),
                2 => idx.clone().prop_map(Op::EraseKey),
                2 => (0usize..16).prop_map(Op::EraseAtCursor),
                2 => idx.clone().prop_map(Op::Find),
                1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
                1 => Just(Op::Iterate),
                1 => Just(Op::Clear),
            ];
            proptest::collection::vec(op, 1..80)
                .prop_map(move |ops| (buckets, pool.clone(), ops))
        })
}

/// Expected global order: ascending bucket, most recent insert first.
fn expected_order<H: KeyHasher<String>>(
    hasher: &H,
    bucket_count: usize,
    inserted: &[String],
) -> Vec<String> {
    let mut order: Vec<(usize, usize, String)> = inserted
        .iter()
        .enumerate()
        .map(|(seq, k)| {
            let bucket = (hasher.hash_key(k) % bucket_count as u64) as usize;
            (bucket, usize::MAX - seq, k.clone())
        })
        .collect();
    order.sort();
    order.into_iter().map(|(_, _, k)| k).collect()
}

fn run_state_machine<H>(
    sut: &mut ChainedHashMap<String, i32, H, DefaultEq>,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError>
where
    H: KeyHasher<String> + KeyHasher<str>,
{
    let mut model: HashMap<String, i32> = HashMap::new();
    // Live keys in insertion order, to predict iteration order.
    let mut inserted: Vec<String> = Vec::new();

    for op in ops {
        match op {
            Op::Insert(i, v) => {
                let k = pool[i].clone();
                let already = model.contains_key(&k);
                let (c, fresh) = sut.insert(k.clone(), v);
                prop_assert_eq!(fresh, !already);
                if fresh {
                    model.insert(k.clone(), v);
                    inserted.push(k.clone());
                }
                prop_assert_eq!(c.key(sut), Some(&k));
                prop_assert_eq!(c.value(sut), model.get(&k));
            }
            Op::Upsert(i, v) => {
                let k = pool[i].clone();
                if !model.contains_key(&k) {
                    inserted.push(k.clone());
                }
                *sut.get_or_insert_default(k.clone()) = v;
                model.insert(k, v);
            }
            Op::EraseKey(i) => {
                let k = &pool[i];
                let removed = sut.erase_key(k.as_str());
                prop_assert_eq!(removed, usize::from(model.remove(k).is_some()));
                inserted.retain(|x| x != k);
            }
            Op::EraseAtCursor(n) => {
                if model.is_empty() {
                    prop_assert!(sut.erase(sut.begin()).is_end());
                    continue;
                }
                let mut c = sut.begin();
                for _ in 0..n % model.len() {
                    c = c.next(sut);
                }
                let expected_next = c.next(sut);
                let k = c.key(sut).cloned().expect("cursor within len is live");
                let next = sut.erase(c);
                prop_assert_eq!(next, expected_next);
                prop_assert!(c.key(sut).is_none(), "erased cursor must not resolve");
                model.remove(&k);
                inserted.retain(|x| *x != k);
            }
            Op::Find(i) => {
                let k = &pool[i];
                let c = sut.find(k.as_str());
                prop_assert_eq!(c.value(sut), model.get(k));
                prop_assert_eq!(c.is_end(), !model.contains_key(k));
            }
            Op::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(v) = sut.get_mut(k.as_str()) {
                    *v = v.wrapping_add(d);
                }
                if let Some(v) = model.get_mut(k) {
                    *v = v.wrapping_add(d);
                }
            }
            Op::Iterate => {
                let keys: BTreeSet<&String> = sut.keys().collect();
                let expected: BTreeSet<&String> = model.keys().collect();
                prop_assert_eq!(keys, expected);
            }
            Op::Clear => {
                sut.clear();
                model.clear();
                inserted.clear();
            }
        }

        // Post-conditions after each op
        sut.assert_invariants();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.begin() == Cursor::end(), model.is_empty());

        let order: Vec<String> = sut.keys().cloned().collect();
        prop_assert_eq!(
            order,
            expected_order(sut.hasher(), sut.bucket_count(), &inserted)
        );
        let bucket_total: usize = (0..sut.bucket_count()).map(|b| sut.bucket_size(b)).sum();
        prop_assert_eq!(bucket_total, sut.len());
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants checked after every operation:
// - insert-if-absent semantics and cursor/value agreement;
// - erase by key and by cursor, with `erase` returning the old successor;
// - `head` is the first chain head (via assert_invariants);
// - iteration order is ascending bucket, most recent insert first.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_state_machine_std_hash((buckets, pool, ops) in arb_scenario()) {
        let mut sut: ChainedHashMap<String, i32, StdHash, DefaultEq> =
            ChainedHashMap::with_buckets_and_hasher(buckets, StdHash::default());
        run_state_machine(&mut sut, &pool, ops)?;
    }

    #[test]
    fn prop_state_machine_polynomial((buckets, pool, ops) in arb_scenario()) {
        let mut sut: ChainedHashMap<String, i32, PolynomialRollingHash, DefaultEq> =
            ChainedHashMap::with_buckets_and_hasher(buckets, PolynomialRollingHash);
        run_state_machine(&mut sut, &pool, ops)?;
    }

    #[test]
    fn prop_state_machine_fnv((buckets, pool, ops) in arb_scenario()) {
        let mut sut: ChainedHashMap<String, i32, Fnv1aHash, DefaultEq> =
            ChainedHashMap::with_buckets_and_hasher(buckets, Fnv1aHash);
        run_state_machine(&mut sut, &pool, ops)?;
    }
}

// Collision variant: every key hashes to the same code, so one chain holds
// everything and equivalence alone separates keys.
#[derive(Clone, Copy, Default)]
struct ConstHash;

impl<Q: ?Sized> KeyHasher<Q> for ConstHash {
    fn hash_key(&self, _key: &Q) -> u64 {
        7
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_state_machine_with_collisions((buckets, pool, ops) in arb_scenario()) {
        let mut sut: ChainedHashMap<String, i32, ConstHash, DefaultEq> =
            ChainedHashMap::with_buckets_and_hasher(buckets, ConstHash);
        run_state_machine(&mut sut, &pool, ops)?;
        let nonempty = (0..sut.bucket_count()).filter(|&b| sut.bucket_size(b) > 0).count();
        prop_assert!(nonempty <= 1);
    }

    // Property: a clone iterates in lock-step with its source and later
    // mutations of either side stay invisible to the other.
    #[test]
    fn prop_clone_is_independent(
        buckets in 0usize..20,
        entries in proptest::collection::vec(("[a-z]{1,4}", any::<i32>()), 0..40),
        victim in any::<prop::sample::Index>(),
    ) {
        let mut m: ChainedHashMap<String, i32, Fnv1aHash, DefaultEq> =
            ChainedHashMap::with_buckets_and_hasher(buckets, Fnv1aHash);
        m.extend(entries);
        let snapshot: Vec<(String, i32)> = m.iter().map(|(k, v)| (k.clone(), *v)).collect();

        let mut copy = m.clone();
        copy.assert_invariants();
        prop_assert!(m.iter().eq(copy.iter()));

        if !snapshot.is_empty() {
            let (k, _) = victim.get(&snapshot);
            copy.erase_key(k.as_str());
            copy.insert("new-key".to_string(), 0);
        }
        let after: Vec<(String, i32)> = m.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(after, snapshot);
    }
}
