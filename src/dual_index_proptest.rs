#![cfg(test)]

// Property tests for DualIndexMap kept inside the crate so they can walk
// the reverse index directly when checking the pairing invariant.

use crate::dual_index_map::DualIndexMap;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::hash::{BuildHasher, Hasher};

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// keys, pool length shrinks, and op lists shrink in length. Values are
// drawn from a narrow range so buckets regularly hold several keys.
#[derive(Clone, Debug)]
enum OpI {
    Set(usize, u8),
    Remove(usize),
    Get(usize),
    KeysFor(u8),
    Iterate,
}

fn key_from(pool: &[String], i: usize) -> String {
    pool[i].clone()
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            (idx.clone(), 0u8..4).prop_map(|(i, v)| OpI::Set(i, v)),
            idx.clone().prop_map(OpI::Remove),
            idx.clone().prop_map(OpI::Get),
            (0u8..6).prop_map(OpI::KeysFor),
            Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Full consistency check against the model: forward parity, pairing in
// both directions, no empty buckets, size parities.
fn assert_consistent<S: BuildHasher>(sut: &DualIndexMap<String, u8, S>, model: &HashMap<String, u8>) {
    assert_eq!(sut.len(), model.len());
    assert_eq!(sut.is_empty(), model.is_empty());

    for (k, v) in model {
        assert_eq!(sut.get(k), Some(v));
        assert!(sut.keys_for(v).any(|kk| kk == k));
    }

    let mut listed_keys = 0;
    let mut distinct = BTreeSet::new();
    for (v, keys) in sut.value_groups() {
        assert!(distinct.insert(*v), "value listed by more than one bucket");
        let keys: Vec<_> = keys.collect();
        assert!(!keys.is_empty(), "reverse index holds an empty bucket");
        listed_keys += keys.len();
        for k in keys {
            assert_eq!(model.get(k), Some(v));
        }
    }
    let model_distinct: BTreeSet<u8> = model.values().copied().collect();
    assert_eq!(distinct, model_distinct);
    assert_eq!(sut.distinct_values(), model_distinct.len());
    assert_eq!(listed_keys, model.len());
}

fn run_state_machine<S: BuildHasher>(
    mut sut: DualIndexMap<String, u8, S>,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, u8> = HashMap::new();

    for op in ops {
        match op {
            OpI::Set(i, v) => {
                let k = key_from(&pool, i);
                let displaced = sut.set(k.clone(), v);
                let expected = model.insert(k, v);
                prop_assert_eq!(displaced, expected);
            }
            OpI::Remove(i) => {
                let k = key_from(&pool, i);
                match sut.remove(&k) {
                    Some((rk, rv)) => {
                        prop_assert_eq!(&rk, &k);
                        let mv = model.remove(&rk).expect("present in model");
                        prop_assert_eq!(rv, mv);
                    }
                    None => prop_assert!(!model.contains_key(&k)),
                }
            }
            OpI::Get(i) => {
                let k = key_from(&pool, i);
                prop_assert_eq!(sut.get(&k), model.get(&k));
                prop_assert_eq!(sut.contains_key(&k), model.contains_key(&k));
            }
            OpI::KeysFor(v) => {
                let got: BTreeSet<String> = sut.keys_for(&v).cloned().collect();
                let expected: BTreeSet<String> = model
                    .iter()
                    .filter(|&(_, mv)| *mv == v)
                    .map(|(k, _)| k.clone())
                    .collect();
                prop_assert_eq!(got, expected);
                prop_assert_eq!(sut.contains_value(&v), model.values().any(|mv| *mv == v));
            }
            OpI::Iterate => {
                let seen: BTreeSet<(String, u8)> =
                    sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                let expected: BTreeSet<(String, u8)> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(seen, expected);
            }
        }

        // Post-condition after each op: the two indices agree with each
        // other and with the model.
        assert_consistent(&sut, &model);
    }
    Ok(())
}

// Property: state-machine equivalence against a HashMap model with a
// derived reverse index. Exercised across random operation sequences:
// - `set` displaces exactly what the model displaces and relinks buckets.
// - `remove` returns the owned entry; absent keys are a no-op None.
// - `keys_for` equals the model-derived key set for every probed value.
// - After each op, pairing holds in both directions with no empty bucket.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_state_machine(DualIndexMap::new(), pool, ops)?;
    }
}

// Collision variant using a constant hasher: every key and every value
// lands in one bucket chain, stressing equality probing on both indices
// and slot-membership bucket identification.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_state_machine(DualIndexMap::with_hasher(ConstBuildHasher), pool, ops)?;
    }
}

// Property: an insertion-ordered map iterates keys in first-insertion
// order, with removals splicing and overwrites keeping position.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_insertion_order((pool, ops) in arb_scenario()) {
        let mut sut: DualIndexMap<String, u8> = DualIndexMap::insertion_ordered();
        let mut order: Vec<String> = Vec::new();
        let mut model: HashMap<String, u8> = HashMap::new();

        for op in ops {
            match op {
                OpI::Set(i, v) => {
                    let k = key_from(&pool, i);
                    if model.insert(k.clone(), v).is_none() {
                        order.push(k.clone());
                    }
                    sut.set(k, v);
                }
                OpI::Remove(i) => {
                    let k = key_from(&pool, i);
                    if model.remove(&k).is_some() {
                        order.retain(|existing| *existing != k);
                    }
                    let _ = sut.remove(&k);
                }
                _ => {}
            }

            let got: Vec<String> = sut.iter().map(|(k, _)| k.clone()).collect();
            prop_assert_eq!(&got, &order);
        }
    }
}
