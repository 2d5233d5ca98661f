// OrderedSet property tests (consolidated).
//
// Property 1: state-machine equivalence against a Vec model.
//  - Model: Vec<i32> holding the members in first-insertion order.
//  - Invariant after each op: iteration equals the model exactly
//    (members and order), contains/len parity, remove errors match.
//
// Property 2: set algebra.
//  - Membership of every algebra result matches std::collections::HashSet
//    on the same operands.
//  - Order policy: left operand's order first, then the right operand's
//    novel items in its order.
use proptest::prelude::*;
use revmap::{Error, OrderedSet};
use std::collections::HashSet;

#[derive(Clone, Debug)]
enum Op {
    Insert(i32),
    Remove(i32),
    Contains(i32),
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        (0i32..8).prop_map(Op::Insert),
        (0i32..8).prop_map(Op::Remove),
        (0i32..8).prop_map(Op::Contains),
    ];
    proptest::collection::vec(op, 1..80)
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_matches_vec_model(ops in arb_ops()) {
        let mut sut: OrderedSet<i32> = OrderedSet::new();
        let mut model: Vec<i32> = Vec::new();

        for op in ops {
            match op {
                Op::Insert(x) => {
                    let changed = sut.insert(x);
                    prop_assert_eq!(changed, !model.contains(&x));
                    if changed {
                        model.push(x);
                    }
                }
                Op::Remove(x) => {
                    let was_member = model.contains(&x);
                    match sut.remove(&x) {
                        Ok(removed) => {
                            prop_assert!(was_member);
                            prop_assert_eq!(removed, x);
                            model.retain(|&m| m != x);
                        }
                        Err(e) => {
                            prop_assert_eq!(e, Error::ItemNotFound);
                            prop_assert!(!was_member);
                        }
                    }
                }
                Op::Contains(x) => {
                    prop_assert_eq!(sut.contains(&x), model.contains(&x));
                }
            }

            let seen: Vec<i32> = sut.iter().copied().collect();
            prop_assert_eq!(&seen, &model);
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.first(), model.first());
            prop_assert_eq!(sut.last(), model.last());
        }
    }
}

fn members(set: &OrderedSet<i32>) -> HashSet<i32> {
    set.iter().copied().collect()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_algebra_matches_hashset(
        left in proptest::collection::vec(0i32..10, 0..20),
        right in proptest::collection::vec(0i32..10, 0..20),
    ) {
        let a: OrderedSet<i32> = left.into_iter().collect();
        let b: OrderedSet<i32> = right.into_iter().collect();
        let ha = members(&a);
        let hb = members(&b);

        prop_assert_eq!(members(&a.union(&b)), ha.union(&hb).copied().collect::<HashSet<_>>());
        prop_assert_eq!(
            members(&a.intersection(&b)),
            ha.intersection(&hb).copied().collect::<HashSet<_>>()
        );
        prop_assert_eq!(
            members(&a.difference(&b)),
            ha.difference(&hb).copied().collect::<HashSet<_>>()
        );
        prop_assert_eq!(
            members(&a.symmetric_difference(&b)),
            ha.symmetric_difference(&hb).copied().collect::<HashSet<_>>()
        );

        prop_assert_eq!(a.is_subset(&b), ha.is_subset(&hb));
        prop_assert_eq!(a.is_superset(&b), ha.is_superset(&hb));
        prop_assert_eq!(a.is_disjoint(&b), ha.is_disjoint(&hb));

        // Order policy: union lists a's items in a's order, then b's
        // novel items in b's order.
        let expected_union: Vec<i32> = a
            .iter()
            .copied()
            .chain(b.iter().copied().filter(|x| !a.contains(x)))
            .collect();
        let got_union: Vec<i32> = a.union(&b).iter().copied().collect();
        prop_assert_eq!(got_union, expected_union);

        // Intersection and difference keep a's order.
        let expected_inter: Vec<i32> = a.iter().copied().filter(|x| b.contains(x)).collect();
        let got_inter: Vec<i32> = a.intersection(&b).iter().copied().collect();
        prop_assert_eq!(got_inter, expected_inter);
    }
}
