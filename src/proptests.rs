use super::*;

use proptest::prelude::*;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
enum Op {
    Insert(u16, u32),
    Delete(u16),
    DeleteHandle(u32),
    Get(u16),
    Floor(u16),
    Ceil(u16),
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    // Narrow key space so deletes and updates actually hit.
    let key = 0u16..512;
    let op = prop_oneof![
        45 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        20 => key.clone().prop_map(Op::Delete),
        5 => (0u32..600).prop_map(Op::DeleteHandle),
        10 => key.clone().prop_map(Op::Get),
        10 => key.clone().prop_map(Op::Floor),
        10 => key.prop_map(Op::Ceil),
    ];
    prop::collection::vec(op, 0..=1500)
}

fn key_of(t: &AvlTree<u16, u32>, h: Option<Handle>) -> Option<u16> {
    h.map(|h| *t.key_at(h).expect("returned handle must be live"))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        max_shrink_iters: 10_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_with_btreemap(ops in ops_strategy()) {
        let mut t: AvlTree<u16, u32> = AvlTree::new();
        let mut m: BTreeMap<u16, u32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    t.insert(k, v).unwrap();
                    m.insert(k, v);
                }
                Op::Delete(k) => {
                    prop_assert_eq!(t.remove(&k).map(|(_, v)| v), m.remove(&k));
                }
                Op::DeleteHandle(h) => {
                    let key = t.key_at(h).copied();
                    prop_assert_eq!(t.delete_by_handle(h), key.is_some());
                    if let Some(k) = key {
                        m.remove(&k);
                    }
                }
                Op::Get(k) => {
                    prop_assert_eq!(t.get(&k).map(|(_, v)| *v), m.get(&k).copied());
                }
                Op::Floor(k) => {
                    let expected = m.range(..=k).next_back().map(|(k, _)| *k);
                    prop_assert_eq!(key_of(&t, t.floor(&k)), expected);
                }
                Op::Ceil(k) => {
                    let expected = m.range(k..).next().map(|(k, _)| *k);
                    prop_assert_eq!(key_of(&t, t.ceil(&k)), expected);
                }
            }

            prop_assert_eq!(t.len(), m.len());
        }

        prop_assert!(t.validate().is_ok(), "{:?}", t.validate());
        let got: Vec<(u16, u32)> = t.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(u16, u32)> = m.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_invariants_after_every_delete(keys in prop::collection::vec(any::<u16>(), 0..400)) {
        let mut t: AvlTree<u16, ()> = AvlTree::new();
        for &k in &keys {
            t.insert(k, ()).unwrap();
        }
        prop_assert!(t.validate().is_ok());

        for &k in keys.iter().rev() {
            t.delete(&k);
            prop_assert!(t.validate().is_ok(), "{:?}", t.validate());
            prop_assert!(!t.contains_key(&k));
        }
        prop_assert!(t.is_empty());
    }

    #[test]
    fn prop_range_matches_btreemap(
        keys in prop::collection::btree_set(0u16..1000, 0..200),
        lo in 0u16..1000,
        hi in 0u16..1000,
    ) {
        let t: AvlTree<u16, ()> = keys.iter().map(|&k| (k, ())).collect();
        let got: Vec<u16> = t.range(&lo, &hi).into_iter().copied().collect();
        let expected: Vec<u16> = if lo <= hi {
            keys.range(lo..=hi).copied().collect()
        } else {
            Vec::new()
        };
        prop_assert_eq!(&got, &expected);

        let lazy: Vec<u16> = t.range_iter(&lo, &hi).map(|(k, _)| *k).collect();
        prop_assert_eq!(lazy, expected);
    }
}
