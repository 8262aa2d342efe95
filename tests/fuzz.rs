//! Fuzz Test - Compares flash-avl against a reference implementation.
//!
//! Uses `std::collections::BTreeMap` as the reference to verify the tree
//! produces identical results for every operation, and that every
//! structural invariant holds along the way.

use flash_avl::{AvlTree, Cursor, Handle, Reverse};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

/// Key of the node at `h`, panicking on a dead handle
fn key_of(tree: &AvlTree<u32, u64>, h: Option<Handle>) -> Option<u32> {
    h.map(|h| *tree.key_at(h).expect("returned handle must be live"))
}

fn run_fuzz(seed: u64, steps: usize, key_space: u32) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut tree: AvlTree<u32, u64> = AvlTree::new();
    let mut reference: BTreeMap<u32, u64> = BTreeMap::new();

    for step in 0..steps {
        let key = rng.gen_range(0..key_space);
        match rng.gen_range(0..100) {
            0..=39 => {
                let value = rng.gen::<u64>();
                tree.insert(key, value).unwrap();
                reference.insert(key, value);
            }
            40..=64 => {
                assert_eq!(
                    tree.remove(&key).map(|(_, v)| v),
                    reference.remove(&key),
                    "remove({}) diverged at step {}",
                    key,
                    step
                );
            }
            65..=69 => {
                if !tree.is_empty() {
                    let h = rng.gen_range(0..tree.len()) as Handle;
                    let k = *tree.key_at(h).unwrap();
                    assert!(tree.delete_by_handle(h));
                    reference.remove(&k);
                }
            }
            70..=79 => {
                assert_eq!(
                    tree.get(&key).map(|(_, v)| *v),
                    reference.get(&key).copied()
                );
            }
            80..=87 => {
                let expected = reference.range(..=key).next_back().map(|(k, _)| *k);
                assert_eq!(key_of(&tree, tree.floor(&key)), expected, "floor({})", key);
                let expected = reference.range(key..).next().map(|(k, _)| *k);
                assert_eq!(key_of(&tree, tree.ceil(&key)), expected, "ceil({})", key);
            }
            _ => {
                let hi = key.saturating_add(rng.gen_range(0..key_space / 8 + 1));
                let got: Vec<u32> = tree.range(&key, &hi).into_iter().copied().collect();
                let expected: Vec<u32> = reference.range(key..=hi).map(|(k, _)| *k).collect();
                assert_eq!(got, expected, "range({}, {})", key, hi);
            }
        }

        assert_eq!(tree.len(), reference.len());
        if step % 997 == 0 {
            tree.validate().unwrap();
        }
    }

    tree.validate().unwrap();
    assert!(tree
        .iter()
        .map(|(k, v)| (*k, *v))
        .eq(reference.iter().map(|(k, v)| (*k, *v))));
}

#[test]
fn test_fuzz_dense_keys() {
    run_fuzz(0xDEADBEEF, 50_000, 256);
}

#[test]
fn test_fuzz_sparse_keys() {
    run_fuzz(0xCAFEBABE, 50_000, 1_000_000);
}

#[test]
fn test_fuzz_many_seeds() {
    for seed in 0..20 {
        run_fuzz(seed, 5_000, 2_000);
    }
}

#[test]
fn test_fuzz_reverse_comparator() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut tree = AvlTree::with_comparator(Reverse);
    let mut reference: BTreeMap<u32, ()> = BTreeMap::new();

    for _ in 0..20_000 {
        let key = rng.gen_range(0..5_000u32);
        if rng.gen_bool(0.6) {
            tree.insert(key, ()).unwrap();
            reference.insert(key, ());
        } else {
            assert_eq!(tree.delete(&key), reference.remove(&key).is_some());
        }
    }

    tree.validate().unwrap();
    assert!(tree.keys().copied().eq(reference.keys().rev().copied()));
}

#[test]
fn test_fuzz_successor_predecessor_walks() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut tree: AvlTree<u32, u64> = AvlTree::new();
    for _ in 0..3_000 {
        tree.insert(rng.gen_range(0..10_000), 0).unwrap();
    }
    for _ in 0..1_000 {
        let key = rng.gen_range(0..10_000);
        tree.delete(&key);
    }

    let mut forward = Vec::new();
    let mut pos = tree.successor(None);
    while let Some(h) = pos {
        forward.push(*tree.key_at(h).unwrap());
        pos = tree.successor(Some(h));
    }
    let mut backward = Vec::new();
    let mut pos = tree.predecessor(None);
    while let Some(h) = pos {
        backward.push(*tree.key_at(h).unwrap());
        pos = tree.predecessor(Some(h));
    }
    backward.reverse();

    assert_eq!(forward.len(), tree.len());
    assert_eq!(forward, backward);
    assert!(forward.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_fuzz_cursor_with_interleaved_deletes() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let mut tree: AvlTree<u32, u64> = (0..2_000u32).map(|k| (k, k as u64)).collect();
    let mut cursor = Cursor::new();
    let mut visited = Vec::new();
    let mut deleted = Vec::new();

    loop {
        let step = match cursor.advance(&tree) {
            Ok(step) => step.map(|(k, _)| *k),
            Err(_) => {
                cursor.resync(&tree);
                continue;
            }
        };
        let Some(key) = step else { break };
        visited.push(key);

        // Delete a random key ahead of or behind the cursor
        let victim = rng.gen_range(0..2_000u32);
        if victim != key && tree.delete(&victim) {
            deleted.push(victim);
        }
    }

    // Ascending, no repeats, and nothing deleted before it was reached
    assert!(visited.windows(2).all(|w| w[0] < w[1]));
    for k in tree.keys() {
        assert!(visited.binary_search(k).is_ok(), "live key {} was skipped", k);
    }
}
