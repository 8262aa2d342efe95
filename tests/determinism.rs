//! Determinism Test - Golden Master verification.
//!
//! Verifies that the tree produces an identical arena layout and contents
//! across runs when given the same operation sequence.

use flash_avl::workload::Op;
use flash_avl::AvlTree;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Generate a deterministic sequence of operations
fn generate_ops(seed: u64, count: usize) -> Vec<Op> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut ops = Vec::with_capacity(count);
    let mut live: Vec<u64> = Vec::new();

    for _ in 0..count {
        // 60% insert, 25% delete, 15% reads
        let roll = rng.gen_range(0..100);
        if live.is_empty() || roll < 60 {
            let key = rng.gen_range(0..1_000_000);
            ops.push(Op::Insert { key, value: rng.gen() });
            live.push(key);
        } else if roll < 85 {
            let idx = rng.gen_range(0..live.len());
            ops.push(Op::Delete { key: live.swap_remove(idx) });
        } else if roll < 95 {
            ops.push(Op::Floor { key: rng.gen_range(0..1_000_000) });
        } else {
            let min = rng.gen_range(0..1_000_000);
            ops.push(Op::Range { min, max: min + 5_000 });
        }
    }

    ops
}

/// Run the ops and return (touched count, state hash)
fn run_tree(ops: &[Op]) -> (usize, u64) {
    let mut tree = AvlTree::new();
    let touched = ops.iter().map(|op| op.apply(&mut tree)).sum();
    tree.validate().unwrap();
    (touched, tree.state_hash())
}

#[test]
fn test_determinism_small() {
    const SEED: u64 = 0xDEADBEEF;
    const COUNT: usize = 1000;
    const RUNS: usize = 10;

    let ops = generate_ops(SEED, COUNT);
    let (first_touched, first_hash) = run_tree(&ops);

    for run in 1..RUNS {
        let (touched, hash) = run_tree(&ops);
        assert_eq!(touched, first_touched, "Touched count mismatch on run {}", run);
        assert_eq!(hash, first_hash, "State hash mismatch on run {}", run);
    }

    println!("Determinism test passed!");
    println!("  Ops: {}", COUNT);
    println!("  Runs: {}", RUNS);
    println!("  State hash: {:#018x}", first_hash);
}

#[test]
fn test_determinism_large() {
    const SEED: u64 = 0xCAFEBABE;
    const COUNT: usize = 100_000;
    const RUNS: usize = 3;

    let ops = generate_ops(SEED, COUNT);
    let first = run_tree(&ops);

    for run in 1..RUNS {
        assert_eq!(run_tree(&ops), first, "Mismatch on run {}", run);
    }
}

#[test]
fn test_different_seeds_differ() {
    let a = run_tree(&generate_ops(1, 5_000));
    let b = run_tree(&generate_ops(2, 5_000));
    assert_ne!(a.1, b.1);
}

#[test]
fn test_update_leaves_layout_unchanged() {
    let mut tree = AvlTree::new();
    for k in 0..1_000u64 {
        tree.insert(k, 0u64).unwrap();
    }
    let layout: Vec<u64> = (0..1_000).map(|h| *tree.key_at(h).unwrap()).collect();

    for k in 0..1_000u64 {
        tree.insert(k, 1).unwrap();
    }
    let after: Vec<u64> = (0..1_000).map(|h| *tree.key_at(h).unwrap()).collect();
    assert_eq!(layout, after);
    assert_eq!(tree.len(), 1_000);
    assert!(tree.values().all(|v| *v == 1));
}
