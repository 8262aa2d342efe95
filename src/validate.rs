//! Integrity checks and determinism hashing.
//!
//! `validate` walks every reachable node and checks the structural
//! invariants: parent back-links, stored heights, AVL balance, dense handle
//! occupancy and strictly ascending in-order keys. `state_hash` fingerprints
//! both the logical contents and the physical arena layout so golden-master
//! tests can pin down fully deterministic behavior.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use arrayvec::ArrayVec;
use rustc_hash::FxHasher;

use crate::arena::{Handle, NULL_HANDLE};
use crate::comparator::Comparator;
use crate::error::{AvlError, Result};
use crate::tree::AvlTree;

/// Upper bound on AVL height for 2^32 nodes is ~46; leave headroom.
const MAX_DEPTH: usize = 64;

impl<K, V, C: Comparator<K>> AvlTree<K, V, C> {
    /// Check every structural invariant.
    ///
    /// # Errors
    /// [`AvlError::Corrupted`] describing the first violation found.
    ///
    /// # Complexity
    /// O(n)
    pub fn validate(&self) -> Result<()> {
        let len = self.arena.len();

        if self.root == NULL_HANDLE {
            return if len == 0 {
                Ok(())
            } else {
                Err(corrupted(format!("no root but {} live slots", len)))
            };
        }
        if self.root >= len {
            return Err(corrupted(format!("root {} outside [0, {})", self.root, len)));
        }
        if self.arena.links(self.root).parent != NULL_HANDLE {
            return Err(corrupted("root has a parent".to_string()));
        }

        // Pre-order walk with an explicit stack; depth is bounded by height.
        let mut stack: ArrayVec<Handle, MAX_DEPTH> = ArrayVec::new();
        stack.push(self.root);
        let mut reachable: u32 = 0;

        while let Some(node) = stack.pop() {
            reachable += 1;
            if reachable > len {
                return Err(corrupted("cycle in child links".to_string()));
            }

            let links = *self.arena.links(node);
            for child in [links.left, links.right] {
                if child == NULL_HANDLE {
                    continue;
                }
                if child >= len {
                    return Err(corrupted(format!("node {} links to dead slot {}", node, child)));
                }
                if self.arena.links(child).parent != node {
                    return Err(corrupted(format!(
                        "child {} of node {} has parent {}",
                        child,
                        node,
                        self.arena.links(child).parent
                    )));
                }
                if stack.try_push(child).is_err() {
                    return Err(corrupted("tree deeper than any balanced tree".to_string()));
                }
            }

            let lh = self.arena.height(links.left);
            let rh = self.arena.height(links.right);
            if links.height != 1 + lh.max(rh) {
                return Err(corrupted(format!(
                    "node {} stores height {} but children give {}",
                    node,
                    links.height,
                    1 + lh.max(rh)
                )));
            }
            if lh.abs_diff(rh) > 1 {
                return Err(corrupted(format!(
                    "node {} unbalanced: left {} right {}",
                    node, lh, rh
                )));
            }
        }

        if reachable != len {
            return Err(corrupted(format!(
                "{} nodes reachable but {} slots occupied",
                reachable, len
            )));
        }

        // In-order keys must be strictly ascending.
        let mut prev = NULL_HANDLE;
        let mut node = self.min_from(self.root);
        while node != NULL_HANDLE {
            if prev != NULL_HANDLE
                && self.cmp.compare(self.arena.key(prev), self.arena.key(node)) != Ordering::Less
            {
                return Err(corrupted(format!(
                    "keys at {} and {} out of order",
                    prev, node
                )));
            }
            prev = node;
            node = self.next_handle(node);
        }

        Ok(())
    }

    /// Fingerprint of the tree's contents and arena layout.
    ///
    /// Two trees that received the same operation sequence hash equal.
    pub fn state_hash(&self) -> u64
    where
        K: Hash,
        V: Hash,
    {
        let mut hasher = FxHasher::default();

        self.arena.len().hash(&mut hasher);
        self.root.hash(&mut hasher);

        for handle in 0..self.arena.len() {
            let links = self.arena.links(handle);
            links.left.hash(&mut hasher);
            links.right.hash(&mut hasher);
            links.height.hash(&mut hasher);
        }
        for (key, value) in self.iter() {
            key.hash(&mut hasher);
            value.hash(&mut hasher);
        }

        hasher.finish()
    }
}

fn corrupted(reason: String) -> AvlError {
    AvlError::Corrupted(reason)
}
