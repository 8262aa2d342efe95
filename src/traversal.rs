//! Search & Traversal - Descent, stepping and bounded walks.
//!
//! Stepping (`successor` / `predecessor`) uses only parent back-links and
//! never consults the comparator. A position is either a live handle or
//! `None`, which stands for "before the first" when stepping forward and
//! "after the last" when stepping backward.
//!
//! None of these primitives re-validate handles. A handle captured before a
//! deletion may now name a different entry; see [`crate::Cursor`].

use std::cmp::Ordering;

use crate::arena::{Handle, NULL_HANDLE};
use crate::comparator::Comparator;
use crate::tree::{opt, AvlTree};

impl<K, V, C: Comparator<K>> AvlTree<K, V, C> {
    // ========================================================================
    // Search
    // ========================================================================

    /// Handle of the node holding `key`.
    ///
    /// # Complexity
    /// O(log n)
    pub fn find(&self, key: &K) -> Option<Handle> {
        let mut node = self.root;
        while node != NULL_HANDLE {
            node = match self.cmp.compare(key, self.arena.key(node)) {
                Ordering::Less => self.arena.links(node).left,
                Ordering::Greater => self.arena.links(node).right,
                Ordering::Equal => return Some(node),
            };
        }
        None
    }

    /// Handle of the largest key `<= key`.
    pub fn floor(&self, key: &K) -> Option<Handle> {
        let mut best = NULL_HANDLE;
        let mut node = self.root;
        while node != NULL_HANDLE {
            node = match self.cmp.compare(key, self.arena.key(node)) {
                Ordering::Less => self.arena.links(node).left,
                Ordering::Greater => {
                    best = node;
                    self.arena.links(node).right
                }
                Ordering::Equal => return Some(node),
            };
        }
        opt(best)
    }

    /// Handle of the smallest key `>= key`.
    pub fn ceil(&self, key: &K) -> Option<Handle> {
        let mut best = NULL_HANDLE;
        let mut node = self.root;
        while node != NULL_HANDLE {
            node = match self.cmp.compare(key, self.arena.key(node)) {
                Ordering::Less => {
                    best = node;
                    self.arena.links(node).left
                }
                Ordering::Greater => self.arena.links(node).right,
                Ordering::Equal => return Some(node),
            };
        }
        opt(best)
    }

    // ========================================================================
    // Stepping
    // ========================================================================

    /// Leftmost node of the subtree at `node` (which must be live).
    #[inline]
    pub(crate) fn min_from(&self, mut node: Handle) -> Handle {
        loop {
            let left = self.arena.links(node).left;
            if left == NULL_HANDLE {
                return node;
            }
            node = left;
        }
    }

    /// Rightmost node of the subtree at `node` (which must be live).
    #[inline]
    pub(crate) fn max_from(&self, mut node: Handle) -> Handle {
        loop {
            let right = self.arena.links(node).right;
            if right == NULL_HANDLE {
                return node;
            }
            node = right;
        }
    }

    /// Next position in ascending order.
    ///
    /// `None` yields the minimum; the maximum yields `None`. Out-of-range
    /// handles also yield `None`.
    ///
    /// # Complexity
    /// O(log n) worst case, O(1) amortized over a full walk
    pub fn successor(&self, position: Option<Handle>) -> Option<Handle> {
        let Some(node) = position else {
            return (self.root != NULL_HANDLE).then(|| self.min_from(self.root));
        };
        if !self.arena.contains(node) {
            return None;
        }
        opt(self.next_handle(node))
    }

    /// Previous position in ascending order.
    ///
    /// `None` yields the maximum; the minimum yields `None`.
    pub fn predecessor(&self, position: Option<Handle>) -> Option<Handle> {
        let Some(node) = position else {
            return (self.root != NULL_HANDLE).then(|| self.max_from(self.root));
        };
        if !self.arena.contains(node) {
            return None;
        }
        opt(self.prev_handle(node))
    }

    /// In-order successor of a live node, or `NULL_HANDLE`.
    pub(crate) fn next_handle(&self, node: Handle) -> Handle {
        let right = self.arena.links(node).right;
        if right != NULL_HANDLE {
            return self.min_from(right);
        }
        let mut child = node;
        let mut parent = self.arena.links(node).parent;
        while parent != NULL_HANDLE && self.arena.links(parent).right == child {
            child = parent;
            parent = self.arena.links(parent).parent;
        }
        parent
    }

    /// In-order predecessor of a live node, or `NULL_HANDLE`.
    pub(crate) fn prev_handle(&self, node: Handle) -> Handle {
        let left = self.arena.links(node).left;
        if left != NULL_HANDLE {
            return self.max_from(left);
        }
        let mut child = node;
        let mut parent = self.arena.links(node).parent;
        while parent != NULL_HANDLE && self.arena.links(parent).left == child {
            child = parent;
            parent = self.arena.links(parent).parent;
        }
        parent
    }

    // ========================================================================
    // Bounded Walks
    // ========================================================================

    /// Keys in `[min_key, max_key]`, ascending.
    ///
    /// Empty if `min_key > max_key` or nothing lies in range.
    ///
    /// # Complexity
    /// O(log n + k) for k results
    pub fn range(&self, min_key: &K, max_key: &K) -> Vec<&K> {
        let mut keys = Vec::new();
        self.for_each_in_range(min_key, max_key, |k, _| {
            keys.push(k);
            None::<()>
        });
        keys
    }

    /// Visit each entry in `[min_key, max_key]` ascending.
    ///
    /// Stops at, and returns, the first `Some` produced by `visit`.
    pub fn for_each_in_range<'a, R, F>(&'a self, min_key: &K, max_key: &K, mut visit: F) -> Option<R>
    where
        F: FnMut(&'a K, &'a V) -> Option<R>,
    {
        if self.cmp.compare(min_key, max_key) == Ordering::Greater {
            return None;
        }
        let mut node = self.ceil(min_key).unwrap_or(NULL_HANDLE);
        while node != NULL_HANDLE {
            let key = self.arena.key(node);
            if self.cmp.compare(key, max_key) == Ordering::Greater {
                break;
            }
            if let Some(found) = visit(key, self.arena.value(node)) {
                return Some(found);
            }
            node = self.next_handle(node);
        }
        None
    }
}
