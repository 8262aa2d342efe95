//! Rebalancing - AVL rotations and upward retracing.
//!
//! Shared by insertion and deletion. Every rotation rewrites the parent
//! back-links of the nodes it moves and recomputes heights bottom-up, so
//! stored heights are never stale once a public operation returns.

use crate::arena::{Handle, NULL_HANDLE};
use crate::comparator::Comparator;
use crate::tree::AvlTree;

impl<K, V, C: Comparator<K>> AvlTree<K, V, C> {
    /// `height(left) - height(right)` for a live node.
    #[inline]
    pub(crate) fn balance_factor(&self, node: Handle) -> i64 {
        let links = self.arena.links(node);
        self.arena.height(links.left) as i64 - self.arena.height(links.right) as i64
    }

    /// Recompute `node`'s height from its children.
    #[inline]
    fn update_height(&mut self, node: Handle) {
        let links = *self.arena.links(node);
        let height = 1 + self.arena.height(links.left).max(self.arena.height(links.right));
        self.arena.links_mut(node).height = height;
    }

    /// Walk from `start` to the root, restoring heights and balance.
    ///
    /// Stops as soon as a subtree's height comes out unchanged, since no
    /// ancestor above it can be affected.
    ///
    /// # Complexity
    /// O(log n)
    pub(crate) fn retrace(&mut self, start: Handle) {
        let mut node = start;
        while node != NULL_HANDLE {
            let old_height = self.arena.links(node).height;
            self.update_height(node);

            let balance = self.balance_factor(node);
            let subtree = if balance > 1 {
                if self.balance_factor(self.arena.links(node).left) < 0 {
                    let left = self.arena.links(node).left;
                    self.rotate_left(left);
                }
                self.rotate_right(node)
            } else if balance < -1 {
                if self.balance_factor(self.arena.links(node).right) > 0 {
                    let right = self.arena.links(node).right;
                    self.rotate_right(right);
                }
                self.rotate_left(node)
            } else {
                node
            };

            if self.arena.links(subtree).height == old_height {
                break;
            }
            node = self.arena.links(subtree).parent;
        }
    }

    /// Rotate the subtree at `x` left; its right child `y` takes its place.
    ///
    /// ```text
    ///     x                y
    ///    / \              / \
    ///   a   y     ->     x   c
    ///      / \          / \
    ///     b   c        a   b
    /// ```
    ///
    /// Returns `y`.
    pub(crate) fn rotate_left(&mut self, x: Handle) -> Handle {
        let y = self.arena.links(x).right;
        debug_assert!(y != NULL_HANDLE, "rotate_left needs a right child");
        let b = self.arena.links(y).left;
        let parent = self.arena.links(x).parent;

        #[cfg(feature = "tracing")]
        tracing::trace!(pivot = x, new_root = y, "rotate_left");

        self.arena.links_mut(x).right = b;
        if b != NULL_HANDLE {
            self.arena.links_mut(b).parent = x;
        }
        self.arena.links_mut(y).left = x;
        self.arena.links_mut(x).parent = y;
        self.arena.links_mut(y).parent = parent;
        self.replace_child(parent, x, y);

        self.update_height(x);
        self.update_height(y);
        y
    }

    /// Mirror of [`rotate_left`](Self::rotate_left). Returns the new subtree root.
    pub(crate) fn rotate_right(&mut self, y: Handle) -> Handle {
        let x = self.arena.links(y).left;
        debug_assert!(x != NULL_HANDLE, "rotate_right needs a left child");
        let b = self.arena.links(x).right;
        let parent = self.arena.links(y).parent;

        #[cfg(feature = "tracing")]
        tracing::trace!(pivot = y, new_root = x, "rotate_right");

        self.arena.links_mut(y).left = b;
        if b != NULL_HANDLE {
            self.arena.links_mut(b).parent = y;
        }
        self.arena.links_mut(x).right = y;
        self.arena.links_mut(y).parent = x;
        self.arena.links_mut(x).parent = parent;
        self.replace_child(parent, y, x);

        self.update_height(y);
        self.update_height(x);
        x
    }
}
