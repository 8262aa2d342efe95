//! Iterators over tree entries in key order.
//!
//! Every iterator borrows the tree, so it cannot outlive a mutation and
//! never sees swap-compaction. Each call to `iter()` starts afresh from the
//! minimum. Walks are driven by `successor` / `predecessor` stepping, one
//! parent-link walk per element (O(1) amortized).

use std::iter::FusedIterator;

use crate::arena::{Handle, NULL_HANDLE};
use crate::comparator::Comparator;
use crate::tree::AvlTree;

/// Ascending iterator over `(&K, &V)`.
pub struct Iter<'a, K, V, C> {
    tree: &'a AvlTree<K, V, C>,
    /// Next handle from the front
    front: Handle,
    /// Next handle from the back
    back: Handle,
    /// Entries left between `front` and `back` inclusive
    remaining: usize,
}

impl<'a, K, V, C: Comparator<K>> Iterator for Iter<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front;
        self.remaining -= 1;
        if self.remaining > 0 {
            self.front = self.tree.next_handle(node);
        }
        Some((self.tree.arena.key(node), self.tree.arena.value(node)))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V, C: Comparator<K>> DoubleEndedIterator for Iter<'a, K, V, C> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back;
        self.remaining -= 1;
        if self.remaining > 0 {
            self.back = self.tree.prev_handle(node);
        }
        Some((self.tree.arena.key(node), self.tree.arena.value(node)))
    }
}

impl<K, V, C: Comparator<K>> ExactSizeIterator for Iter<'_, K, V, C> {}
impl<K, V, C: Comparator<K>> FusedIterator for Iter<'_, K, V, C> {}

/// Ascending iterator over keys.
pub struct Keys<'a, K, V, C>(Iter<'a, K, V, C>);

impl<'a, K, V, C: Comparator<K>> Iterator for Keys<'a, K, V, C> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<&'a K> {
        self.0.next().map(|(k, _)| k)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V, C: Comparator<K>> DoubleEndedIterator for Keys<'a, K, V, C> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a K> {
        self.0.next_back().map(|(k, _)| k)
    }
}

impl<K, V, C: Comparator<K>> ExactSizeIterator for Keys<'_, K, V, C> {}

/// Ascending iterator over values.
pub struct Values<'a, K, V, C>(Iter<'a, K, V, C>);

impl<'a, K, V, C: Comparator<K>> Iterator for Values<'a, K, V, C> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        self.0.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V, C: Comparator<K>> DoubleEndedIterator for Values<'a, K, V, C> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a V> {
        self.0.next_back().map(|(_, v)| v)
    }
}

impl<K, V, C: Comparator<K>> ExactSizeIterator for Values<'_, K, V, C> {}

/// Iterator over entries with keys in `[min, max]`.
///
/// Both ends are resolved up front (`ceil(min)` and `floor(max)`), so the
/// walk itself never calls the comparator.
pub struct Range<'a, K, V, C> {
    tree: &'a AvlTree<K, V, C>,
    front: Handle,
    back: Handle,
    done: bool,
}

impl<'a, K, V, C: Comparator<K>> Iterator for Range<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let node = self.front;
        if node == self.back {
            self.done = true;
        } else {
            self.front = self.tree.next_handle(node);
        }
        Some((self.tree.arena.key(node), self.tree.arena.value(node)))
    }
}

impl<'a, K, V, C: Comparator<K>> DoubleEndedIterator for Range<'a, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let node = self.back;
        if node == self.front {
            self.done = true;
        } else {
            self.back = self.tree.prev_handle(node);
        }
        Some((self.tree.arena.key(node), self.tree.arena.value(node)))
    }
}

impl<K, V, C: Comparator<K>> FusedIterator for Range<'_, K, V, C> {}

impl<K, V, C: Comparator<K>> AvlTree<K, V, C> {
    /// Iterate all entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V, C> {
        let (front, back) = if self.root == NULL_HANDLE {
            (NULL_HANDLE, NULL_HANDLE)
        } else {
            (self.min_from(self.root), self.max_from(self.root))
        };
        Iter {
            tree: self,
            front,
            back,
            remaining: self.len(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V, C> {
        Keys(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V, C> {
        Values(self.iter())
    }

    /// Lazily iterate entries with keys in `[min_key, max_key]`.
    pub fn range_iter(&self, min_key: &K, max_key: &K) -> Range<'_, K, V, C> {
        let empty = Range {
            tree: self,
            front: NULL_HANDLE,
            back: NULL_HANDLE,
            done: true,
        };
        let (Some(front), Some(back)) = (self.ceil(min_key), self.floor(max_key)) else {
            return empty;
        };
        // ceil(min) beyond floor(max): nothing lies in between
        if self.cmp.compare(self.arena.key(front), self.arena.key(back)).is_gt() {
            return empty;
        }
        Range {
            tree: self,
            front,
            back,
            done: false,
        }
    }
}

impl<'a, K, V, C: Comparator<K>> IntoIterator for &'a AvlTree<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
