//! AVL Tree - The ordered map built on the dense arena.
//!
//! Insertion appends a node at handle `len` and retraces upward. Deletion
//! splices out a node with at most one child (after successor substitution
//! for the two-child case), swap-compacts the arena and retraces from the
//! splice point.
//!
//! Handles are only stable until the next deletion: a delete may move the
//! entry at the highest handle into the freed slot. See [`crate::Cursor`]
//! for a traversal that survives interleaved mutation.

use std::fmt;

use crate::arena::{Arena, Handle, MAX_ENTRIES, NULL_HANDLE};
use crate::comparator::{Comparator, KeyOrder, Natural};
use crate::config::TreeConfig;
use crate::error::{AvlError, Result};

/// Convert an internal sentinel-encoded handle into the public form.
#[inline]
pub(crate) fn opt(handle: Handle) -> Option<Handle> {
    if handle == NULL_HANDLE {
        None
    } else {
        Some(handle)
    }
}

/// Ordered map with O(log n) insert, lookup, delete and stepping.
///
/// All node state lives in one [`Arena`]; callers only ever see opaque
/// [`Handle`]s, never references into node links.
pub struct AvlTree<K, V, C = Natural> {
    /// Root handle, or `NULL_HANDLE` when empty
    pub(crate) root: Handle,
    /// Node storage; occupied handles are exactly `[0, len)`
    pub(crate) arena: Arena<K, V>,
    /// Ordering strategy captured at construction
    pub(crate) cmp: C,
    /// Maximum number of live entries
    max_entries: u32,
}

impl<K: Ord, V> AvlTree<K, V, Natural> {
    /// Create an empty tree ordered by `K: Ord`.
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }

    /// Create an empty tree with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<K: Ord, V> AvlTree<K, V, KeyOrder> {
    /// Create a tree from a [`TreeConfig`].
    ///
    /// Fails with [`AvlError::InvalidComparator`] if `config.ordering` does
    /// not name a known ordering, and [`AvlError::InvalidConfig`] if the
    /// capacity settings are inconsistent.
    pub fn from_config(config: &TreeConfig) -> Result<Self> {
        config.validate()?;
        let order = config.key_order()?;
        let mut tree = Self::with_capacity_and_comparator(config.initial_capacity, order);
        tree.max_entries = config.entry_limit();
        Ok(tree)
    }
}

impl<K, V, C: Comparator<K>> AvlTree<K, V, C> {
    /// Create an empty tree ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> Self {
        Self::with_capacity_and_comparator(0, cmp)
    }

    /// Create an empty tree ordered by `cmp` with room for `capacity` entries.
    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        Self {
            root: NULL_HANDLE,
            arena: Arena::with_capacity(capacity),
            cmp,
            max_entries: MAX_ENTRIES,
        }
    }

    // ========================================================================
    // Size & Capacity
    // ========================================================================

    /// Number of live entries (the occupied handle range is `[0, len)`).
    #[inline]
    pub fn len(&self) -> usize {
        self.arena.len() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Number of entries storable without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Maximum number of live entries this tree accepts.
    #[inline]
    pub fn max_entries(&self) -> u32 {
        self.max_entries
    }

    pub fn reserve(&mut self, additional: usize) {
        self.arena.reserve(additional);
    }

    pub fn shrink_to_fit(&mut self) {
        self.arena.shrink_to_fit();
    }

    /// Height of the tree (0 when empty).
    #[inline]
    pub fn height(&self) -> u32 {
        self.arena.height(self.root)
    }

    /// Handle of the root node.
    #[inline]
    pub fn root(&self) -> Option<Handle> {
        opt(self.root)
    }

    /// The comparator this tree orders by.
    #[inline]
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Remove every entry. Heap capacity is retained.
    pub fn clear(&mut self) {
        self.root = NULL_HANDLE;
        self.arena.clear();
    }

    // ========================================================================
    // Handle Access
    // ========================================================================

    /// Key and value at `handle`, or `None` if no live node occupies it.
    ///
    /// A handle obtained before a deletion may now name a different entry;
    /// compare the key against a captured copy before trusting it.
    #[inline]
    pub fn key_value_at(&self, handle: Handle) -> Option<(&K, &V)> {
        self.arena
            .contains(handle)
            .then(|| (self.arena.key(handle), self.arena.value(handle)))
    }

    #[inline]
    pub fn key_at(&self, handle: Handle) -> Option<&K> {
        self.arena.contains(handle).then(|| self.arena.key(handle))
    }

    #[inline]
    pub fn value_at(&self, handle: Handle) -> Option<&V> {
        self.arena.contains(handle).then(|| self.arena.value(handle))
    }

    #[inline]
    pub fn value_at_mut(&mut self, handle: Handle) -> Option<&mut V> {
        if self.arena.contains(handle) {
            Some(self.arena.value_mut(handle))
        } else {
            None
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Look up the entry for `key`.
    #[inline]
    pub fn get(&self, key: &K) -> Option<(&K, &V)> {
        self.find(key)
            .map(|h| (self.arena.key(h), self.arena.value(h)))
    }

    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let handle = self.find(key)?;
        Some(self.arena.value_mut(handle))
    }

    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Smallest entry.
    pub fn first(&self) -> Option<(&K, &V)> {
        let h = self.successor(None)?;
        self.key_value_at(h)
    }

    /// Largest entry.
    pub fn last(&self) -> Option<(&K, &V)> {
        let h = self.predecessor(None)?;
        self.key_value_at(h)
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Insert `key` -> `value`, returning the handle of its node.
    ///
    /// If `key` is already present its value is overwritten in place: no
    /// allocation happens, `len()` is unchanged and the existing handle is
    /// returned.
    ///
    /// # Errors
    /// [`AvlError::CapacityExceeded`] if `key` is new and the tree already
    /// holds `max_entries()` entries.
    ///
    /// # Complexity
    /// O(log n)
    pub fn insert(&mut self, key: K, value: V) -> Result<Handle> {
        // Descend first; only allocate once the key is known to be new.
        let mut parent = NULL_HANDLE;
        let mut go_left = false;
        let mut node = self.root;
        while node != NULL_HANDLE {
            parent = node;
            match self.cmp.compare(&key, self.arena.key(node)) {
                std::cmp::Ordering::Less => {
                    go_left = true;
                    node = self.arena.links(node).left;
                }
                std::cmp::Ordering::Greater => {
                    go_left = false;
                    node = self.arena.links(node).right;
                }
                std::cmp::Ordering::Equal => {
                    *self.arena.value_mut(node) = value;
                    return Ok(node);
                }
            }
        }

        if self.arena.len() >= self.max_entries {
            #[cfg(feature = "tracing")]
            tracing::debug!(max = self.max_entries, "insert: capacity exceeded");
            return Err(AvlError::CapacityExceeded { max: self.max_entries });
        }

        let handle = self.arena.allocate(key, value);
        if parent == NULL_HANDLE {
            self.root = handle;
            return Ok(handle);
        }

        self.arena.links_mut(handle).parent = parent;
        if go_left {
            self.arena.links_mut(parent).left = handle;
        } else {
            self.arena.links_mut(parent).right = handle;
        }

        self.retrace(parent);
        Ok(handle)
    }

    // ========================================================================
    // Deletion
    // ========================================================================

    /// Delete `key`. Returns `false` if it was absent.
    #[inline]
    pub fn delete(&mut self, key: &K) -> bool {
        self.remove(key).is_some()
    }

    /// Delete `key`, returning the removed entry.
    pub fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let handle = self.find(key)?;
        Some(self.remove_handle(handle))
    }

    /// Delete the node at `handle`. Returns `false` if no live node occupies it.
    #[inline]
    pub fn delete_by_handle(&mut self, handle: Handle) -> bool {
        self.remove_by_handle(handle).is_some()
    }

    /// Delete the node at `handle`, returning its entry.
    pub fn remove_by_handle(&mut self, handle: Handle) -> Option<(K, V)> {
        if !self.arena.contains(handle) {
            return None;
        }
        Some(self.remove_handle(handle))
    }

    /// Unlink and free the live node at `target`.
    ///
    /// # Complexity
    /// O(log n)
    fn remove_handle(&mut self, target: Handle) -> (K, V) {
        let mut doomed = target;

        // Two children: pull the in-order successor's payload up into
        // `target`, then physically remove the successor, which has no left
        // child.
        let links = *self.arena.links(target);
        if links.left != NULL_HANDLE && links.right != NULL_HANDLE {
            let successor = self.min_from(links.right);
            self.arena.swap_payload(target, successor);
            doomed = successor;
        }

        // Splice out `doomed`, which has at most one child.
        let links = *self.arena.links(doomed);
        let child = if links.left != NULL_HANDLE {
            links.left
        } else {
            links.right
        };
        let parent = links.parent;

        if child != NULL_HANDLE {
            self.arena.links_mut(child).parent = parent;
        }
        self.replace_child(parent, doomed, child);

        // Compact. If the splice point itself was the last slot it now lives
        // at `doomed`.
        let last = self.arena.len() - 1;
        let entry = self.arena.free(doomed, &mut self.root);
        let retrace_from = if parent == last { doomed } else { parent };

        if retrace_from != NULL_HANDLE {
            self.retrace(retrace_from);
        }
        entry
    }

    /// Point `parent`'s link to `old` at `new` instead (or the root).
    #[inline]
    pub(crate) fn replace_child(&mut self, parent: Handle, old: Handle, new: Handle) {
        if parent == NULL_HANDLE {
            self.root = new;
            return;
        }
        let links = self.arena.links_mut(parent);
        if links.left == old {
            links.left = new;
        } else {
            debug_assert!(links.right == old);
            links.right = new;
        }
    }
}

impl<K: Ord, V> Default for AvlTree<K, V, Natural> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlTree<K, V, Natural> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for AvlTree<K, V, C> {
    /// Insert every pair. New keys rejected by `max_entries()` are dropped;
    /// updates to existing keys always apply.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            let _ = self.insert(key, value);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C: Comparator<K>> fmt::Debug for AvlTree<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
