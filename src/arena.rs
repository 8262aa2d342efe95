//! Arena - Dense structure-of-arrays node storage.
//!
//! Every live node occupies one slot in `[0, len)`. Allocation appends at
//! `len`; freeing swaps the last slot into the hole, so the occupied handle
//! range never has gaps. Link fields, keys and values live in three parallel
//! vectors indexed by the same handle.

use std::fmt;

/// Sentinel value representing an absent handle (no child / no parent)
pub const NULL_HANDLE: u32 = u32::MAX;

/// Largest number of live nodes an arena can index.
pub const MAX_ENTRIES: u32 = NULL_HANDLE - 1;

/// Type alias for arena handles - our "compressed pointers".
/// Using u32 instead of 64-bit pointers halves link metadata, so four
/// nodes' links share one cache line.
pub type Handle = u32;

/// Structural fields of a single node - exactly 16 bytes.
///
/// # Memory Layout
///
/// | Field   | Type | Offset | Size |
/// |---------|------|--------|------|
/// | left    | u32  | 0      | 4    |
/// | right   | u32  | 4      | 4    |
/// | parent  | u32  | 8      | 4    |
/// | height  | u32  | 12     | 4    |
/// | **Total** |    |        | 16   |
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Links {
    /// Root of the left subtree
    pub left: Handle,

    /// Root of the right subtree
    pub right: Handle,

    /// Non-owning back-link used for retracing and stepping
    pub parent: Handle,

    /// 1 for a leaf, `1 + max(child heights)` otherwise
    pub height: u32,
}

// Compile-time assertion: Links must be exactly 16 bytes
const _: () = assert!(
    std::mem::size_of::<Links>() == 16,
    "Links must be exactly 16 bytes (four per cache line)"
);

impl Links {
    /// Links of a freshly allocated leaf
    #[inline]
    pub const fn leaf() -> Self {
        Self {
            left: NULL_HANDLE,
            right: NULL_HANDLE,
            parent: NULL_HANDLE,
            height: 1,
        }
    }

    #[inline]
    pub const fn is_leaf(&self) -> bool {
        self.left == NULL_HANDLE && self.right == NULL_HANDLE
    }
}

impl fmt::Debug for Links {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn show(h: Handle) -> Option<Handle> {
            (h != NULL_HANDLE).then_some(h)
        }
        f.debug_struct("Links")
            .field("left", &show(self.left))
            .field("right", &show(self.right))
            .field("parent", &show(self.parent))
            .field("height", &self.height)
            .finish()
    }
}

/// Dense node storage with O(1) append and O(1) swap-compaction.
///
/// The arena knows nothing about ordering. It only guarantees that handles
/// `[0, len)` are occupied and, on `free`, rewrites the links that pointed
/// at the relocated slot.
pub struct Arena<K, V> {
    /// Structural fields, one record per slot
    links: Vec<Links>,

    /// Keys, parallel to `links`
    keys: Vec<K>,

    /// Values, parallel to `links`
    values: Vec<V>,
}

impl<K, V> Arena<K, V> {
    /// Create an empty arena.
    pub const fn new() -> Self {
        Self {
            links: Vec::new(),
            keys: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Create an empty arena with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            links: Vec::with_capacity(capacity),
            keys: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Append a detached leaf at handle `len` and return that handle.
    ///
    /// The caller must have checked `len() < MAX_ENTRIES`.
    ///
    /// # Complexity
    /// O(1) amortized - pushes onto the slot vectors
    #[inline]
    pub fn allocate(&mut self, key: K, value: V) -> Handle {
        debug_assert!(self.len() < MAX_ENTRIES, "Arena handle space exhausted");

        let handle = self.links.len() as Handle;
        self.links.push(Links::leaf());
        self.keys.push(key);
        self.values.push(value);
        handle
    }

    /// Remove the node at `handle` and close the gap it leaves.
    ///
    /// The node must already be unlinked from the tree: no live node may
    /// still point at `handle`. If `handle` is not the last slot, the entry at
    /// `len - 1` is moved into it and its parent's child link (or `root`, when
    /// it has no parent) and its children's parent links are rewritten.
    ///
    /// Returns the removed key and value.
    ///
    /// # Complexity
    /// O(1) - one swap plus at most three link fixups
    #[inline]
    pub fn free(&mut self, handle: Handle, root: &mut Handle) -> (K, V) {
        debug_assert!(handle < self.len(), "Handle out of bounds");

        let last = self.len() - 1;
        if handle != last {
            let moved = self.links[last as usize];

            if moved.parent == NULL_HANDLE {
                debug_assert!(*root == last);
                *root = handle;
            } else {
                let parent = &mut self.links[moved.parent as usize];
                if parent.left == last {
                    parent.left = handle;
                } else {
                    debug_assert!(parent.right == last);
                    parent.right = handle;
                }
            }
            if moved.left != NULL_HANDLE {
                self.links[moved.left as usize].parent = handle;
            }
            if moved.right != NULL_HANDLE {
                self.links[moved.right as usize].parent = handle;
            }

            #[cfg(feature = "tracing")]
            tracing::debug!(from = last, to = handle, "free: relocated last slot");
        }

        self.links.swap_remove(handle as usize);
        let key = self.keys.swap_remove(handle as usize);
        let value = self.values.swap_remove(handle as usize);
        (key, value)
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.links.clear();
        self.keys.clear();
        self.values.clear();
    }

    /// Reserve room for at least `additional` more nodes.
    pub fn reserve(&mut self, additional: usize) {
        self.links.reserve(additional);
        self.keys.reserve(additional);
        self.values.reserve(additional);
    }

    pub fn shrink_to_fit(&mut self) {
        self.links.shrink_to_fit();
        self.keys.shrink_to_fit();
        self.values.shrink_to_fit();
    }

    /// Returns the number of occupied slots.
    #[inline]
    pub fn len(&self) -> u32 {
        self.links.len() as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Returns the number of nodes storable without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.links.capacity()
    }

    /// Returns true if `handle` names an occupied slot.
    #[inline]
    pub fn contains(&self, handle: Handle) -> bool {
        handle < self.len()
    }

    // ========================================================================
    // Slot Access
    // ========================================================================

    #[inline]
    pub fn links(&self, handle: Handle) -> &Links {
        &self.links[handle as usize]
    }

    #[inline]
    pub fn links_mut(&mut self, handle: Handle) -> &mut Links {
        &mut self.links[handle as usize]
    }

    #[inline]
    pub fn key(&self, handle: Handle) -> &K {
        &self.keys[handle as usize]
    }

    #[inline]
    pub fn value(&self, handle: Handle) -> &V {
        &self.values[handle as usize]
    }

    #[inline]
    pub fn value_mut(&mut self, handle: Handle) -> &mut V {
        &mut self.values[handle as usize]
    }

    /// Exchange the key/value payloads of two slots, leaving links in place.
    #[inline]
    pub fn swap_payload(&mut self, a: Handle, b: Handle) {
        self.keys.swap(a as usize, b as usize);
        self.values.swap(a as usize, b as usize);
    }

    /// Height of the subtree rooted at `handle`; 0 for an absent handle.
    #[inline]
    pub fn height(&self, handle: Handle) -> u32 {
        if handle == NULL_HANDLE {
            0
        } else {
            self.links[handle as usize].height
        }
    }
}

impl<K, V> Default for Arena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for Arena<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("len", &self.links.len())
            .field("capacity", &self.links.capacity())
            .finish()
    }
}
