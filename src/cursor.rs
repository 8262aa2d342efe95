//! Cursor - Validated stepping that survives interleaved mutation.
//!
//! Raw handles are invalidated by swap-compaction: after a deletion the
//! handle you hold may name another key, or nothing. A `Cursor` does not
//! borrow the tree. It captures the key alongside the handle and checks
//! `key_at(handle) == captured` before every step, failing with
//! [`AvlError::StaleCursor`] instead of silently walking from the wrong
//! node. [`Cursor::resync`] repositions a stale cursor by key.

use std::cmp::Ordering;

use crate::arena::Handle;
use crate::comparator::Comparator;
use crate::error::{AvlError, Result};
use crate::tree::AvlTree;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Position<K> {
    /// Before the first entry
    Start,
    /// On a live entry
    At(Handle, K),
    /// Past the last entry
    End,
}

/// Ascending cursor over an [`AvlTree`] that re-validates its position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cursor<K> {
    position: Position<K>,
}

impl<K: Clone> Cursor<K> {
    /// A cursor positioned before the first entry.
    pub const fn new() -> Self {
        Self { position: Position::Start }
    }

    /// A cursor positioned on `key`'s entry, or `None` if it is absent.
    pub fn at<V, C: Comparator<K>>(tree: &AvlTree<K, V, C>, key: &K) -> Option<Self> {
        let handle = tree.find(key)?;
        Some(Self {
            position: Position::At(handle, key.clone()),
        })
    }

    /// Handle of the current entry (unvalidated).
    pub fn handle(&self) -> Option<Handle> {
        match self.position {
            Position::At(h, _) => Some(h),
            _ => None,
        }
    }

    /// Key captured at the current entry.
    pub fn key(&self) -> Option<&K> {
        match &self.position {
            Position::At(_, k) => Some(k),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.position, Position::End)
    }

    /// Check that the captured handle still holds the captured key.
    pub fn validate<V, C: Comparator<K>>(&self, tree: &AvlTree<K, V, C>) -> Result<()> {
        if let Position::At(handle, key) = &self.position {
            let live = tree
                .key_at(*handle)
                .map_or(false, |k| tree.comparator().compare(k, key) == Ordering::Equal);
            if !live {
                return Err(AvlError::StaleCursor { handle: *handle });
            }
        }
        Ok(())
    }

    /// Step to the next entry and return it.
    ///
    /// Returns `Ok(None)` once past the last entry.
    ///
    /// # Errors
    /// [`AvlError::StaleCursor`] if a deletion has moved or removed the
    /// current entry since the last step. The cursor is left unchanged.
    pub fn advance<'t, V, C: Comparator<K>>(
        &mut self,
        tree: &'t AvlTree<K, V, C>,
    ) -> Result<Option<(&'t K, &'t V)>> {
        self.validate(tree)?;
        let next = match &self.position {
            Position::Start => tree.successor(None),
            Position::At(h, _) => tree.successor(Some(*h)),
            Position::End => None,
        };
        match next.and_then(|h| tree.key_value_at(h).map(|kv| (h, kv))) {
            Some((h, (k, v))) => {
                self.position = Position::At(h, k.clone());
                Ok(Some((k, v)))
            }
            None => {
                self.position = Position::End;
                Ok(None)
            }
        }
    }

    /// Re-locate the cursor by its captured key.
    ///
    /// If the key is still present the cursor points at its new handle.
    /// Otherwise it moves to the floor of the key, so the next `advance`
    /// yields the first entry greater than the captured key.
    pub fn resync<V, C: Comparator<K>>(&mut self, tree: &AvlTree<K, V, C>) {
        let Position::At(_, key) = &self.position else {
            return;
        };
        self.position = match tree.floor(key) {
            Some(h) => match tree.key_at(h) {
                Some(k) => Position::At(h, k.clone()),
                None => Position::Start,
            },
            None => Position::Start,
        };
    }
}

impl<K: Clone> Default for Cursor<K> {
    fn default() -> Self {
        Self::new()
    }
}
