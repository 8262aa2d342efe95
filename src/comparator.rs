//! Ordering Strategy - Pluggable three-way key comparison.
//!
//! A tree captures one comparator at construction and consults it for every
//! descent. The comparator must be a consistent total order for the lifetime
//! of the tree; an inconsistent one leaves the tree in an unspecified (but
//! memory-safe) state.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::AvlError;

/// Three-way comparison strategy for keys of type `K`.
pub trait Comparator<K: ?Sized> {
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Natural ascending order via `Ord`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Natural;

impl<K: Ord + ?Sized> Comparator<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Descending order via `Ord`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reverse;

impl<K: Ord + ?Sized> Comparator<K> for Reverse {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        b.cmp(a)
    }
}

/// Any `Fn(&K, &K) -> Ordering` closure is a comparator.
impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

/// A key ordering selected at runtime by name.
///
/// This is how configuration chooses a comparator. Unknown names are rejected
/// with [`AvlError::InvalidComparator`] instead of silently falling back to
/// natural order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyOrder {
    #[default]
    Ascending,
    Descending,
}

impl KeyOrder {
    pub const fn name(self) -> &'static str {
        match self {
            KeyOrder::Ascending => "natural",
            KeyOrder::Descending => "reverse",
        }
    }
}

impl<K: Ord + ?Sized> Comparator<K> for KeyOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        match self {
            KeyOrder::Ascending => a.cmp(b),
            KeyOrder::Descending => b.cmp(a),
        }
    }
}

impl FromStr for KeyOrder {
    type Err = AvlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "natural" | "ascending" | "asc" => Ok(KeyOrder::Ascending),
            "reverse" | "descending" | "desc" => Ok(KeyOrder::Descending),
            _ => Err(AvlError::InvalidComparator { name: s.to_string() }),
        }
    }
}

impl fmt::Display for KeyOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
