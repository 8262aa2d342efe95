//! # Flash-AVL
//!
//! An ordered, in-memory key-value map: an AVL tree whose nodes live in a
//! dense, structure-of-arrays arena.
//!
//! ## Design Principles
//!
//! - **Single-Owner**: No internal locking; one owner mutates the tree
//! - **O(log n) Operations**: Insert, Delete, Find, Floor, Ceil, Step
//! - **Dense Arena**: Live nodes occupy handles `[0, len)` with no gaps;
//!   deletion swap-compacts the last slot into the hole
//! - **32-bit Handles**: Child/parent links are `u32` indices, never pointers
//!
//! ## Example
//!
//! ```rust
//! use flash_avl::AvlTree;
//!
//! let mut tree = AvlTree::new();
//! for key in [5u32, 7, 10, 15] {
//!     tree.insert(key, key * 100).unwrap();
//! }
//!
//! assert_eq!(tree.get(&7), Some((&7, &700)));
//! assert_eq!(tree.range(&6, &12), vec![&7, &10]);
//!
//! let floor = tree.floor(&8).unwrap();
//! assert_eq!(tree.key_at(floor), Some(&7));
//! ```
//!
//! ## Handle Stability
//!
//! A deletion may move the entry in the highest slot into the freed slot,
//! so handles held across a deletion can go stale. Borrowing iterators are
//! immune (the borrow checker forbids mutation while they live); for
//! handle-based walks interleaved with mutation use [`Cursor`].

pub mod arena;
pub mod comparator;
pub mod config;
pub mod cursor;
pub mod error;
pub mod iter;
pub mod tree;
pub mod workload;

mod balance;
mod traversal;
mod validate;

#[cfg(test)]
mod proptests;

// Re-exports for convenience
pub use arena::{Handle, MAX_ENTRIES};
pub use comparator::{Comparator, KeyOrder, Natural, Reverse};
pub use config::TreeConfig;
pub use cursor::Cursor;
pub use error::{AvlError, Result};
pub use iter::{Iter, Keys, Range, Values};
pub use tree::AvlTree;
