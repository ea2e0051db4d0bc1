//! An in-memory B-tree with a configurable branching factor.
//!
//! Elements are kept sorted under a pluggable three-way comparison. Inserting
//! an element equal to one already present replaces it and hands the old one
//! back. Iteration walks the tree in order with a fixed-size explicit stack.
//!
//! ```
//! use flex_btree::{BTree, Insert};
//!
//! let mut tree = BTree::with_factor(2).unwrap();
//! for value in vec![10, 20, 5, 15, 25, 1, 30] {
//!     tree.insert(value);
//! }
//! assert_eq!(tree.get(&15), Some(&15));
//! assert_eq!(tree.get(&99), None);
//! assert_eq!(tree.insert(5), Insert::Replaced(5));
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 5, 10, 15, 20, 25, 30]);
//! ```

#[cfg(test)]
mod tests;

mod tracing_helpers;

mod btree;
mod compare;
mod error;

pub use btree::{BTree, Insert, NodeRef, TreeIter, DEFAULT_FACTOR, DEFAULT_ITER_DEPTH};
pub use compare::{ByLess, Compare, Natural};
pub use error::{Error, Result};
