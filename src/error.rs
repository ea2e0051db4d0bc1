//! Error types for the B-tree.
//!
//! Normal operations on valid input cannot fail: lookups and iteration signal
//! misses and exhaustion with `None`, and insertion always accepts its element.
//! The variants below cover construction with an unusable branching factor,
//! traversals whose fixed-size stack cannot hold the tree, and the unsupported
//! removal operation.

use thiserror::Error;

/// Errors reported by [`BTree`](crate::BTree) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The branching factor must be at least 1, and small enough that a node
    /// can reserve room for `2 * factor + 1` elements.
    #[error("invalid branching factor {0}: must be at least 1 and fit a node allocation")]
    InvalidFactor(usize),

    /// The tree is taller than the iterator stack can hold.
    ///
    /// Use [`BTree::try_iter`](crate::BTree::try_iter) with a larger `DEPTH`.
    #[error("tree height {height} exceeds the iterator stack depth {depth}")]
    IterDepthExceeded { height: usize, depth: usize },

    /// Element removal is not implemented.
    #[error("removal is not implemented")]
    RemoveUnsupported,
}

/// A Result type alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
