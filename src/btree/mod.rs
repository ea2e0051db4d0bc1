mod node;
mod tree;
mod tree_iter;

pub use node::NodeRef;
pub use tree::{BTree, Insert};
pub use tree_iter::TreeIter;

/// Branching factor used by `BTree::new`: nodes hold between 2 and 4 elements
pub const DEFAULT_FACTOR: usize = 2;

/// Stack depth of the iterator returned by `BTree::iter`.
/// With a branching factor of 1 this still allows for over 4 billion elements
pub const DEFAULT_ITER_DEPTH: usize = 32;

/// Outcome of a recursive node insertion, reported to the parent
enum InsertResult<T> {
    Inserted,
    Replaced(T),
    PendingSplit(T, node::Node<T>),
}
