use super::node::{factor_fits, Node, NodeRef};
use super::*;
use crate::compare::{Compare, Natural};
use crate::error::{Error, Result};
use crate::tracing_helpers::{debug_log, trace_log};
use std::fmt;

/// An ordered set of elements stored in a B-tree.
///
/// Every node other than the root holds between `factor` and `2 * factor`
/// elements, and all leaves are at the same depth. Elements that compare as
/// equal under `C` are never both retained: inserting one replaces the other.
#[derive(Clone)]
pub struct BTree<T, C = Natural> {
    root: Option<Box<Node<T>>>,
    len: usize,
    factor: usize,
    cmp: C,
}

/// Outcome of [`BTree::insert`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insert<T> {
    /// The element was added to the tree
    Inserted,
    /// An equal element was already present: it was replaced and is handed back
    Replaced(T),
}

impl<T> Insert<T> {
    pub fn is_replaced(&self) -> bool {
        matches!(self, Insert::Replaced(_))
    }

    /// Return the replaced element, if any
    pub fn replaced(self) -> Option<T> {
        match self {
            Insert::Inserted => None,
            Insert::Replaced(old) => Some(old),
        }
    }
}

impl<T: Ord> BTree<T> {
    /// Create a new empty tree with the default branching factor
    pub fn new() -> Self {
        Self::build(DEFAULT_FACTOR, Natural)
    }

    /// Create a new empty tree with the given branching factor.
    /// Fails if `factor` is zero or too large for a node to be allocated
    pub fn with_factor(factor: usize) -> Result<Self> {
        Self::with_factor_and_comparator(factor, Natural)
    }
}

impl<T: Ord> Default for BTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: Compare<T>> BTree<T, C> {
    /// Create a new empty tree ordered by `cmp`, with the default branching factor
    pub fn with_comparator(cmp: C) -> Self {
        Self::build(DEFAULT_FACTOR, cmp)
    }

    /// Create a new empty tree ordered by `cmp`, with the given branching factor.
    /// Fails if `factor` is zero or too large for a node to be allocated
    pub fn with_factor_and_comparator(factor: usize, cmp: C) -> Result<Self> {
        if !factor_fits::<T>(factor) {
            return Err(Error::InvalidFactor(factor));
        }
        Ok(Self::build(factor, cmp))
    }

    fn build(factor: usize, cmp: C) -> Self {
        BTree {
            root: None,
            len: 0,
            factor,
            cmp,
        }
    }

    /// Insert a new value into the tree.
    /// If an element comparing equal is already present, it is replaced by
    /// `value` and returned. Dropping the returned value disposes of it
    pub fn insert(&mut self, value: T) -> Insert<T> {
        // Delegate logic to root node
        let insert_result = match self.root.as_mut() {
            Some(root) => root.insert(value, self.factor, &self.cmp),
            None => {
                self.root = Some(Box::new(Node::leaf(value, self.factor)));
                self.len = 1;
                return Insert::Inserted;
            }
        };

        match insert_result {
            InsertResult::Replaced(old) => {
                trace_log!("replaced an equal element");
                Insert::Replaced(old)
            }
            InsertResult::Inserted => {
                self.len += 1;
                Insert::Inserted
            }
            InsertResult::PendingSplit(median, right) => {
                self.len += 1;
                self.grow_root(median, right);
                Insert::Inserted
            }
        }
    }

    /// Splitting reached root tree: build new root node
    fn grow_root(&mut self, median: T, right: Node<T>) {
        if let Some(prev_root) = self.root.take() {
            self.root = Some(Box::new(Node::with_root(
                median,
                prev_root,
                right,
                self.factor,
            )));
        }
        debug_log!(height = self.height(), len = self.len, "root split");
    }

    /// Return a reference to the element comparing equal to `key`, if any
    pub fn get(&self, key: &T) -> Option<&T> {
        self.root.as_ref()?.get(key, &self.cmp)
    }

    /// Return a mutable reference to the element comparing equal to `key`, if any.
    ///
    /// Mutating the element in a way that changes its ordering is a logic error
    pub fn get_mut(&mut self, key: &T) -> Option<&mut T> {
        self.root.as_mut()?.get_mut(key, &self.cmp)
    }

    pub fn contains(&self, key: &T) -> bool {
        self.get(key).is_some()
    }

    /// Look `key` up, also returning the last node visited by the search: the
    /// node holding the element on a hit, or the leaf where the search ended.
    /// The node is `None` only for an empty tree
    pub fn lookup_node(&self, key: &T) -> (Option<NodeRef<'_, T>>, Option<&T>) {
        match &self.root {
            None => (None, None),
            Some(root) => {
                let (node, found) = root.lookup(key, &self.cmp);
                (Some(NodeRef::new(node)), found)
            }
        }
    }

    /// Removal is not supported: this always fails with `Error::RemoveUnsupported`
    /// and leaves the tree untouched
    pub fn remove(&mut self, _key: &T) -> Result<T> {
        debug_log!(len = self.len, "rejected removal");
        Err(Error::RemoveUnsupported)
    }
}

impl<T, C> BTree<T, C> {
    /// Return the total number of values actually present in the tree
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Return the branching factor of this tree
    pub fn factor(&self) -> usize {
        self.factor
    }

    /// Return the number of levels in the tree: 0 when empty, 1 when the root is a leaf
    pub fn height(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.height())
    }

    /// Return a read-only view of the root node, `None` when empty
    pub fn root(&self) -> Option<NodeRef<'_, T>> {
        self.root.as_deref().map(NodeRef::new)
    }

    /// Drop every element, leaving an empty tree
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Return a sorted iterator over references to elements in the tree.
    ///
    /// Panics if the tree is taller than `DEFAULT_ITER_DEPTH`. This cannot
    /// happen below 2^32 elements; see `try_iter` for other depths
    pub fn iter(&self) -> TreeIter<'_, T> {
        match self.try_iter::<DEFAULT_ITER_DEPTH>() {
            Ok(iter) => iter,
            Err(err) => panic!("{}", err),
        }
    }

    /// Return a sorted iterator over references to elements in the tree,
    /// with a stack of `DEPTH` frames. Fails if the tree is taller than `DEPTH`
    pub fn try_iter<const DEPTH: usize>(&self) -> Result<TreeIter<'_, T, DEPTH>> {
        let height = self.height();
        if height > DEPTH {
            debug_log!(height, depth = DEPTH, "rejected iterator");
            return Err(Error::IterDepthExceeded {
                height,
                depth: DEPTH,
            });
        }
        Ok(TreeIter::new(self.root.as_deref(), self.len))
    }
}

impl<T, C: Compare<T>> BTree<T, C> {
    /// Check every structural invariant of the tree, panicking on the first
    /// violation: node fan-out bounds, ordering, equal leaf depths and `len`
    pub fn assert_invariants(&self) {
        match &self.root {
            None => assert_eq!(self.len, 0, "Empty tree with len {}", self.len),
            Some(root) => {
                let count =
                    root.assert_invariants(self.factor, &self.cmp, 0, &mut None, None, None);
                assert_eq!(
                    count, self.len,
                    "Tree holds {} elements but len is {}",
                    count, self.len
                );
            }
        }
    }
}

impl<'a, T, C> IntoIterator for &'a BTree<T, C> {
    type Item = &'a T;
    type IntoIter = TreeIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C: Compare<T> + Default> std::iter::FromIterator<T> for BTree<T, C> {
    /// Create a tree from an iterator. Later elements replace earlier equal ones
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = BTree::with_comparator(C::default());
        tree.extend(iter);
        tree
    }
}

impl<T, C: Compare<T>> Extend<T> for BTree<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for BTree<T, C> {
    /// Dump the elements of every node, one node per line, indented by depth
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BTree (factor = {}, len = {})", self.factor, self.len)?;
        match &self.root {
            None => writeln!(f, "<empty>"),
            Some(root) => root.fmt_depth(f, 0),
        }
    }
}
