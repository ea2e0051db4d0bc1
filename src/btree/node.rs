use super::InsertResult;
use crate::compare::Compare;
use crate::tracing_helpers::trace_log;
use std::alloc::Layout;
use std::cmp::Ordering;
use std::fmt;
use std::mem;

/// A tree node. Storage for both arrays is reserved once, with room for the
/// transient overfull state (`2 * factor + 1` elements) that precedes a split.
/// A node is a leaf if and only if it has no children
pub(super) struct Node<T> {
    elements: Vec<T>,
    children: Vec<Box<Node<T>>>,
}

/// Result of a binary search inside a single node
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) enum Search {
    /// An element comparing equal lives at this index
    Found(usize),
    /// Index of the first element greater than the key, which is also the
    /// index of the child to descend into
    GoDown(usize),
}

impl<T> Node<T> {
    /// Build a new leaf holding a single element
    pub(super) fn leaf(value: T, factor: usize) -> Self {
        let mut elements = Vec::with_capacity(element_capacity(factor));
        elements.push(value);
        Node {
            elements,
            children: Vec::new(),
        }
    }

    /// Build a new root on top of the two halves of a split root
    pub(super) fn with_root(median: T, left: Box<Node<T>>, right: Node<T>, factor: usize) -> Self {
        let mut elements = Vec::with_capacity(element_capacity(factor));
        elements.push(median);
        let mut children = Vec::with_capacity(children_capacity(factor));
        children.push(left);
        children.push(Box::new(right));
        Node { elements, children }
    }

    /// Return the total number of elements in this node
    pub(super) fn len(&self) -> usize {
        self.elements.len()
    }

    /// Return whether the node is a leaf
    pub(super) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Return the element at the given index.
    /// Panics if out-of-bounds
    pub(super) fn get_element(&self, index: usize) -> &T {
        &self.elements[index]
    }

    /// Return the child at the given index.
    /// Panics if it is a leaf node or out-of-bounds access
    pub(super) fn get_child(&self, index: usize) -> &Node<T> {
        &self.children[index]
    }

    /// Number of levels from this node down to its leaves, itself included
    pub(super) fn height(&self) -> usize {
        let mut height = 1;
        let mut node = self;
        while let Some(child) = node.children.first() {
            node = child;
            height += 1;
        }
        height
    }

    /// Binary search for `key` among the elements of this node
    pub(super) fn search<C: Compare<T>>(&self, key: &T, cmp: &C) -> Search {
        match self
            .elements
            .binary_search_by(|element| cmp.compare(element, key))
        {
            Ok(index) => Search::Found(index),
            Err(index) => Search::GoDown(index),
        }
    }

    /// Look `key` up in this subtree
    pub(super) fn get<C: Compare<T>>(&self, key: &T, cmp: &C) -> Option<&T> {
        self.lookup(key, cmp).1
    }

    /// Look `key` up in this subtree, also returning the last visited node
    pub(super) fn lookup<C: Compare<T>>(&self, key: &T, cmp: &C) -> (&Node<T>, Option<&T>) {
        let mut node = self;
        loop {
            match node.search(key, cmp) {
                Search::Found(index) => return (node, Some(&node.elements[index])),
                Search::GoDown(index) => match node.children.get(index) {
                    Some(child) => node = child,
                    None => return (node, None),
                },
            }
        }
    }

    /// Look `key` up in this subtree.
    /// Mutating the result in a way that changes its ordering is a logic error
    pub(super) fn get_mut<C: Compare<T>>(&mut self, key: &T, cmp: &C) -> Option<&mut T> {
        let mut node = self;
        loop {
            match node.search(key, cmp) {
                Search::Found(index) => return Some(&mut node.elements[index]),
                Search::GoDown(index) => node = node.children.get_mut(index)?,
            }
        }
    }

    /// Recursive implementation of `BTree::insert`.
    /// When this node splits, it will return the median and new right node
    pub(super) fn insert<C: Compare<T>>(
        &mut self,
        value: T,
        factor: usize,
        cmp: &C,
    ) -> InsertResult<T> {
        match self.search(&value, cmp) {
            // Update in place, no structural change
            Search::Found(index) => {
                InsertResult::Replaced(mem::replace(&mut self.elements[index], value))
            }
            // Insertion point found
            Search::GoDown(index) if self.is_leaf() => {
                self.elements.insert(index, value);
                self.split_if_overfull(factor)
            }
            // Recursively look into the child
            Search::GoDown(index) => match self.children[index].insert(value, factor, cmp) {
                // Insertion bubbled a split up: absorb the median here
                InsertResult::PendingSplit(median, right) => {
                    self.elements.insert(index, median);
                    self.children.insert(index + 1, Box::new(right));
                    self.split_if_overfull(factor)
                }
                x => x,
            },
        }
    }

    fn split_if_overfull(&mut self, factor: usize) -> InsertResult<T> {
        if self.len() <= 2 * factor {
            return InsertResult::Inserted;
        }
        let (median, right) = self.split(factor);
        InsertResult::PendingSplit(median, right)
    }

    /// Split an overfull node (`2 * factor + 1` elements) into (left, median, right).
    /// Self keeps the lower `factor` elements and becomes left, the other two
    /// values are returned. The new right node is a leaf if and only if self is
    pub(super) fn split(&mut self, factor: usize) -> (T, Node<T>) {
        debug_assert_eq!(self.len(), 2 * factor + 1);
        trace_log!(factor, leaf = self.is_leaf(), "splitting overfull node");

        let mut elements = Vec::with_capacity(element_capacity(factor));
        elements.extend(self.elements.drain(factor + 1..));
        let median = self.elements.remove(factor);

        let children = if self.is_leaf() {
            Vec::new()
        } else {
            let mut children = Vec::with_capacity(children_capacity(factor));
            children.extend(self.children.drain(factor + 1..));
            children
        };

        (median, Node { elements, children })
    }

    /// Write the elements of this subtree, one node per line, indented by depth
    pub(super) fn fmt_depth(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result
    where
        T: fmt::Debug,
    {
        write!(f, "{:width$}elems:", "", width = 2 * depth)?;
        for element in &self.elements {
            write!(f, " {:?}", element)?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.fmt_depth(f, depth + 1)?;
        }
        Ok(())
    }

    /// Check every structural invariant of this subtree, panicking on the first
    /// violation. `lower` and `upper` are the exclusive bounds set by the
    /// ancestors. Return the number of elements in the subtree
    pub(super) fn assert_invariants<'a, C: Compare<T>>(
        &'a self,
        factor: usize,
        cmp: &C,
        depth: usize,
        leaf_depth: &mut Option<usize>,
        lower: Option<&'a T>,
        upper: Option<&'a T>,
    ) -> usize {
        let min = if depth == 0 { 1 } else { factor };
        assert!(
            self.len() >= min && self.len() <= 2 * factor,
            "Node at depth {} holds {} elements, expected between {} and {}",
            depth,
            self.len(),
            min,
            2 * factor
        );

        for pair in self.elements.windows(2) {
            assert_eq!(
                cmp.compare(&pair[0], &pair[1]),
                Ordering::Less,
                "Elements out of order in node at depth {}",
                depth
            );
        }
        if let (Some(lower), Some(first)) = (lower, self.elements.first()) {
            assert_eq!(
                cmp.compare(lower, first),
                Ordering::Less,
                "Node at depth {} crosses its lower bound",
                depth
            );
        }
        if let (Some(upper), Some(last)) = (upper, self.elements.last()) {
            assert_eq!(
                cmp.compare(last, upper),
                Ordering::Less,
                "Node at depth {} crosses its upper bound",
                depth
            );
        }

        if self.is_leaf() {
            match *leaf_depth {
                None => *leaf_depth = Some(depth),
                Some(expected) => assert_eq!(
                    depth, expected,
                    "Found leaf at depth {} but other leaves are at depth {}",
                    depth, expected
                ),
            }
            return self.len();
        }

        assert_eq!(
            self.children.len(),
            self.len() + 1,
            "Internal node at depth {} with {} elements has {} children",
            depth,
            self.len(),
            self.children.len()
        );

        let mut count = self.len();
        for (i, child) in self.children.iter().enumerate() {
            let child_lower = if i == 0 {
                lower
            } else {
                Some(&self.elements[i - 1])
            };
            let child_upper = self.elements.get(i).or(upper);
            count += child.assert_invariants(
                factor,
                cmp,
                depth + 1,
                leaf_depth,
                child_lower,
                child_upper,
            );
        }
        count
    }
}

/// Return whether nodes of this branching factor can reserve their storage
pub(super) fn factor_fits<T>(factor: usize) -> bool {
    let children = match factor.checked_mul(2).and_then(|n| n.checked_add(2)) {
        Some(children) if factor > 0 => children,
        _ => return false,
    };
    Layout::array::<T>(children - 1).is_ok() && Layout::array::<Box<Node<T>>>(children).is_ok()
}

fn element_capacity(factor: usize) -> usize {
    2 * factor + 1
}

fn children_capacity(factor: usize) -> usize {
    2 * factor + 2
}

impl<T: Clone> Clone for Node<T> {
    /// Deep copy, keeping the reserved capacity of both arrays
    fn clone(&self) -> Self {
        let mut elements = Vec::with_capacity(self.elements.capacity());
        elements.extend(self.elements.iter().cloned());

        // Recursively clone children
        let mut children = Vec::with_capacity(self.children.capacity());
        children.extend(self.children.iter().cloned());

        Node { elements, children }
    }
}

/// A read-only view of one node of a [`BTree`](crate::BTree), meant for
/// introspection and tests
pub struct NodeRef<'a, T> {
    node: &'a Node<T>,
}

impl<'a, T> NodeRef<'a, T> {
    pub(super) fn new(node: &'a Node<T>) -> Self {
        NodeRef { node }
    }

    /// The sorted elements stored directly in this node
    pub fn elements(&self) -> &'a [T] {
        &self.node.elements
    }

    pub fn len(&self) -> usize {
        self.node.len()
    }

    /// Always `false`: a node reachable from a tree holds at least one element
    pub fn is_empty(&self) -> bool {
        self.node.elements.is_empty()
    }

    pub fn is_leaf(&self) -> bool {
        self.node.is_leaf()
    }

    /// Return the child at `index`, if any
    pub fn child(&self, index: usize) -> Option<NodeRef<'a, T>> {
        self.node.children.get(index).map(|c| NodeRef::new(c))
    }

    /// Iterate over the children of this node, left to right. Empty for leaves
    pub fn children(&self) -> impl ExactSizeIterator<Item = NodeRef<'a, T>> + 'a {
        self.node.children.iter().map(|child| NodeRef::new(child))
    }

    /// Number of levels from this node down to its leaves, itself included
    pub fn height(&self) -> usize {
        self.node.height()
    }
}

impl<'a, T> Clone for NodeRef<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for NodeRef<'a, T> {}

impl<'a, T: fmt::Debug> fmt::Debug for NodeRef<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.node.fmt_depth(f, 0)
    }
}
