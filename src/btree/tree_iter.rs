use super::node::Node;
use super::DEFAULT_ITER_DEPTH;
use arrayvec::ArrayVec;

struct TreeIterState<'a, T> {
    node: &'a Node<T>,
    /// Next child to descend into or element to return, in `0..=node.len()`
    pos: usize,
}

impl<'a, T> Clone for TreeIterState<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for TreeIterState<'a, T> {}

/// In-order iterator over the elements of a [`BTree`](crate::BTree).
///
/// The path from the root to the current node is kept in a fixed stack of
/// `DEPTH` frames. Once exhausted, it keeps returning `None`
pub struct TreeIter<'a, T, const DEPTH: usize = DEFAULT_ITER_DEPTH> {
    /// List of nodes from the root down to the current one, with the position in each
    states: ArrayVec<TreeIterState<'a, T>, DEPTH>,
    len: usize,
}

impl<'a, T, const DEPTH: usize> TreeIter<'a, T, DEPTH> {
    /// The caller must have checked that the tree height is at most `DEPTH`
    pub(super) fn new(root: Option<&'a Node<T>>, len: usize) -> Self {
        let mut states = ArrayVec::new();
        if let Some(node) = root {
            states.push(TreeIterState { node, pos: 0 });
        }
        TreeIter { states, len }
    }
}

impl<'a, T, const DEPTH: usize> Iterator for TreeIter<'a, T, DEPTH> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        // Whether the child at the top frame's position was just fully visited
        let mut visited_child = false;
        loop {
            let top = self.states.len().checked_sub(1)?;
            let TreeIterState { node, pos } = self.states[top];

            if pos > node.len() {
                // Keep the root frame so that later calls still return `None`
                if top == 0 {
                    return None;
                }
                self.states.pop();
                visited_child = true;
            } else if !node.is_leaf() && !visited_child {
                // Cannot overflow: the stack holds as many frames as the tree has levels
                self.states.push(TreeIterState {
                    node: node.get_child(pos),
                    pos: 0,
                });
            } else if pos < node.len() {
                self.states[top].pos += 1;
                self.len -= 1;
                return Some(node.get_element(pos));
            } else {
                self.states[top].pos += 1;
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T, const DEPTH: usize> ExactSizeIterator for TreeIter<'a, T, DEPTH> {}
impl<'a, T, const DEPTH: usize> std::iter::FusedIterator for TreeIter<'a, T, DEPTH> {}

impl<'a, T, const DEPTH: usize> Clone for TreeIter<'a, T, DEPTH> {
    fn clone(&self) -> Self {
        TreeIter {
            states: self.states.clone(),
            len: self.len,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::BTree;

    #[test]
    fn empty() {
        let tree = BTree::<i32>::new();
        let mut iter = tree.iter();
        assert_eq!(iter.len(), 0);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn stays_exhausted() {
        let tree: BTree<i32> = (0..50).collect();
        let mut iter = tree.iter();
        assert_eq!(iter.by_ref().count(), 50);
        for _ in 0..5 {
            assert_eq!(iter.next(), None);
        }
        assert_eq!(iter.len(), 0);
    }

    #[test]
    fn exact_size() {
        let tree: BTree<i32> = (0..100).collect();
        let mut iter = tree.iter();
        for remaining in (1..=100).rev() {
            assert_eq!(iter.len(), remaining);
            assert!(iter.next().is_some());
        }
        assert_eq!(iter.len(), 0);
        assert_eq!(iter.size_hint(), (0, Some(0)));
    }

    #[test]
    fn independent_clones() {
        let tree: BTree<i32> = (0..30).collect();
        let mut iter = tree.iter();
        iter.nth(9);
        let cloned = iter.clone();
        assert!(iter.copied().eq(10..30));
        assert!(cloned.copied().eq(10..30));
    }

    #[test]
    fn fresh_traversal_sees_new_elements() {
        let mut tree: BTree<i32> = (0..10).collect();
        assert_eq!(tree.iter().count(), 10);
        tree.extend(10..20);
        assert_eq!(tree.iter().count(), 20);
        assert!(tree.iter().copied().eq(0..20));
    }

    #[test]
    fn exact_depth() {
        // Every level needs exactly one frame
        let tree: BTree<i32> = (0..1000).collect();
        let height = tree.height();
        assert!(height >= 4);
        match height {
            4 => assert!(tree.try_iter::<4>().unwrap().copied().eq(0..1000)),
            5 => assert!(tree.try_iter::<5>().unwrap().copied().eq(0..1000)),
            6 => assert!(tree.try_iter::<6>().unwrap().copied().eq(0..1000)),
            _ => unreachable!("1000 elements with factor 2 need 4 to 6 levels"),
        }
        assert!(tree.try_iter::<3>().is_err());
    }

    #[test]
    fn into_iterator() {
        let tree: BTree<i32> = vec![5, 3, 9, 1].into_iter().collect();
        let mut collected = Vec::new();
        for value in &tree {
            collected.push(*value);
        }
        assert_eq!(collected, vec![1, 3, 5, 9]);
    }
}
