//! Stateful pre-order traversal over the nodes of a tree.
//!
//! A [`Cursor`] visits every node below a tree's root — whether or not it currently holds a
//! value — in pre-order: a node before its children, children before subsequent siblings, with
//! siblings following the child mapping's enumeration order. Unlike an iterator it is
//! bidirectional: [`advance`](Cursor::advance) and [`retreat`](Cursor::retreat) move it one
//! pre-order position forward or backward, and both are no-ops at their respective boundary.
//!
//! [`Nodes`] wraps a cursor into a plain [`Iterator`] over strong handles for the common
//! forward-only case.

use core::{
    fmt::{self, Debug, Formatter},
    iter::FusedIterator,
};
use std::rc::Rc;

use crate::{
    mapping::{MappingFamily, Sorted},
    node::{first_child, key_of, last_child, next_sibling, parent_of, path_of, prev_sibling, Link, Node},
};

/// A bidirectional pre-order cursor over the nodes below a tree's root.
///
/// The positions of a cursor are the root's *strict descendants*: the first position of a tree
/// is the root's first child, and a tree with a bare root has no positions at all, so its first
/// position already equals [`end`](Cursor::is_end). The end position is distinguished from every
/// real node and is safe to compare against.
///
/// A cursor holds a strong reference to the cell it currently rests on, so the node it points at
/// cannot be reclaimed out from under it even if the tree is mutated while the cursor is parked.
pub struct Cursor<K, V, F = Sorted>
where
    F: MappingFamily<K>,
{
    root: Link<K, V, F>,
    current: Link<K, V, F>,
    at_end: bool,
}

impl<K, V, F> Cursor<K, V, F>
where
    F: MappingFamily<K>,
{
    /// A cursor at the first pre-order position below `root`, or at the end if there is none.
    pub(crate) fn first(root: &Link<K, V, F>) -> Self {
        match first_child(root) {
            Some(child) => Self {
                root: Rc::clone(root),
                current: child,
                at_end: false,
            },
            None => Self::end(root),
        }
    }
    /// A cursor at the end position of the tree anchored at `root`.
    pub(crate) fn end(root: &Link<K, V, F>) -> Self {
        Self {
            root: Rc::clone(root),
            current: Rc::clone(root),
            at_end: true,
        }
    }

    /// Returns `true` if the cursor rests at the end position.
    pub fn is_end(&self) -> bool {
        self.at_end
    }
    /// Returns `true` if the node at the current position holds a value.
    ///
    /// This mirrors presence of a value, *not* validity of the position; at the end position it
    /// is `false`. Nodes without values are still visited.
    pub fn has_value(&self) -> bool {
        !self.at_end && self.current.borrow().value.is_some()
    }
    /// Returns a strong handle onto the node at the current position, or `None` at the end
    /// position. The handle stays usable independently of any further cursor movement.
    pub fn node(&self) -> Option<Node<K, V, F>> {
        if self.at_end {
            None
        } else {
            Some(Node::from_link(Rc::clone(&self.current)))
        }
    }
    /// Reconstructs the full path of the node at the current position; empty at the end
    /// position. Costs a parent scan per level, as with [`Node::path`].
    pub fn path(&self) -> Vec<K>
    where
        K: Clone,
    {
        if self.at_end {
            Vec::new()
        } else {
            path_of(&self.current)
        }
    }
    /// Reconstructs the key of the node at the current position within its parent; `None` at
    /// the end position.
    pub fn key(&self) -> Option<K>
    where
        K: Clone,
    {
        if self.at_end {
            None
        } else {
            key_of(&self.current)
        }
    }

    /// Moves to the next pre-order position: the first child if there is one, otherwise the next
    /// sibling of the nearest ancestor (the node itself included) that has one. Runs off to the
    /// end position when no such sibling exists; at the end position this is a no-op.
    pub fn advance(&mut self) {
        if self.at_end {
            return;
        }
        if let Some(child) = first_child(&self.current) {
            self.current = child;
            return;
        }
        let mut cursor = Rc::clone(&self.current);
        loop {
            let Some(parent) = parent_of(&cursor) else {
                // only reachable if the node was detached mid-traversal
                self.park_at_end();
                return;
            };
            if let Some(sibling) = next_sibling(&parent, &cursor) {
                self.current = sibling;
                return;
            }
            if Rc::ptr_eq(&parent, &self.root) {
                self.park_at_end();
                return;
            }
            cursor = parent;
        }
    }

    /// Moves to the previous pre-order position, symmetrically to [`advance`](Cursor::advance):
    /// from the end position, to the deepest rightmost-by-enumeration descendant of the root;
    /// from a real position, to the deepest rightmost descendant of the preceding sibling, or to
    /// the parent when the node is its parent's first child. At the first position this is a
    /// no-op.
    pub fn retreat(&mut self) {
        if self.at_end {
            if let Some(last) = last_child(&self.root) {
                self.current = deepest_rightmost(last);
                self.at_end = false;
            }
            return;
        }
        let Some(parent) = parent_of(&self.current) else {
            // detached mid-traversal; nowhere to go
            return;
        };
        if let Some(sibling) = prev_sibling(&parent, &self.current) {
            self.current = deepest_rightmost(sibling);
        } else if !Rc::ptr_eq(&parent, &self.root) {
            self.current = parent;
        }
    }

    fn park_at_end(&mut self) {
        self.current = Rc::clone(&self.root);
        self.at_end = true;
    }
}

/// Descends along last children until reaching a leaf — the pre-order-last node of a subtree.
fn deepest_rightmost<K, V, F>(mut cell: Link<K, V, F>) -> Link<K, V, F>
where
    F: MappingFamily<K>,
{
    while let Some(last) = last_child(&cell) {
        cell = last;
    }
    cell
}

impl<K, V, F> Clone for Cursor<K, V, F>
where
    F: MappingFamily<K>,
{
    fn clone(&self) -> Self {
        Self {
            root: Rc::clone(&self.root),
            current: Rc::clone(&self.current),
            at_end: self.at_end,
        }
    }
}

impl<K, V, F> PartialEq for Cursor<K, V, F>
where
    F: MappingFamily<K>,
{
    /// Two cursors are equal iff they are anchored at the same root and rest at the same
    /// position (both at the end, or both at the identical node).
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.root, &other.root)
            && self.at_end == other.at_end
            && Rc::ptr_eq(&self.current, &other.current)
    }
}
impl<K, V, F> Eq for Cursor<K, V, F> where F: MappingFamily<K> {}

impl<K, V, F> Debug for Cursor<K, V, F>
where
    F: MappingFamily<K>,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor").field("at_end", &self.at_end).finish_non_exhaustive()
    }
}

/// A forward-only iterator over the nodes below a tree's root in pre-order, yielding a strong
/// handle for every position — value-bearing or not.
///
/// Created by [`Tree::nodes`](crate::Tree::nodes).
pub struct Nodes<K, V, F = Sorted>
where
    F: MappingFamily<K>,
{
    cursor: Cursor<K, V, F>,
}

impl<K, V, F> Nodes<K, V, F>
where
    F: MappingFamily<K>,
{
    pub(crate) fn new(cursor: Cursor<K, V, F>) -> Self {
        Self { cursor }
    }
}

impl<K, V, F> Iterator for Nodes<K, V, F>
where
    F: MappingFamily<K>,
{
    type Item = Node<K, V, F>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cursor.node()?;
        self.cursor.advance();
        Some(node)
    }
}
impl<K, V, F> FusedIterator for Nodes<K, V, F> where F: MappingFamily<K> {}

impl<K, V, F> Clone for Nodes<K, V, F>
where
    F: MappingFamily<K>,
{
    fn clone(&self) -> Self {
        Self {
            cursor: self.cursor.clone(),
        }
    }
}

impl<K, V, F> Debug for Nodes<K, V, F>
where
    F: MappingFamily<K>,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Nodes").field("cursor", &self.cursor).finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crate::{OrderedTree, Tree};

    /// Root with children 0 and 1, node 0 with children 2 and 3, node 2 with children 4 and 5;
    /// every node's value equals its own key.
    fn sample() -> OrderedTree<u32, u32> {
        let tree = OrderedTree::new();
        let n0 = tree.root().new_child(0);
        let n1 = tree.root().new_child(1);
        let n2 = n0.new_child(2);
        let n3 = n0.new_child(3);
        let n4 = n2.new_child(4);
        let n5 = n2.new_child(5);
        for node in [&n0, &n1, &n2, &n3, &n4, &n5] {
            node.set_value(node.key().unwrap());
        }
        tree
    }

    fn forward_values(tree: &OrderedTree<u32, u32>) -> Vec<u32> {
        let mut values = Vec::new();
        let mut cursor = tree.cursor();
        while !cursor.is_end() {
            if cursor.has_value() {
                values.push(cursor.node().unwrap().value_or(u32::MAX));
            }
            cursor.advance();
        }
        values
    }

    #[test]
    fn preorder_forward() {
        let tree = sample();
        assert_eq!(forward_values(&tree), vec![0, 2, 4, 5, 3, 1]);
    }

    #[test]
    fn preorder_visits_every_value_once() {
        let tree = sample();
        let mut values = forward_values(&tree);
        values.sort_unstable();
        assert_eq!(values, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn retreat_is_reverse_of_advance() {
        let tree = sample();
        let mut cursor = tree.cursor_end();
        let mut values = Vec::new();
        loop {
            let before = cursor.clone();
            cursor.retreat();
            if cursor == before {
                break;
            }
            values.push(cursor.node().unwrap().value_or(u32::MAX));
        }
        assert_eq!(values, vec![1, 3, 5, 4, 2, 0]);
    }

    #[test]
    fn root_only_tree_has_no_positions() {
        let tree = Tree::<u32, u32>::new();
        assert_eq!(tree.cursor(), tree.cursor_end());

        let mut cursor = tree.cursor_end();
        cursor.retreat();
        assert!(cursor.is_end());
        assert_eq!(cursor, tree.cursor());
    }

    #[test]
    fn advance_at_end_is_idempotent() {
        let tree = sample();
        let mut cursor = tree.cursor();
        for _ in 0..16 {
            cursor.advance();
        }
        assert!(cursor.is_end());
        assert_eq!(cursor, tree.cursor_end());
    }

    #[test]
    fn advance_then_retreat_round_trips() {
        let tree = sample();
        let mut cursor = tree.cursor();
        while !cursor.is_end() {
            let here = cursor.clone();
            cursor.advance();
            let mut back = cursor.clone();
            back.retreat();
            if !cursor.is_end() {
                assert_eq!(back, here);
            }
        }
        // the last advance parked at end; retreating returns to the pre-order-last node
        let mut back = cursor.clone();
        back.retreat();
        assert_eq!(back.node().unwrap().value_or(u32::MAX), 1);
    }

    #[test]
    fn valueless_positions_are_visited() {
        let tree = Tree::<u32, u32>::new();
        tree.root().new_child(7); // no value
        let cursor = tree.cursor();
        assert!(!cursor.is_end());
        assert!(!cursor.has_value());
        assert!(cursor.node().is_some());
    }

    #[test]
    fn cursor_reports_paths() {
        let tree = sample();
        let mut cursor = tree.cursor();
        assert_eq!(cursor.path(), vec![0]);
        assert_eq!(cursor.key(), Some(0));
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.path(), vec![0, 2, 4]);
        assert_eq!(cursor.key(), Some(4));

        assert_eq!(tree.cursor_end().path(), Vec::<u32>::new());
        assert_eq!(tree.cursor_end().key(), None);
    }

    #[test]
    fn node_handles_outlive_cursor_movement() {
        let tree = sample();
        let mut cursor = tree.cursor();
        let pinned = cursor.node().unwrap();
        while !cursor.is_end() {
            cursor.advance();
        }
        assert_eq!(pinned.value_or(u32::MAX), 0);
        assert_eq!(pinned.path(), vec![0]);
    }

    #[test]
    fn nodes_iterator_matches_cursor_walk() {
        let tree = sample();
        let via_iter: Vec<_> = tree.nodes().filter_map(|n| n.key()).collect();
        assert_eq!(via_iter, vec![0, 2, 4, 5, 3, 1]);
        assert_eq!(tree.nodes().count(), tree.node_count());
    }
}
