//! The tree container: root ownership, path-based lookup and whole-tree operations.

use core::{
    fmt::{self, Debug, Formatter},
    mem,
};

use crate::{
    cursor::{Cursor, Nodes},
    mapping::{Hashed, MappingFamily, Sorted},
    node::Node,
};

/// A tree of optionally-valued nodes addressed by paths of `K` keys.
///
/// A tree always owns exactly one root [`Node`] — never absent, initially value-less and
/// childless, and never itself linked below another node. Everything else about a tree's
/// structure lives in the nodes; the container adds path-based lookup, counting, whole-tree
/// clone/clear/swap and cursor construction on top of the [`Node`] API.
///
/// The third type parameter selects the strategy for the mappings which hold every node's
/// children, defaulting to key-sorted enumeration; see the [`mapping`](crate::mapping) module.
/// [`OrderedTree`] and [`UnorderedTree`] name the two built-in instantiations.
///
/// # Example
/// ```rust
/// use driftwood::OrderedTree;
///
/// let mut tree = OrderedTree::<&str, u32>::new();
/// tree.get_or_insert(&["bin", "cargo"]).set_value(1);
/// tree.get_or_insert(&["bin", "rustc"]).set_value(2);
///
/// assert!(tree.contains(&["bin", "cargo"]));
/// let bin = tree.find(&["bin"]).unwrap();
/// assert_eq!(bin.child_count(), 2);
/// assert!(!bin.has_value()); // intermediate nodes are auto-created value-less
/// assert_eq!(tree.node_count(), 3);
/// assert_eq!(tree.value_count(), 2);
/// ```
pub struct Tree<K, V, F = Sorted>
where
    F: MappingFamily<K>,
{
    root: Node<K, V, F>,
}

/// A tree whose child mappings enumerate in ascending key order.
pub type OrderedTree<K, V> = Tree<K, V, Sorted>;
/// A tree whose child mappings are hash-based; enumeration order is unspecified.
pub type UnorderedTree<K, V> = Tree<K, V, Hashed>;

impl<K, V, F> Tree<K, V, F>
where
    F: MappingFamily<K>,
{
    /// Creates a tree with a fresh value-less, childless root.
    pub fn new() -> Self {
        Self { root: Node::new() }
    }
    /// Creates a tree owning the given node as its root.
    ///
    /// # Panics
    /// Panics if the node is currently linked below a parent — a tree root cannot be someone
    /// else's child. Call [`Node::detach`] or [`Node::deep_clone`] first.
    pub fn from_root(root: Node<K, V, F>) -> Self {
        assert!(
            root.parent().is_none(),
            "a tree root must not have a parent; detach or deep-clone the node first"
        );
        Self { root }
    }

    /// Returns the root node. Clone the returned handle to keep one around independently of the
    /// tree.
    pub fn root(&self) -> &Node<K, V, F> {
        &self.root
    }

    /// Returns a cursor at the tree's first pre-order position (the root's first child), or at
    /// the end position if the root has no children.
    pub fn cursor(&self) -> Cursor<K, V, F> {
        Cursor::first(self.root.link())
    }
    /// Returns a cursor at the tree's end position.
    pub fn cursor_end(&self) -> Cursor<K, V, F> {
        Cursor::end(self.root.link())
    }
    /// Iterates over every node below the root in pre-order, value-bearing or not.
    pub fn nodes(&self) -> Nodes<K, V, F> {
        Nodes::new(self.cursor())
    }

    /// Returns `true` if the path leads to a node. The empty path always does (it names the
    /// root).
    pub fn contains(&self, path: &[K]) -> bool {
        self.find(path).is_some()
    }
    /// Returns `true` if the root has a child at the specified key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.root.contains_child(key)
    }
    /// Descends from the root along the path, returning the node it leads to, or `None` as soon
    /// as any step misses. Never creates nodes.
    pub fn find(&self, path: &[K]) -> Option<Node<K, V, F>> {
        self.root.find(path)
    }
    /// Returns the node at the path, auto-vivifying a value-less node at every missing step
    /// along the way.
    pub fn get_or_insert(&mut self, path: &[K]) -> Node<K, V, F>
    where
        K: Clone,
    {
        let mut node = self.root.clone();
        for key in path {
            node = node.child_or_insert(key.clone());
        }
        node
    }

    /// Counts the pre-order positions of the tree — every node below the root.
    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }
    /// Counts the pre-order positions whose node holds a value.
    pub fn value_count(&self) -> usize {
        self.nodes().filter(Node::has_value).count()
    }

    /// Removes the root's value and all of its children. The root cell itself stays the same
    /// node: handles and weak handles onto it keep resolving.
    pub fn clear(&mut self) {
        self.root.clear_value();
        self.root.clear_children();
    }
    /// Exchanges the roots of two trees in constant time.
    ///
    /// Handles and cursors reference nodes directly rather than through the tree object, so all
    /// of them remain valid — they now conceptually belong to the other tree.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.root, &mut other.root);
    }
}

impl<K, V, F> Default for Tree<K, V, F>
where
    F: MappingFamily<K>,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, F> Clone for Tree<K, V, F>
where
    K: Clone,
    V: Clone,
    F: MappingFamily<K>,
{
    /// Deep-copies the whole tree into a new, fully independent one.
    fn clone(&self) -> Self {
        Self {
            root: self.root.deep_clone(),
        }
    }
}

impl<K, V, F> Debug for Tree<K, V, F>
where
    V: Debug,
    F: MappingFamily<K>,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree").field("root", &self.root).finish()
    }
}
