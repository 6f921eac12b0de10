//! Nodes of a tree and the handle types used to work with them.
//!
//! A node is owned by reference counting: its parent's child mapping and every live [`Node`]
//! handle each hold a strong reference to the same cell, while the cell points back at its
//! parent through a weak reference only. A child therefore never keeps its parent alive, the
//! parent-to-child direction is the only owning one, and `parent()` navigation still works —
//! without ever forming a reference cycle.
//!
//! [`Node`] is the strong, ownership-sharing handle and the primary API of the crate.
//! [`WeakNode`] observes a cell without keeping it alive. Both are cheap to clone; cloning a
//! handle never copies the subtree (use [`Node::deep_clone`] for that).

use core::fmt::{self, Debug, Formatter};
use std::{
    cell::{Ref, RefCell, RefMut},
    rc::{Rc, Weak},
};

use crate::mapping::{Mapping, MappingFamily, Sorted};

#[cfg(test)]
mod tests;

pub(crate) type Link<K, V, F> = Rc<RefCell<NodeData<K, V, F>>>;
pub(crate) type WeakLink<K, V, F> = Weak<RefCell<NodeData<K, V, F>>>;

/// The unit of tree state: an optional value, the keyed child links and the non-owning
/// back-reference to the parent cell.
pub(crate) struct NodeData<K, V, F>
where
    F: MappingFamily<K>,
{
    pub(crate) value: Option<V>,
    pub(crate) children: F::Map<Link<K, V, F>>,
    pub(crate) parent: WeakLink<K, V, F>,
}

impl<K, V, F> NodeData<K, V, F>
where
    F: MappingFamily<K>,
{
    fn with_parent(parent: WeakLink<K, V, F>) -> Self {
        Self {
            value: None,
            children: Mapping::new(),
            parent,
        }
    }
}

fn new_cell<K, V, F>(parent: WeakLink<K, V, F>) -> Link<K, V, F>
where
    F: MappingFamily<K>,
{
    Rc::new(RefCell::new(NodeData::with_parent(parent)))
}

pub(crate) fn parent_of<K, V, F>(cell: &Link<K, V, F>) -> Option<Link<K, V, F>>
where
    F: MappingFamily<K>,
{
    let parent = cell.borrow().parent.upgrade();
    parent
}

pub(crate) fn first_child<K, V, F>(cell: &Link<K, V, F>) -> Option<Link<K, V, F>>
where
    F: MappingFamily<K>,
{
    let data = cell.borrow();
    data.children.first().map(|(_, link)| Rc::clone(link))
}

pub(crate) fn last_child<K, V, F>(cell: &Link<K, V, F>) -> Option<Link<K, V, F>>
where
    F: MappingFamily<K>,
{
    let data = cell.borrow();
    data.children.iter().last().map(|(_, link)| Rc::clone(link))
}

/// Locates `of` among `parent`'s children by identity and returns the entry right after it in
/// enumeration order.
pub(crate) fn next_sibling<K, V, F>(parent: &Link<K, V, F>, of: &Link<K, V, F>) -> Option<Link<K, V, F>>
where
    F: MappingFamily<K>,
{
    let data = parent.borrow();
    let mut entries = data.children.iter();
    while let Some((_, link)) = entries.next() {
        if Rc::ptr_eq(link, of) {
            return entries.next().map(|(_, next)| Rc::clone(next));
        }
    }
    None
}

/// Locates `of` among `parent`'s children by identity and returns the entry right before it in
/// enumeration order.
pub(crate) fn prev_sibling<K, V, F>(parent: &Link<K, V, F>, of: &Link<K, V, F>) -> Option<Link<K, V, F>>
where
    F: MappingFamily<K>,
{
    let data = parent.borrow();
    let mut previous = None;
    for (_, link) in data.children.iter() {
        if Rc::ptr_eq(link, of) {
            return previous.map(|link: &Link<K, V, F>| Rc::clone(link));
        }
        previous = Some(link);
    }
    None
}

fn depth_of<K, V, F>(cell: &Link<K, V, F>) -> usize
where
    F: MappingFamily<K>,
{
    match parent_of(cell) {
        Some(parent) => depth_of(&parent) + 1,
        None => 0,
    }
}

/// Reconstructs the key a cell is linked under by scanning its parent's children for the
/// identical link. There is no reverse index from a cell to its own key, so this costs
/// O(siblings); see the crate documentation on why the trade-off is kept.
pub(crate) fn key_of<K, V, F>(cell: &Link<K, V, F>) -> Option<K>
where
    K: Clone,
    F: MappingFamily<K>,
{
    let parent = parent_of(cell)?;
    let data = parent.borrow();
    let key = data
        .children
        .iter()
        .find(|(_, link)| Rc::ptr_eq(link, cell))
        .map(|(key, _)| key.clone());
    key
}

/// Reconstructs the full path from the root by prepending, level by level, the key found by the
/// same parent scan as [`key_of`]. A parentless cell yields an empty path.
pub(crate) fn path_of<K, V, F>(cell: &Link<K, V, F>) -> Vec<K>
where
    K: Clone,
    F: MappingFamily<K>,
{
    match key_of(cell) {
        Some(key) => {
            // key_of succeeding implies the parent is still there
            let parent = parent_of(cell).map_or_else(Vec::new, |parent| path_of(&parent));
            let mut path = parent;
            path.push(key);
            path
        }
        None => Vec::new(),
    }
}

fn find_cell<K, V, F>(start: &Link<K, V, F>, path: &[K]) -> Option<Link<K, V, F>>
where
    F: MappingFamily<K>,
{
    let mut current = Rc::clone(start);
    for key in path {
        let next = {
            let data = current.borrow();
            data.children.get(key).map(Rc::clone)
        };
        current = next?;
    }
    Some(current)
}

/// Deep-copies a cell: the value is cloned, every child is recursively cloned and rewired to
/// point at its new parent. The returned cell itself is parentless.
fn clone_cell<K, V, F>(cell: &Link<K, V, F>) -> Link<K, V, F>
where
    K: Clone,
    V: Clone,
    F: MappingFamily<K>,
{
    let source = cell.borrow();
    let clone = new_cell(Weak::new());
    clone.borrow_mut().value = source.value.clone();
    {
        let mut data = clone.borrow_mut();
        for (key, child) in source.children.iter() {
            let child_clone = clone_cell(child);
            child_clone.borrow_mut().parent = Rc::downgrade(&clone);
            data.children.insert(key.clone(), child_clone);
        }
    }
    clone
}

/// A strong, sharable handle onto a node of a tree.
///
/// Any number of handles may reference the same node; the node's storage is reclaimed only once
/// no handle and no parent linkage references it anymore. Equality between handles is *identity*
/// of the referenced node, never equality of the stored values:
///
/// ```rust
/// use driftwood::Node;
///
/// let a = Node::<&str, i32>::new();
/// let b = Node::<&str, i32>::new();
/// a.set_value(451);
/// b.set_value(451);
/// assert_ne!(a, b); // distinct nodes, same payload
/// assert_eq!(a, a.clone()); // the same node
/// ```
///
/// Cloning a handle shares the node, exactly like cloning an [`Rc`]; use
/// [`deep_clone`](Self::deep_clone) to copy the subtree instead.
///
/// Methods which return borrow guards ([`value`](Self::value), [`value_mut`](Self::value_mut))
/// panic if a conflicting guard for the same node is still alive, as with any [`RefCell`].
pub struct Node<K, V, F = Sorted>
where
    F: MappingFamily<K>,
{
    cell: Link<K, V, F>,
}

impl<K, V, F> Node<K, V, F>
where
    F: MappingFamily<K>,
{
    /// Creates a value-less, childless orphan node, usable as a fresh tree root or for attaching
    /// below another node later.
    pub fn new() -> Self {
        Self {
            cell: new_cell(Weak::new()),
        }
    }

    pub(crate) fn from_link(cell: Link<K, V, F>) -> Self {
        Self { cell }
    }

    pub(crate) fn link(&self) -> &Link<K, V, F> {
        &self.cell
    }

    /// Returns `true` if the node currently holds a value.
    ///
    /// Whether a value is present is independent of whether the node has children.
    pub fn has_value(&self) -> bool {
        self.cell.borrow().value.is_some()
    }
    /// Returns a borrow of the stored value, or `None` if there is none.
    ///
    /// This is the pure-lookup accessor: it never creates a value. The guard must be dropped
    /// before the node's value is mutated again.
    pub fn value(&self) -> Option<Ref<'_, V>> {
        Ref::filter_map(self.cell.borrow(), |data| data.value.as_ref()).ok()
    }
    /// Returns a copy of the stored value, or the supplied default if there is none. Never
    /// mutates the node.
    pub fn value_or(&self, default: V) -> V
    where
        V: Clone,
    {
        self.cell.borrow().value.clone().unwrap_or(default)
    }
    /// Returns a mutable borrow of the stored value, **auto-vivifying** a defaulted value first
    /// if none is present.
    ///
    /// This is the mechanism by which plain assignment works uniformly whether or not a value
    /// previously existed:
    ///
    /// ```rust
    /// use driftwood::Node;
    ///
    /// let node = Node::<&str, i32>::new();
    /// assert!(!node.has_value());
    /// *node.value_mut() = 42; // creates the value
    /// *node.value_mut() += 1; // mutates it in place
    /// assert_eq!(node.value_or(0), 43);
    /// ```
    pub fn value_mut(&self) -> RefMut<'_, V>
    where
        V: Default,
    {
        RefMut::map(self.cell.borrow_mut(), |data| {
            data.value.get_or_insert_with(V::default)
        })
    }
    /// Stores a value in the node, replacing any previous one.
    pub fn set_value(&self, value: V) {
        self.cell.borrow_mut().value = Some(value);
    }
    /// Removes and returns the stored value, leaving the node value-less.
    pub fn take_value(&self) -> Option<V> {
        self.cell.borrow_mut().value.take()
    }
    /// Removes the stored value, if any.
    pub fn clear_value(&self) {
        self.cell.borrow_mut().value = None;
    }

    /// Returns `true` if a child is linked under the specified key.
    pub fn contains_child(&self, key: &K) -> bool {
        self.cell.borrow().children.contains(key)
    }
    /// Returns the number of direct children.
    pub fn child_count(&self) -> usize {
        self.cell.borrow().children.len()
    }
    /// Returns `true` if the node has at least one child.
    pub fn has_children(&self) -> bool {
        !self.cell.borrow().children.is_empty()
    }
    /// Returns handles onto the current children, in enumeration order.
    ///
    /// The list is a snapshot: mutating the tree afterwards does not affect it.
    pub fn children(&self) -> Vec<Node<K, V, F>> {
        let data = self.cell.borrow();
        data.children
            .iter()
            .map(|(_, link)| Self::from_link(Rc::clone(link)))
            .collect()
    }
    /// Returns a handle onto the child at the specified key, or `None` if there is none. Never
    /// creates a child; see [`child_or_insert`](Self::child_or_insert) for the creating form.
    pub fn child(&self, key: &K) -> Option<Node<K, V, F>> {
        let data = self.cell.borrow();
        data.children
            .get(key)
            .map(|link| Self::from_link(Rc::clone(link)))
    }
    /// Links the given node below this one at the specified key, re-parenting it.
    ///
    /// The node is silently stolen away from any prior parent, and a previous occupant of the
    /// key is unlinked (its parent reference is cleared; it stays alive for as long as strong
    /// handles onto it exist).
    ///
    /// # Panics
    /// Panics if `child` is this node itself or one of its ancestors — linking it would make a
    /// node a descendant of itself.
    ///
    /// # Example
    /// ```rust
    /// use driftwood::Node;
    ///
    /// let root = Node::<&str, i32>::new();
    /// let limb = Node::new();
    /// limb.set_value(7);
    /// root.insert_child("limb", limb.clone());
    /// assert_eq!(root.child(&"limb"), Some(limb));
    /// ```
    pub fn insert_child(&self, key: K, child: Node<K, V, F>) {
        let mut scan = Some(Rc::clone(&self.cell));
        while let Some(cell) = scan {
            assert!(
                !Rc::ptr_eq(&cell, &child.cell),
                "cannot insert a node below itself"
            );
            scan = parent_of(&cell);
        }
        child.detach();
        child.cell.borrow_mut().parent = Rc::downgrade(&self.cell);
        let displaced = self
            .cell
            .borrow_mut()
            .children
            .insert(key, Rc::clone(&child.cell));
        if let Some(displaced) = displaced {
            displaced.borrow_mut().parent = Weak::new();
        }
    }
    /// Creates a fresh value-less node, links it below this one at the specified key and returns
    /// a handle onto it. A previous occupant of the key is unlinked.
    pub fn new_child(&self, key: K) -> Node<K, V, F> {
        let child = new_cell(Rc::downgrade(&self.cell));
        let displaced = self
            .cell
            .borrow_mut()
            .children
            .insert(key, Rc::clone(&child));
        if let Some(displaced) = displaced {
            displaced.borrow_mut().parent = Weak::new();
        }
        Self::from_link(child)
    }
    /// Returns a handle onto the child at the specified key, auto-vivifying a value-less child
    /// there first if the key is absent.
    ///
    /// Repeated calls with the same key keep returning the same node:
    ///
    /// ```rust
    /// use driftwood::Node;
    ///
    /// let root = Node::<&str, i32>::new();
    /// let first = root.child_or_insert("a");
    /// let second = root.child_or_insert("a");
    /// assert_eq!(first, second);
    /// assert_eq!(root.child_count(), 1);
    /// ```
    pub fn child_or_insert(&self, key: K) -> Node<K, V, F> {
        let mut data = self.cell.borrow_mut();
        let link = data
            .children
            .get_or_insert_with(key, || new_cell(Rc::downgrade(&self.cell)));
        Self::from_link(Rc::clone(link))
    }
    /// Removes and unlinks the child at the specified key, returning the detached handle so the
    /// caller retains ownership of the subtree below it. Returns `None` if the key is absent.
    pub fn take_child(&self, key: &K) -> Option<Node<K, V, F>> {
        let link = self.cell.borrow_mut().children.remove(key)?;
        link.borrow_mut().parent = Weak::new();
        Some(Self::from_link(link))
    }
    /// Removes and unlinks the child at the specified key, returning whether one was present.
    ///
    /// The removed node is not necessarily destroyed — other strong handles may still own it,
    /// and weak handles onto it stay valid for as long as any do.
    pub fn remove_child(&self, key: &K) -> bool {
        let link = self.cell.borrow_mut().children.remove(key);
        match link {
            Some(link) => {
                link.borrow_mut().parent = Weak::new();
                true
            }
            None => false,
        }
    }
    /// Removes and unlinks all children.
    pub fn clear_children(&self) {
        let links: Vec<Link<K, V, F>> = {
            let data = self.cell.borrow();
            data.children.iter().map(|(_, link)| Rc::clone(link)).collect()
        };
        self.cell.borrow_mut().children.clear();
        for link in links {
            link.borrow_mut().parent = Weak::new();
        }
    }

    /// Returns the number of ancestors of the node: 0 for a root or detached node, one more
    /// than its parent's depth otherwise.
    pub fn depth(&self) -> usize {
        depth_of(&self.cell)
    }
    /// Reconstructs the node's full path from the root.
    ///
    /// The path is reconstructed by scanning, at each level, the parent's children for the entry
    /// linked to this node — an O(siblings-per-level) walk. A root or detached node yields an
    /// empty path.
    pub fn path(&self) -> Vec<K>
    where
        K: Clone,
    {
        path_of(&self.cell)
    }
    /// Reconstructs the last segment of the node's path — the key it is linked under within its
    /// parent — or `None` for a root or detached node.
    pub fn key(&self) -> Option<K>
    where
        K: Clone,
    {
        key_of(&self.cell)
    }
    /// Returns a handle onto the parent node, or `None` for a root or detached node.
    pub fn parent(&self) -> Option<Node<K, V, F>> {
        parent_of(&self.cell).map(Self::from_link)
    }
    /// Descends from this node along the specified path, returning the node it leads to or
    /// `None` as soon as any step misses. An empty path returns this node itself.
    pub fn find(&self, path: &[K]) -> Option<Node<K, V, F>> {
        find_cell(&self.cell, path).map(Self::from_link)
    }

    /// Unlinks the node from its parent, turning it into the root of its own detached subtree.
    ///
    /// The children below it are untouched and remain reachable through this handle. Detaching
    /// a node that has no parent is a no-op.
    ///
    /// # Example
    /// ```rust
    /// use driftwood::Node;
    ///
    /// let root = Node::<&str, i32>::new();
    /// let branch = root.new_child("branch");
    /// branch.new_child("twig");
    ///
    /// branch.detach();
    /// assert!(branch.parent().is_none());
    /// assert!(!root.contains_child(&"branch"));
    /// assert!(branch.contains_child(&"twig")); // the subtree survives
    /// ```
    pub fn detach(&self) {
        let parent = parent_of(&self.cell);
        if let Some(parent) = parent {
            parent
                .borrow_mut()
                .children
                .remove_where(|link| Rc::ptr_eq(link, &self.cell));
        }
        self.cell.borrow_mut().parent = Weak::new();
    }
    /// Deep-copies the node and everything below it into a new, parentless, fully independent
    /// subtree and returns a handle onto its root.
    ///
    /// ```rust
    /// use driftwood::Node;
    ///
    /// let original = Node::<&str, i32>::new();
    /// original.child_or_insert("a").set_value(1);
    ///
    /// let copy = original.deep_clone();
    /// assert_ne!(copy, original); // a different node...
    /// copy.child(&"a").unwrap().set_value(2);
    /// assert_eq!(original.child(&"a").unwrap().value_or(0), 1); // ...with independent state
    /// ```
    pub fn deep_clone(&self) -> Node<K, V, F>
    where
        K: Clone,
        V: Clone,
    {
        Self::from_link(clone_cell(&self.cell))
    }
    /// Creates a weak observer handle onto the node.
    pub fn downgrade(&self) -> WeakNode<K, V, F> {
        WeakNode {
            cell: Rc::downgrade(&self.cell),
        }
    }
}

impl<K, V, F> Default for Node<K, V, F>
where
    F: MappingFamily<K>,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, F> Clone for Node<K, V, F>
where
    F: MappingFamily<K>,
{
    /// Clones the *handle*; the node itself is shared, not copied.
    #[inline]
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<K, V, F> PartialEq for Node<K, V, F>
where
    F: MappingFamily<K>,
{
    /// Identity equality: two handles are equal iff they reference the same node.
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}
impl<K, V, F> Eq for Node<K, V, F> where F: MappingFamily<K> {}

impl<K, V, F> Debug for Node<K, V, F>
where
    V: Debug,
    F: MappingFamily<K>,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.cell.try_borrow() {
            Ok(data) => f
                .debug_struct("Node")
                .field("value", &data.value)
                .field("children", &data.children.len())
                .finish(),
            Err(_) => f.pad("Node { <borrowed> }"),
        }
    }
}

/// A non-owning observer handle onto a node.
///
/// A weak handle does not keep the node alive; it stays valid for exactly as long as *any*
/// strong reference to the node exists — a [`Node`] handle anywhere, or the linkage from a
/// parent's child mapping.
///
/// ```rust
/// use driftwood::Node;
///
/// let parent = Node::<&str, i32>::new();
/// let child = parent.new_child("c");
/// let watcher = child.downgrade();
///
/// drop(child); // the parent linkage still owns the node
/// assert!(watcher.is_alive());
///
/// parent.remove_child(&"c"); // the last strong reference is gone
/// assert!(!watcher.is_alive());
/// assert!(watcher.upgrade().is_none());
/// ```
pub struct WeakNode<K, V, F = Sorted>
where
    F: MappingFamily<K>,
{
    cell: WeakLink<K, V, F>,
}

impl<K, V, F> WeakNode<K, V, F>
where
    F: MappingFamily<K>,
{
    /// Creates a weak handle which observes nothing; [`upgrade`](Self::upgrade) on it always
    /// returns `None`.
    pub fn new() -> Self {
        Self { cell: Weak::new() }
    }
    /// Attempts to produce a fresh strong handle onto the node, returning `None` if the node has
    /// been reclaimed.
    pub fn upgrade(&self) -> Option<Node<K, V, F>> {
        self.cell.upgrade().map(Node::from_link)
    }
    /// Returns `true` while the observed node has at least one strong owner anywhere.
    pub fn is_alive(&self) -> bool {
        self.cell.strong_count() > 0
    }
}

impl<K, V, F> Default for WeakNode<K, V, F>
where
    F: MappingFamily<K>,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, F> Clone for WeakNode<K, V, F>
where
    F: MappingFamily<K>,
{
    #[inline]
    fn clone(&self) -> Self {
        Self {
            cell: Weak::clone(&self.cell),
        }
    }
}

impl<K, V, F> Debug for WeakNode<K, V, F>
where
    F: MappingFamily<K>,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_alive() {
            f.pad("WeakNode(alive)")
        } else {
            f.pad("WeakNode(dead)")
        }
    }
}
