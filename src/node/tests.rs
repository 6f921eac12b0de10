#![allow(clippy::unwrap_used)]

use crate::{mapping::Hashed, Node, WeakNode};

type N = Node<u32, u32>;

#[test]
fn fresh_node_is_an_orphan() {
    let node = N::new();
    assert!(!node.has_value());
    assert!(!node.has_children());
    assert_eq!(node.child_count(), 0);
    assert!(node.parent().is_none());
    assert_eq!(node.depth(), 0);
    assert!(node.path().is_empty());
    assert_eq!(node.key(), None);
}

#[test]
fn value_round_trip() {
    let node = N::new();
    node.set_value(5);
    assert!(node.has_value());
    assert_eq!(node.value_or(0), 5);
    assert_eq!(*node.value().unwrap(), 5);

    assert_eq!(node.take_value(), Some(5));
    assert!(!node.has_value());
    assert_eq!(node.take_value(), None);
    assert_eq!(node.value_or(7), 7);
    assert!(node.value().is_none());

    node.set_value(1);
    node.clear_value();
    assert!(!node.has_value());
}

#[test]
fn value_mut_auto_vivifies() {
    let node = N::new();
    *node.value_mut() = 3;
    assert_eq!(node.value_or(0), 3);
    *node.value_mut() += 1;
    assert_eq!(node.value_or(0), 4);

    // on a value-less node the default is constructed in place first
    node.clear_value();
    assert_eq!(*node.value_mut(), 0);
    assert!(node.has_value());
}

#[test]
fn assignment_reaches_through_shared_handles() {
    let node = N::new();
    let alias = node.clone();
    *alias.value_mut() = 11;
    assert_eq!(node.value_or(0), 11);
}

#[test]
fn child_or_insert_links_and_is_idempotent() {
    let root = N::new();
    let child = root.child_or_insert(4);
    *child.value_mut() = 4;

    assert_eq!(root.child(&4).unwrap(), child);
    assert_eq!(root.child_or_insert(4), child);
    assert_eq!(child.parent().unwrap(), root);
    assert_eq!(child.depth(), 1);
    assert_eq!(child.key(), Some(4));
    assert_eq!(child.path(), vec![4]);
}

#[test]
fn child_lookup_never_creates() {
    let root = N::new();
    assert!(root.child(&1).is_none());
    assert!(!root.contains_child(&1));
    assert_eq!(root.child_count(), 0);
}

#[test]
fn children_returns_a_snapshot() {
    let root = N::new();
    root.new_child(1);
    root.new_child(2);
    let snapshot = root.children();
    assert_eq!(snapshot.len(), 2);

    root.new_child(3);
    assert_eq!(snapshot.len(), 2); // unaffected by later mutation
    assert_eq!(root.children().len(), 3);
}

#[test]
fn insert_child_steals_from_prior_parent() {
    let old = N::new();
    let new = N::new();
    let node = old.new_child(1);

    new.insert_child(9, node.clone());
    assert!(!old.contains_child(&1));
    assert_eq!(node.parent().unwrap(), new);
    assert_eq!(node.path(), vec![9]);
}

#[test]
fn insert_child_unlinks_the_displaced_occupant() {
    let root = N::new();
    let displaced = root.new_child(1);
    let replacement = N::new();
    root.insert_child(1, replacement.clone());

    assert_eq!(root.child(&1).unwrap(), replacement);
    assert!(displaced.parent().is_none());
    assert!(displaced.path().is_empty());
}

#[test]
#[should_panic(expected = "below itself")]
fn insert_child_rejects_self() {
    let node = N::new();
    node.insert_child(0, node.clone());
}

#[test]
#[should_panic(expected = "below itself")]
fn insert_child_rejects_ancestors() {
    let root = N::new();
    let grandchild = root.new_child(1).new_child(2);
    grandchild.insert_child(0, root.clone());
}

#[test]
fn take_child_detaches_but_keeps_the_subtree() {
    let root = N::new();
    let child = root.new_child(1);
    child.new_child(2);

    let taken = root.take_child(&1).unwrap();
    assert_eq!(taken, child);
    assert!(taken.parent().is_none());
    assert!(!root.contains_child(&1));
    assert!(taken.contains_child(&2));

    assert!(root.take_child(&1).is_none());
}

#[test]
fn remove_child_reports_presence() {
    let root = N::new();
    root.new_child(1);
    assert!(root.remove_child(&1));
    assert!(!root.remove_child(&1));
}

#[test]
fn removal_reclaims_a_sole_owned_cell() {
    let root = N::new();
    let watcher = {
        let child = root.new_child(1);
        child.downgrade()
        // the handle is dropped here; the parent linkage is the sole owner now
    };
    assert!(watcher.is_alive());
    root.remove_child(&1);
    assert!(!watcher.is_alive());
    assert!(watcher.upgrade().is_none());
}

#[test]
fn removal_spares_a_cell_with_another_owner() {
    let root = N::new();
    let child = root.new_child(1);
    let watcher = child.downgrade();

    root.remove_child(&1);
    // `child` still owns the cell even though the tree no longer does
    assert!(watcher.is_alive());
    assert_eq!(watcher.upgrade().unwrap(), child);
    assert!(child.parent().is_none());

    drop(child);
    assert!(!watcher.is_alive());
}

#[test]
fn weak_handle_survives_dropping_one_of_two_handles() {
    let node = N::new();
    let second = node.clone();
    let watcher = node.downgrade();

    drop(node);
    assert!(watcher.is_alive());
    drop(second);
    assert!(!watcher.is_alive());
}

#[test]
fn dangling_weak_handle() {
    let watcher = WeakNode::<u32, u32>::new();
    assert!(!watcher.is_alive());
    assert!(watcher.upgrade().is_none());
}

#[test]
fn clear_children_unlinks_every_child() {
    let root = N::new();
    let a = root.new_child(1);
    let b = root.new_child(2);
    root.clear_children();

    assert!(!root.has_children());
    assert!(a.parent().is_none());
    assert!(b.parent().is_none());
}

#[test]
fn detach_keeps_the_subtree_reachable() {
    // root -> 0 -> 2 -> {4, 5}, plus siblings 1 and 3
    let root = N::new();
    let n0 = root.new_child(0);
    root.new_child(1);
    let n2 = n0.new_child(2);
    n0.new_child(3);
    n2.new_child(4);
    n2.new_child(5);

    n2.detach();
    assert!(n2.parent().is_none());
    assert!(!n0.contains_child(&2));
    assert!(n2.contains_child(&4));
    assert!(n2.contains_child(&5));
    assert_eq!(n2.depth(), 0);
    assert_eq!(n2.child(&4).unwrap().depth(), 1);
}

#[test]
fn detach_on_an_orphan_is_a_no_op() {
    let node = N::new();
    node.detach();
    assert!(node.parent().is_none());
}

#[test]
fn depth_is_one_more_than_the_parents() {
    let root = N::new();
    let mut node = root.clone();
    for key in 0..4 {
        let child = node.new_child(key);
        assert_eq!(child.depth(), node.depth() + 1);
        node = child;
    }
    assert_eq!(node.depth(), 4);
    assert_eq!(node.path(), vec![0, 1, 2, 3]);
}

#[test]
fn find_descends_relative_paths() {
    let root = N::new();
    let leaf = root.new_child(1).new_child(2);
    assert_eq!(root.find(&[1, 2]).unwrap(), leaf);
    assert_eq!(root.find(&[]).unwrap(), root);
    assert!(root.find(&[1, 3]).is_none());
    assert!(root.find(&[2]).is_none());
}

#[test]
fn deep_clone_copies_structure_not_identity() {
    let root = N::new();
    root.set_value(0);
    let child = root.new_child(1);
    child.set_value(1);
    child.new_child(2).set_value(2);

    let copy = root.deep_clone();
    assert_ne!(copy, root);
    assert!(copy.parent().is_none());
    assert_eq!(copy.value_or(9), 0);
    assert_eq!(copy.find(&[1, 2]).unwrap().value_or(9), 2);
    // parents inside the clone point at the clone, not the original
    assert_eq!(copy.child(&1).unwrap().parent().unwrap(), copy);

    copy.child(&1).unwrap().set_value(10);
    assert_eq!(child.value_or(9), 1);
}

#[test]
fn deep_clone_of_a_linked_node_is_parentless() {
    let root = N::new();
    let child = root.new_child(1);
    let copy = child.deep_clone();
    assert!(copy.parent().is_none());
    assert!(copy.path().is_empty());
}

#[test]
fn equality_is_identity() {
    let a = N::new();
    let b = N::new();
    a.set_value(1);
    b.set_value(1);
    assert_ne!(a, b);
    assert_eq!(a, a.clone());
}

#[test]
fn value_presence_is_independent_of_children() {
    let root = N::new();
    root.new_child(1);
    assert!(!root.has_value());
    root.set_value(0);
    assert!(root.has_value());
    assert!(root.has_children());
}

#[test]
fn hashed_nodes_share_the_same_api() {
    let root = Node::<String, u32, Hashed>::new();
    let child = root.child_or_insert("leaf".to_owned());
    child.set_value(1);
    assert_eq!(root.child(&"leaf".to_owned()).unwrap(), child);
    assert_eq!(child.key(), Some("leaf".to_owned()));
    assert_eq!(child.path(), vec!["leaf".to_owned()]);
}
