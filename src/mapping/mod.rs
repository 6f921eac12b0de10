//! Utilities for treating the keyed collections which back a node's children generically.
//!
//! This module is home for the following items:
//! - [`Mapping`], the operation contract every child collection has to satisfy
//! - [`MappingFamily`], a kind-level trait which selects a `Mapping` type for any value type,
//!   allowing tree types to be parameterized by a *strategy* instead of a concrete collection
//! - [`Sorted`] and [`Hashed`], the two built-in strategies
//!
//! All tree algorithms in the crate are written against `Mapping` alone — the only observable
//! difference between the strategies is the enumeration order of children.

mod btree_impl;
mod hash_impl;

use core::hash::Hash;
use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

/// The contract for collections which can hold the children of a tree node, keyed by `K`.
///
/// Requirements, which tree algorithms rely on:
/// - [`insert`](Mapping::insert) overwrites, returning the displaced value if there was one;
/// - [`iter`](Mapping::iter) enumerates entries in the collection's *enumeration order*: for
///   sorted collections this is the key order, for hashed ones it is unspecified but repeatable
///   as long as the collection is not modified;
/// - [`first`](Mapping::first) agrees with the first entry produced by `iter`;
/// - [`remove_where`](Mapping::remove_where) removes the first entry in enumeration order whose
///   *value* matches the predicate, which lets callers erase an entry located by scanning without
///   ever cloning or even naming its key.
pub trait Mapping<K, V>: Sized {
    /// The enumeration iterator, yielding entries in the collection's enumeration order.
    type Iter<'a>: Iterator<Item = (&'a K, &'a V)>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    /// Creates an empty collection.
    fn new() -> Self;
    /// Inserts an entry, overwriting and returning the previous value at the key, if any.
    fn insert(&mut self, key: K, value: V) -> Option<V>;
    /// Returns a reference to the value at the key, or `None` if the key is absent.
    fn get(&self, key: &K) -> Option<&V>;
    /// Returns a reference to the value at the key, first inserting the result of `default` if
    /// the key is absent.
    fn get_or_insert_with(&mut self, key: K, default: impl FnOnce() -> V) -> &V;
    /// Returns `true` if an entry with the specified key is present.
    fn contains(&self, key: &K) -> bool;
    /// Removes and returns the value at the key, or `None` if the key was absent.
    fn remove(&mut self, key: &K) -> Option<V>;
    /// Removes the first entry in enumeration order whose value matches the predicate, returning
    /// whether an entry was removed.
    fn remove_where(&mut self, pred: impl FnMut(&V) -> bool) -> bool;
    /// Removes all entries.
    fn clear(&mut self);
    /// Returns the number of entries.
    fn len(&self) -> usize;
    /// Returns the first entry in enumeration order, or `None` if the collection is empty.
    fn first(&self) -> Option<(&K, &V)>;
    /// Enumerates all entries in enumeration order.
    fn iter(&self) -> Self::Iter<'_>;

    /// Returns `true` if the collection holds no entries.
    #[inline(always)]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A strategy which picks a [`Mapping`] implementation for any value type.
///
/// A node's children map its key type to reference-counted links back into the node type itself,
/// so the collection type cannot be named directly where a tree is declared — doing so would
/// require an infinitely nested type parameter. Implementors of this trait stand in for the
/// collection *constructor* instead, leaving the value slot open until the tree ties the knot.
pub trait MappingFamily<K> {
    /// The collection type the strategy produces for the specified value type.
    type Map<V>: Mapping<K, V>;
}

/// The strategy for key-sorted child enumeration, backed by [`BTreeMap`].
///
/// Children are enumerated in ascending key order, which makes traversal deterministic.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Sorted;
impl<K: Ord> MappingFamily<K> for Sorted {
    type Map<V> = BTreeMap<K, V>;
}

/// The strategy for hash-based child storage, backed by [`FxHashMap`].
///
/// Enumeration order is unspecified. Lookup does not require `K: Ord`, only `K: Eq + Hash`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Hashed;
impl<K: Eq + Hash> MappingFamily<K> for Hashed {
    type Map<V> = FxHashMap<K, V>;
}
