use core::hash::{BuildHasher, Hash};
use std::collections::{hash_map, HashMap};

use super::Mapping;

// Implemented over any hasher so that both the std default and `FxHashMap` qualify.
impl<K, V, S> Mapping<K, V> for HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    type Iter<'a>
        = hash_map::Iter<'a, K, V>
    where
        K: 'a,
        V: 'a,
        S: 'a;

    #[inline(always)]
    fn new() -> Self {
        Self::default()
    }
    #[inline]
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        Self::insert(self, key, value)
    }
    #[inline]
    fn get(&self, key: &K) -> Option<&V> {
        Self::get(self, key)
    }
    #[inline]
    fn get_or_insert_with(&mut self, key: K, default: impl FnOnce() -> V) -> &V {
        self.entry(key).or_insert_with(default)
    }
    #[inline]
    fn contains(&self, key: &K) -> bool {
        self.contains_key(key)
    }
    #[inline]
    fn remove(&mut self, key: &K) -> Option<V> {
        Self::remove(self, key)
    }
    fn remove_where(&mut self, mut pred: impl FnMut(&V) -> bool) -> bool {
        let mut removed = false;
        self.retain(|_, value| {
            if !removed && pred(value) {
                removed = true;
                false
            } else {
                true
            }
        });
        removed
    }
    #[inline]
    fn clear(&mut self) {
        Self::clear(self)
    }
    #[inline]
    fn len(&self) -> usize {
        Self::len(self)
    }
    #[inline]
    fn first(&self) -> Option<(&K, &V)> {
        self.iter().next()
    }
    #[inline]
    fn iter(&self) -> Self::Iter<'_> {
        Self::iter(self)
    }
}
