//! ReverseView: read-only value-to-keys adapter borrowed from a map.
//!
//! The view holds a plain borrow of the store it was derived from: it
//! performs no copying, exposes no mutating operations, and cannot outlive
//! the map. Holding a view across a mutation is rejected by the borrow
//! checker; re-deriving one is free, and a fresh view always observes
//! current state.

use crate::dual_index_map::{DualIndexMap, KeysFor, ValueGroups};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

pub struct ReverseView<'a, K, V, S = RandomState> {
    store: &'a DualIndexMap<K, V, S>,
}

impl<'a, K, V, S> Clone for ReverseView<'a, K, V, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K, V, S> Copy for ReverseView<'a, K, V, S> {}

impl<'a, K, V, S> ReverseView<'a, K, V, S>
where
    K: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher,
{
    pub(crate) fn new(store: &'a DualIndexMap<K, V, S>) -> Self {
        Self { store }
    }

    /// The keys mapped to `value`, oldest first; empty when absent.
    pub fn keys<Q>(&self, value: &Q) -> KeysFor<'a, K, V>
    where
        V: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.store.keys_for(value)
    }

    /// The most recently inserted key mapped to `value`. This is the
    /// canonical lookup under single reverse cardinality and the
    /// documented tie-break under multi.
    pub fn key<Q>(&self, value: &Q) -> Option<&'a K>
    where
        V: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.store.key_for(value)
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        V: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.store.contains_value(value)
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.store.distinct_values()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> ValueGroups<'a, K, V> {
        self.store.value_groups()
    }
}

impl<'a, K, V, S> fmt::Debug for ReverseView<'a, K, V, S>
where
    K: Eq + Hash + fmt::Debug,
    V: Eq + Hash + fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(v, keys)| (v, keys.collect::<Vec<_>>())))
            .finish()
    }
}
