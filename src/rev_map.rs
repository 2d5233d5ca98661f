//! RevMap: the public mapping type, a policy guard over the dual-index
//! core.
//!
//! The guard owns the store and a policy tag fixed at construction. Every
//! mutating call evaluates the tag: `Frozen` rejects with `Error::Frozen`
//! before anything is touched, `Tracked` forwards to the store. Reads pass
//! through unchanged. `freeze` consumes the map and returns a frozen
//! instance; there is no thaw, so a frozen map can never silently regain
//! mutability.

use crate::dual_index_map::{DualIndexMap, Iter, KeysFor};
use crate::error::Error;
use crate::reverse_view::ReverseView;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

/// Mutation policy, fixed at construction.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Policy {
    /// Mutations pass through and the reverse index tracks them.
    #[default]
    Tracked,
    /// Every mutating call fails with [`Error::Frozen`].
    Frozen,
}

/// How many keys a reverse lookup may report per value.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ReverseCardinality {
    /// A value maps back to all of its keys.
    #[default]
    Multi,
    /// Reverse lookups report the most recently inserted key; bulk
    /// construction rejects input containing duplicate values.
    Single,
}

/// Iteration order of the forward index.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum IterationOrder {
    #[default]
    Arbitrary,
    Insertion,
}

/// Construction-time options. Defaults: tracked, multi, arbitrary order.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct MapConfig {
    pub policy: Policy,
    pub cardinality: ReverseCardinality,
    pub order: IterationOrder,
}

#[derive(Clone)]
pub struct RevMap<K, V, S = RandomState> {
    store: DualIndexMap<K, V, S>,
    policy: Policy,
    cardinality: ReverseCardinality,
}

impl<K, V> RevMap<K, V>
where
    K: Eq + Hash,
    V: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_config(MapConfig::default())
    }

    pub fn with_config(config: MapConfig) -> Self {
        Self::with_config_and_hasher(config, RandomState::default())
    }

    /// Builds a map from initial entries. Later entries win on duplicate
    /// keys. Under [`ReverseCardinality::Single`], input mapping two keys
    /// to equal values is rejected with [`Error::InvalidConfiguration`]
    /// rather than silently discarding an entry.
    pub fn from_entries<I>(entries: I, config: MapConfig) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::from_entries_with_hasher(entries, config, RandomState::default())
    }
}

impl<K, V> Default for RevMap<K, V>
where
    K: Eq + Hash,
    V: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> RevMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_config_and_hasher(MapConfig::default(), hasher)
    }

    pub fn with_config_and_hasher(config: MapConfig, hasher: S) -> Self {
        let store = match config.order {
            IterationOrder::Arbitrary => DualIndexMap::with_hasher(hasher),
            IterationOrder::Insertion => DualIndexMap::insertion_ordered_with_hasher(hasher),
        };
        Self {
            store,
            policy: config.policy,
            cardinality: config.cardinality,
        }
    }

    pub fn from_entries_with_hasher<I>(entries: I, config: MapConfig, hasher: S) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        // Populate through a tracked instance; the requested policy is
        // applied once the contents are in place.
        let mut map = Self::with_config_and_hasher(
            MapConfig {
                policy: Policy::Tracked,
                ..config
            },
            hasher,
        );
        for (key, value) in entries {
            if map.cardinality == ReverseCardinality::Single
                && map.store.keys_for(&value).any(|k| *k != key)
            {
                return Err(Error::InvalidConfiguration);
            }
            map.store.set(key, value);
        }
        map.policy = config.policy;
        Ok(map)
    }

    /// Consumes the map and returns a frozen instance over the same
    /// contents. Frozen is final: building a new tracked map is the only
    /// way back to mutability.
    pub fn freeze(self) -> Self {
        Self {
            policy: Policy::Frozen,
            ..self
        }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn cardinality(&self) -> ReverseCardinality {
        self.cardinality
    }

    pub fn is_frozen(&self) -> bool {
        self.policy == Policy::Frozen
    }

    pub fn is_insertion_ordered(&self) -> bool {
        self.store.is_insertion_ordered()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.store.get(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.store.contains_key(key)
    }

    pub fn keys_for<Q>(&self, value: &Q) -> KeysFor<'_, K, V>
    where
        V: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.store.keys_for(value)
    }

    pub fn key_for<Q>(&self, value: &Q) -> Option<&K>
    where
        V: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.store.key_for(value)
    }

    pub fn contains_value<Q>(&self, value: &Q) -> bool
    where
        V: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.store.contains_value(value)
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.store.iter()
    }

    /// Derives the value-to-keys view. The view borrows this map, so it
    /// can neither mutate it nor outlive it; a view derived from a frozen
    /// map is stable for as long as it is held.
    pub fn reverse(&self) -> ReverseView<'_, K, V, S> {
        ReverseView::new(&self.store)
    }

    pub fn set(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        self.check_tracked()?;
        Ok(self.store.set(key, value))
    }

    /// Removes `key`. Absent keys fail with [`Error::KeyNotFound`]; a
    /// second removal of the same key therefore cannot succeed.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<(K, V), Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.check_tracked()?;
        self.store.remove(key).ok_or(Error::KeyNotFound)
    }

    pub fn clear(&mut self) -> Result<(), Error> {
        self.check_tracked()?;
        self.store.clear();
        Ok(())
    }

    fn check_tracked(&self) -> Result<(), Error> {
        match self.policy {
            Policy::Tracked => Ok(()),
            Policy::Frozen => Err(Error::Frozen),
        }
    }
}

// Equality is over contents: same key set with equal values. Policy,
// cardinality, and iteration order are construction details and do not
// take part.
impl<K, V, S> PartialEq for RevMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, S> Eq for RevMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher,
{
}

impl<K, V, S> fmt::Debug for RevMap<K, V, S>
where
    K: Eq + Hash + fmt::Debug,
    V: Eq + Hash + fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> FromIterator<(K, V)> for RevMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_config_and_hasher(MapConfig::default(), S::default());
        for (key, value) in iter {
            map.store.set(key, value);
        }
        map
    }
}

impl<'a, K, V, S> IntoIterator for &'a RevMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(entries: &[(&str, i32)]) -> Vec<(String, i32)> {
        entries.iter().map(|&(k, v)| (k.to_string(), v)).collect()
    }

    /// Invariant: a frozen map rejects every mutating call and its reads
    /// keep answering from the pre-freeze contents.
    #[test]
    fn frozen_rejects_mutation_and_preserves_reads() {
        let m: RevMap<String, i32> =
            RevMap::from_entries(pairs(&[("a", 1), ("b", 2)]), MapConfig::default()).unwrap();
        let snapshot = m.clone();
        let mut frozen = m.freeze();
        assert!(frozen.is_frozen());

        assert_eq!(frozen.set("c".to_string(), 3), Err(Error::Frozen));
        assert_eq!(frozen.remove("a"), Err(Error::Frozen));
        assert_eq!(frozen.clear(), Err(Error::Frozen));

        assert_eq!(frozen, snapshot);
        assert_eq!(frozen.get("a"), Some(&1));
        assert_eq!(frozen.len(), 2);
        assert_eq!(frozen.reverse().keys(&2).count(), 1);
    }

    /// Invariant: a map constructed frozen never accepts a mutation.
    #[test]
    fn frozen_at_construction() {
        let config = MapConfig {
            policy: Policy::Frozen,
            ..MapConfig::default()
        };
        let mut m: RevMap<String, i32> =
            RevMap::from_entries(pairs(&[("a", 1)]), config).unwrap();
        assert!(m.is_frozen());
        assert_eq!(m.set("b".to_string(), 2), Err(Error::Frozen));
        assert_eq!(m.len(), 1);
    }

    /// Invariant: single reverse cardinality rejects bulk input with
    /// duplicate values, but accepts duplicate keys (later entry wins).
    #[test]
    fn single_cardinality_construction_rules() {
        let config = MapConfig {
            cardinality: ReverseCardinality::Single,
            ..MapConfig::default()
        };

        let err = RevMap::<String, i32>::from_entries(pairs(&[("a", 1), ("b", 1)]), config);
        assert_eq!(err.unwrap_err(), Error::InvalidConfiguration);

        let m = RevMap::<String, i32>::from_entries(pairs(&[("a", 1), ("a", 2)]), config).unwrap();
        assert_eq!(m.len(), 1);
        assert_eq!(m.get("a"), Some(&2));

        // The exact duplicate pair is not a conflict.
        let m = RevMap::<String, i32>::from_entries(pairs(&[("a", 1), ("a", 1)]), config).unwrap();
        assert_eq!(m.len(), 1);
    }

    /// Invariant: under single cardinality, incremental `set` is allowed
    /// to share a value and the reverse lookup reports the newest key.
    #[test]
    fn single_cardinality_last_wins_on_set() {
        let config = MapConfig {
            cardinality: ReverseCardinality::Single,
            ..MapConfig::default()
        };
        let mut m: RevMap<String, i32> = RevMap::with_config(config);
        m.set("a".to_string(), 1).unwrap();
        m.set("b".to_string(), 1).unwrap();
        assert_eq!(m.reverse().key(&1).map(String::as_str), Some("b"));
        assert_eq!(m.key_for(&1).map(String::as_str), Some("b"));
    }

    /// Invariant: equality is over contents only; policy and ordering do
    /// not take part.
    #[test]
    fn equality_ignores_configuration() {
        let entries = pairs(&[("a", 1), ("b", 2)]);
        let tracked: RevMap<String, i32> =
            RevMap::from_entries(entries.clone(), MapConfig::default()).unwrap();
        let ordered_frozen = RevMap::from_entries(
            entries,
            MapConfig {
                policy: Policy::Frozen,
                order: IterationOrder::Insertion,
                ..MapConfig::default()
            },
        )
        .unwrap();
        assert_eq!(tracked, ordered_frozen);

        let mut different = tracked.clone();
        different.set("b".to_string(), 3).unwrap();
        assert_ne!(tracked, different);
    }

    /// Invariant: `FromIterator` builds a tracked, multi-cardinality map
    /// with later duplicate keys winning.
    #[test]
    fn from_iterator_defaults() {
        let m: RevMap<String, i32> = pairs(&[("a", 1), ("b", 1), ("a", 5)]).into_iter().collect();
        assert!(!m.is_frozen());
        assert_eq!(m.cardinality(), ReverseCardinality::Multi);
        assert_eq!(m.len(), 2);
        assert_eq!(m.get("a"), Some(&5));
        let ones: Vec<_> = m.keys_for(&1).map(String::as_str).collect();
        assert_eq!(ones, vec!["b"]);
    }
}
