//! DualIndexMap: structural layer owning the forward and reverse indices.
//!
//! The forward index (key -> entry slot) and the reverse index (value ->
//! bucket of entry slots) live behind one type whose only mutators are
//! `set`, `remove`, and `clear`, each of which updates every index before
//! returning. External code has no path to an individual index, so the
//! pairing invariant (`forward[k] == v` iff `k` is in `v`'s bucket) holds
//! at every observable point.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::HashTable;
use slotmap::{DefaultKey, SlotMap};
use std::collections::hash_map::RandomState;

#[derive(Clone, Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    key_hash: u64,
    value_hash: u64,
}

/// Reverse-index bucket: every slot whose entry currently holds an equal
/// value, oldest first. A bucket is never empty; removing its last slot
/// removes the bucket. The last slot is the most recently inserted key.
#[derive(Clone, Debug)]
struct ValueBucket {
    hash: u64,
    slots: Vec<DefaultKey>,
}

#[derive(Clone)]
pub struct DualIndexMap<K, V, S = RandomState> {
    hasher: S,
    slots: SlotMap<DefaultKey, Entry<K, V>>, // storage using generational keys
    forward: HashTable<DefaultKey>,
    reverse: HashTable<ValueBucket>,
    order: Option<Vec<DefaultKey>>, // Some iff insertion-order iteration was requested
}

impl<K, V> DualIndexMap<K, V>
where
    K: Eq + Hash,
    V: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    /// Like `new`, but `iter` visits entries in insertion order.
    pub fn insertion_ordered() -> Self {
        Self::insertion_ordered_with_hasher(Default::default())
    }
}

impl<K, V> Default for DualIndexMap<K, V>
where
    K: Eq + Hash,
    V: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> DualIndexMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            slots: SlotMap::with_key(),
            forward: HashTable::new(),
            reverse: HashTable::new(),
            order: None,
        }
    }

    pub fn insertion_ordered_with_hasher(hasher: S) -> Self {
        Self {
            order: Some(Vec::new()),
            ..Self::with_hasher(hasher)
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_insertion_ordered(&self) -> bool {
        self.order.is_some()
    }

    fn find_slot<Q>(&self, key: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(key);
        self.forward
            .find(hash, |&k| {
                self.slots
                    .get(k)
                    .map(|e| e.key.borrow() == key)
                    .unwrap_or(false)
            })
            .copied()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_slot(key).map(|k| &self.slots[k].value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_slot(key).is_some()
    }

    /// Associates `key` with `value`, returning the displaced value.
    ///
    /// When `key` already maps to an unequal value, the key leaves its old
    /// value's bucket (pruning the bucket if it empties) and joins the new
    /// value's bucket as its most recent key. Both indices and the order
    /// index are updated inside this single `&mut` entry point, so no
    /// reader can observe them out of step.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        let key_hash = self.make_hash(&key);
        let value_hash = self.make_hash(&value);

        let existing = {
            let slots = &self.slots;
            self.forward
                .find(key_hash, |&k| {
                    slots.get(k).map(|e| e.key == key).unwrap_or(false)
                })
                .copied()
        };

        match existing {
            Some(slot) => {
                let entry = &mut self.slots[slot];
                if entry.value == value {
                    // Same pairing: neither index changes.
                    return Some(core::mem::replace(&mut entry.value, value));
                }
                let old_value_hash = entry.value_hash;
                let old_value = core::mem::replace(&mut entry.value, value);
                entry.value_hash = value_hash;
                Self::unlink_reverse(&mut self.reverse, old_value_hash, slot);
                Self::link_reverse(&mut self.reverse, &self.slots, slot);
                Some(old_value)
            }
            None => {
                let slot = self.slots.insert(Entry {
                    key,
                    value,
                    key_hash,
                    value_hash,
                });
                {
                    let slots = &self.slots;
                    let _ = self
                        .forward
                        .insert_unique(key_hash, slot, |&k| slots[k].key_hash);
                }
                Self::link_reverse(&mut self.reverse, &self.slots, slot);
                if let Some(order) = &mut self.order {
                    order.push(slot);
                }
                None
            }
        }
    }

    /// Removes `key`, unlinking it from the forward index, its value
    /// bucket, and the order index. Returns the owned entry.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(key);
        let slot = {
            let slots = &self.slots;
            match self.forward.find_entry(hash, |&k| {
                slots.get(k).map(|e| e.key.borrow() == key).unwrap_or(false)
            }) {
                Ok(occupied) => occupied.remove().0,
                Err(_) => return None,
            }
        };
        let entry = self.slots.remove(slot)?;
        Self::unlink_reverse(&mut self.reverse, entry.value_hash, slot);
        if let Some(order) = &mut self.order {
            // Stable splice: the remaining keys keep their relative order.
            order.retain(|&s| s != slot);
        }
        Some((entry.key, entry.value))
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.forward.clear();
        self.reverse.clear();
        if let Some(order) = &mut self.order {
            order.clear();
        }
    }

    fn find_bucket<Q>(&self, value: &Q) -> Option<&ValueBucket>
    where
        V: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(value);
        self.reverse.find(hash, |b| {
            self.slots
                .get(b.slots[0])
                .map(|e| e.value.borrow() == value)
                .unwrap_or(false)
        })
    }

    /// The keys currently mapped to `value`, oldest first. Empty when the
    /// value is absent; absence is not an error.
    pub fn keys_for<Q>(&self, value: &Q) -> KeysFor<'_, K, V>
    where
        V: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let bucket = self
            .find_bucket(value)
            .map_or(&[][..], |b| b.slots.as_slice());
        KeysFor {
            slots: &self.slots,
            it: bucket.iter(),
        }
    }

    /// The most recently inserted key mapped to `value`.
    pub fn key_for<Q>(&self, value: &Q) -> Option<&K>
    where
        V: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let bucket = self.find_bucket(value)?;
        bucket.slots.last().map(|&s| &self.slots[s].key)
    }

    pub fn contains_value<Q>(&self, value: &Q) -> bool
    where
        V: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_bucket(value).is_some()
    }

    /// Number of distinct values (reverse-index buckets).
    pub fn distinct_values(&self) -> usize {
        self.reverse.len()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        let inner = match &self.order {
            Some(order) => IterInner::Ordered(order.iter()),
            None => IterInner::Arbitrary(self.slots.iter()),
        };
        Iter {
            slots: &self.slots,
            inner,
        }
    }

    /// Iterates the reverse index: one `(value, keys)` group per distinct
    /// value, in arbitrary order.
    pub fn value_groups(&self) -> ValueGroups<'_, K, V> {
        ValueGroups {
            slots: &self.slots,
            it: self.reverse.iter(),
        }
    }

    // Attach `slot` to the bucket for its current value, creating the
    // bucket if the value is new. The slot must not be linked already.
    fn link_reverse(
        reverse: &mut HashTable<ValueBucket>,
        slots: &SlotMap<DefaultKey, Entry<K, V>>,
        slot: DefaultKey,
    ) {
        let entry = &slots[slot];
        match reverse.entry(
            entry.value_hash,
            |b| slots[b.slots[0]].value == entry.value,
            |b| b.hash,
        ) {
            hashbrown::hash_table::Entry::Occupied(mut o) => o.get_mut().slots.push(slot),
            hashbrown::hash_table::Entry::Vacant(v) => {
                let _ = v.insert(ValueBucket {
                    hash: entry.value_hash,
                    slots: vec![slot],
                });
            }
        }
    }

    // Detach `slot` from its bucket, identified by slot membership so the
    // entry's stored value may already have been rewritten. Prunes the
    // bucket when the last slot leaves.
    fn unlink_reverse(reverse: &mut HashTable<ValueBucket>, value_hash: u64, slot: DefaultKey) {
        let mut occupied = reverse
            .find_entry(value_hash, |b| b.slots.contains(&slot))
            .unwrap();
        let bucket = occupied.get_mut();
        bucket.slots.retain(|&s| s != slot);
        if bucket.slots.is_empty() {
            let _ = occupied.remove();
        }
    }
}

impl<K, V, S> fmt::Debug for DualIndexMap<K, V, S>
where
    K: Eq + Hash + fmt::Debug,
    V: Eq + Hash + fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Iterator over `(key, value)` pairs. Arbitrary order by default,
/// insertion order for maps built with an order index. Restartable via a
/// fresh `iter` call.
pub struct Iter<'a, K, V> {
    slots: &'a SlotMap<DefaultKey, Entry<K, V>>,
    inner: IterInner<'a, K, V>,
}

enum IterInner<'a, K, V> {
    Arbitrary(slotmap::basic::Iter<'a, DefaultKey, Entry<K, V>>),
    Ordered(core::slice::Iter<'a, DefaultKey>),
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IterInner::Arbitrary(it) => it.next().map(|(_, e)| (&e.key, &e.value)),
            IterInner::Ordered(it) => it.next().map(|&s| {
                let e = &self.slots[s];
                (&e.key, &e.value)
            }),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            IterInner::Arbitrary(it) => it.size_hint(),
            IterInner::Ordered(it) => it.size_hint(),
        }
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

/// Iterator over the keys mapped to one value, oldest first.
#[derive(Clone)]
pub struct KeysFor<'a, K, V> {
    slots: &'a SlotMap<DefaultKey, Entry<K, V>>,
    it: core::slice::Iter<'a, DefaultKey>,
}

impl<'a, K, V> Iterator for KeysFor<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|&s| &self.slots[s].key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<'a, K, V> ExactSizeIterator for KeysFor<'a, K, V> {}

/// Iterator over `(value, keys)` groups of the reverse index.
pub struct ValueGroups<'a, K, V> {
    slots: &'a SlotMap<DefaultKey, Entry<K, V>>,
    it: hashbrown::hash_table::Iter<'a, ValueBucket>,
}

impl<'a, K, V> Iterator for ValueGroups<'a, K, V> {
    type Item = (&'a V, KeysFor<'a, K, V>);

    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|b| {
            (
                &self.slots[b.slots[0]].value,
                KeysFor {
                    slots: self.slots,
                    it: b.slots.iter(),
                },
            )
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}
