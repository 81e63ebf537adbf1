//! Insertion-ordered map with batch eviction.
//!
//! Used for per-item statistics accumulated across a large catalog, where
//! recency does not matter and insert churn is high. Instead of evicting one
//! entry per insert at capacity, the oldest fifth (20%) of the capacity is
//! dropped in one pass.

use std::borrow::Borrow;
use std::hash::Hash;

use indexmap::IndexMap;

/// Capacity used by [`BoundedMap::default`].
pub const DEFAULT_BOUNDED_CAPACITY: usize = 5000;

/// Map capped at a fixed capacity, evicting oldest insertions in batches.
///
/// Updating an existing key keeps its original insertion position.
#[derive(Debug, Clone)]
pub struct BoundedMap<K, V> {
    capacity: usize,
    entries: IndexMap<K, V>,
}

impl<K, V> BoundedMap<K, V>
where
    K: Hash + Eq,
{
    /// Create a map holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: IndexMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries dropped per eviction batch: `floor(capacity * 0.2)`,
    /// and never less than one so the cap always holds.
    pub fn eviction_batch(&self) -> usize {
        (self.capacity / 5).max(1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    /// Insert or update `key`. Returns the keys evicted to make room.
    pub fn set(&mut self, key: K, value: V) -> Vec<K> {
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            return Vec::new();
        }

        let evicted = if self.entries.len() >= self.capacity {
            let batch = self.eviction_batch().min(self.entries.len());
            self.entries.drain(..batch).map(|(key, _)| key).collect()
        } else {
            Vec::new()
        };
        self.entries.insert(key, value);
        evicted
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.shift_remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.entries.values()
    }
}

impl<K, V> Default for BoundedMap<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new(DEFAULT_BOUNDED_CAPACITY)
    }
}
