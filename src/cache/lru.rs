//! Strict least-recently-used cache.
//!
//! Backed by a [`LinkedHashMap`] ordered from least to most recently used:
//! a hit is moved to the back with `get_refresh`, eviction pops the front.
//! `get`, `set`, `contains_key` and `remove` are O(1).

use std::borrow::Borrow;
use std::fmt::Display;
use std::hash::Hash;

use linked_hash_map::LinkedHashMap;

/// Capacity used by [`LruCache::default`].
pub const DEFAULT_LRU_CAPACITY: usize = 10;

/// Fixed-capacity cache evicting the single least-recently-used entry.
///
/// Both `get` and `set` on an existing key make it the most recently used.
/// A miss never inserts.
pub struct LruCache<K: Hash + Eq, V> {
    capacity: usize,
    entries: LinkedHashMap<K, V>,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq,
{
    /// Create a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: LinkedHashMap::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the value for `key` and mark it most recently used.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get_refresh(key).map(|value| &*value)
    }

    /// Return the value for `key` without touching its recency.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    /// Insert or update `key`, marking it most recently used.
    ///
    /// When a new key arrives at full capacity, the least recently used
    /// entry is evicted first and returned.
    pub fn set(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(slot) = self.entries.get_refresh(&key) {
            *slot = value;
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
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
        self.entries.remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Keys from least to most recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.keys()
    }
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone + Display,
{
    /// Remove every entry whose key, rendered as a string, starts with
    /// `prefix`. Returns how many entries were removed.
    pub fn remove_by_prefix(&mut self, prefix: &str) -> usize {
        let doomed: Vec<K> = self
            .entries
            .keys()
            .filter(|key| key.to_string().starts_with(prefix))
            .cloned()
            .collect();
        for key in &doomed {
            self.entries.remove(key);
        }
        doomed.len()
    }
}

impl<K, V> Default for LruCache<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new(DEFAULT_LRU_CAPACITY)
    }
}

impl<K, V> std::fmt::Debug for LruCache<K, V>
where
    K: Hash + Eq + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}
