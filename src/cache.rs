//! Operation cache (computed table) for diagram operations.
//!
//! Wraps a `HashMap` and keeps hit/miss statistics.

use std::collections::HashMap;
use std::hash::Hash;

/// A memoization cache backed by [HashMap].
pub struct Cache<K, V> {
    map: HashMap<K, V>,
    hits: usize,
    misses: usize,
}

impl<K, V> Default for Cache<K, V> {
    fn default() -> Self {
        Self::new(14)
    }
}

impl<K, V> Cache<K, V> {
    /// Creates a new cache pre-sized for `2^bits` entries.
    pub fn new(bits: usize) -> Self {
        Self {
            map: HashMap::with_capacity(1 << bits),
            hits: 0,
            misses: 0,
        }
    }

    /// Returns the number of entries in the cache.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the number of cache hits.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Returns the number of cache misses.
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Clears all entries, keeping the statistics.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq,
    V: Copy,
{
    /// Looks up a key in the cache.
    #[inline]
    pub fn get(&mut self, key: &K) -> Option<V> {
        match self.map.get(key) {
            Some(&v) => {
                self.hits += 1;
                Some(v)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Inserts a key-value pair into the cache.
    #[inline]
    pub fn insert(&mut self, key: K, value: V) {
        self.map.insert(key, value);
    }
}
