//! In-memory cache implementation using DashMap

use std::time::Duration;

use dashmap::DashMap;

use super::Entry;

/// An in-memory TTL cache backed by a concurrent hash map.
///
/// Concurrent author lookups for one page write into it from several
/// tasks, hence the sharded map rather than a `Mutex<HashMap>`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use bookdesk_lib::cache::InMemoryCache;
///
/// let cache = InMemoryCache::new();
/// cache.set("Carl Sagan", 1934, Duration::from_secs(60));
/// assert_eq!(cache.get("Carl Sagan"), Some(1934));
/// ```
#[derive(Debug)]
pub struct InMemoryCache<V> {
    store: DashMap<String, Entry<V>>,
}

impl<V: Clone> InMemoryCache<V> {
    /// Creates a new empty in-memory cache.
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    /// Retrieves a value, dropping it if it has expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let entry = self.store.get(key)?;
        if !entry.is_expired() {
            return Some(entry.value.clone());
        }

        drop(entry);
        self.store.remove(key);
        None
    }

    /// Stores a value for `ttl`.
    pub fn set(&self, key: &str, value: V, ttl: Duration) {
        self.store.insert(key.to_string(), Entry::new(value, ttl));
    }

    /// Removes all expired entries, returning how many were dropped.
    pub fn gc(&self) -> usize {
        let mut removed = 0;
        self.store.retain(|_, entry| {
            let keep = !entry.is_expired();
            removed += usize::from(!keep);
            keep
        });
        removed
    }

    /// Returns the number of entries in the cache (including expired ones).
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl<V: Clone> Default for InMemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
