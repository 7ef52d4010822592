//! TTL-based cache for ephemeral state.
//!
//! Thread-safe map whose entries expire after a fixed time-to-live, so
//! abandoned entries cannot grow memory without bound.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// A thread-safe cache with time-to-live expiration.
///
/// Expired entries are invisible to readers but stay in memory until
/// `cleanup_expired()` (or a `take_if` on the same key) removes them.
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, TtlEntry<V>>>,
    ttl: Duration,
}

struct TtlEntry<V> {
    value: V,
    inserted_at: Instant,
}

impl<V> TtlEntry<V> {
    fn is_alive(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() < ttl
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Insert a value, replacing any existing entry and resetting the TTL.
    pub async fn insert(&self, key: K, value: V) {
        let entry = TtlEntry {
            value,
            inserted_at: Instant::now(),
        };
        self.entries.write().await.insert(key, entry);
    }

    /// Insert a value with an explicit timestamp (tests only).
    #[cfg(test)]
    pub async fn insert_at(&self, key: K, value: V, inserted_at: Instant) {
        let entry = TtlEntry { value, inserted_at };
        self.entries.write().await.insert(key, entry);
    }

    /// Get a value if it exists and hasn't expired.
    #[cfg(test)]
    pub async fn get(&self, key: &K) -> Option<V> {
        let guard = self.entries.read().await;
        guard
            .get(key)
            .filter(|entry| entry.is_alive(self.ttl))
            .map(|entry| entry.value.clone())
    }

    /// Remove and return a live value for which `matches` holds.
    ///
    /// A value that fails `matches` stays in place; an expired one is
    /// dropped and `None` returned.
    pub async fn take_if(&self, key: &K, matches: impl FnOnce(&V) -> bool) -> Option<V> {
        let mut guard = self.entries.write().await;
        let entry = guard.get(key)?;
        let alive = entry.is_alive(self.ttl);
        let matched = alive && matches(&entry.value);
        if !alive {
            guard.remove(key);
            return None;
        }
        if !matched {
            return None;
        }
        guard.remove(key).map(|entry| entry.value)
    }

    /// Remove all expired entries and return the count of removed entries.
    pub async fn cleanup_expired(&self) -> usize {
        let mut guard = self.entries.write().await;
        let before_count = guard.len();
        guard.retain(|_, entry| entry.is_alive(self.ttl));
        before_count - guard.len()
    }

    /// Number of entries, including expired ones not yet cleaned.
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
