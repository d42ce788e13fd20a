//! TTL cache shared by the API client and the discovery service
//!
//! A zero TTL disables the cache entirely: `get` always misses and
//! `insert` is a no-op, so every lookup goes to the network.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// In-memory cache with a single time-to-live for every entry
#[derive(Debug)]
pub struct TtlCache<V> {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Build from a signed number of seconds; `<= 0` disables caching.
    pub fn from_secs(ttl_secs: i64) -> Self {
        Self::new(Duration::from_secs(ttl_secs.max(0) as u64))
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub fn get(&self, key: &str) -> Option<V> {
        if !self.is_enabled() {
            return None;
        }
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: impl Into<String>, value: V) {
        if !self.is_enabled() {
            return;
        }
        let entry = Entry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), entry);
    }

    pub fn invalidate(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the cached value or compute, store and return it.
    ///
    /// The lock is not held across the await; two concurrent misses for the
    /// same key both run `fetch` and the last one wins.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: &str, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(hit) = self.get(key) {
            tracing::debug!(key, "cache hit");
            return Ok(hit);
        }
        tracing::debug!(key, "cache miss");
        let value = fetch().await?;
        self.insert(key, value.clone());
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("projects", 3);
        assert_eq!(cache.get("projects"), Some(3));
        assert_eq!(cache.get("servers"), None);
    }

    #[test]
    fn test_zero_ttl_never_stores() {
        let cache = TtlCache::from_secs(0);
        cache.insert("projects", 3);
        assert!(!cache.is_enabled());
        assert!(cache.is_empty());
        assert_eq!(cache.get("projects"), None);

        let negative = TtlCache::<u8>::from_secs(-5);
        assert!(!negative.is_enabled());
    }

    #[test]
    fn test_expired_entries_are_evicted() {
        let cache = TtlCache::new(Duration::from_millis(5));
        cache.insert("k", "v".to_string());
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear_and_invalidate() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.invalidate("a");
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_get_or_try_insert_with_fetches_once() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let mut calls = 0;

        let first: Result<u32, ()> = cache
            .get_or_try_insert_with("k", || {
                calls += 1;
                async { Ok(7) }
            })
            .await;
        assert_eq!(first, Ok(7));

        let second: Result<u32, ()> = cache
            .get_or_try_insert_with("k", || async { Ok(99) })
            .await;
        assert_eq!(second, Ok(7));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        let failed: Result<u32, &str> = cache
            .get_or_try_insert_with("k", || async { Err("boom") })
            .await;
        assert!(failed.is_err());
        assert!(cache.is_empty());
    }
}
