//! Read-through memo for provider fetches.
//!
//! Entries are keyed by `(operation, arguments)` and carry the wall-clock time
//! they were fetched. An entry older than the TTL counts as a miss. Only
//! successful results are stored, so a failed fetch is retried on the next
//! render pass.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use lru::LruCache;

/// Identity of a cached fetch: operation name plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    operation: &'static str,
    args: Vec<String>,
}

impl CacheKey {
    pub fn new<I, S>(operation: &'static str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            operation,
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

/// A cached value and when it was fetched.
#[derive(Debug, Clone)]
pub struct Cached<V> {
    pub value: V,
    pub fetched_at: DateTime<Utc>,
    stored: Instant,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

pub struct FetchCache<V> {
    entries: LruCache<CacheKey, Cached<V>>,
    ttl: Option<Duration>,
    hits: u64,
    misses: u64,
}

impl<V: Clone> FetchCache<V> {
    /// `ttl = None` keeps entries until evicted or cleared.
    pub fn new(capacity: usize, ttl: Option<Duration>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            ttl,
            hits: 0,
            misses: 0,
        }
    }

    pub fn get(&mut self, key: &CacheKey) -> Option<Cached<V>> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&mut self, key: &CacheKey, now: Instant) -> Option<Cached<V>> {
        let expired = match (self.entries.peek(key), self.ttl) {
            (Some(entry), Some(ttl)) => now.saturating_duration_since(entry.stored) > ttl,
            (Some(_), None) => false,
            (None, _) => {
                self.misses += 1;
                return None;
            }
        };

        if expired {
            tracing::debug!(operation = key.operation, "cache entry expired");
            self.entries.pop(key);
            self.misses += 1;
            return None;
        }

        self.hits += 1;
        self.entries.get(key).cloned()
    }

    pub fn insert(&mut self, key: CacheKey, value: V) -> Cached<V> {
        let entry = Cached {
            value,
            fetched_at: Utc::now(),
            stored: Instant::now(),
        };
        self.entries.put(key, entry.clone());
        entry
    }

    /// Return the cached value, or run `fetch` and store its `Ok` result.
    pub fn get_or_try_insert_with<E, F>(&mut self, key: CacheKey, fetch: F) -> Result<Cached<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(hit) = self.get(&key) {
            tracing::debug!(operation = key.operation, fetched_at = %hit.fetched_at, "cache hit");
            return Ok(hit);
        }
        let value = fetch()?;
        Ok(self.insert(key, value))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn key(arg: &str) -> CacheKey {
        CacheKey::new("op", [arg])
    }

    #[test]
    fn read_through_fetches_once_per_key() {
        let mut cache: FetchCache<u32> = FetchCache::new(4, None);
        let calls = Cell::new(0);
        let fetch = || -> Result<u32, ()> {
            calls.set(calls.get() + 1);
            Ok(7)
        };

        assert_eq!(cache.get_or_try_insert_with(key("a"), fetch).unwrap().value, 7);
        assert_eq!(cache.get_or_try_insert_with(key("a"), fetch).unwrap().value, 7);
        assert_eq!(calls.get(), 1);

        cache.get_or_try_insert_with(key("b"), fetch).unwrap();
        assert_eq!(calls.get(), 2);
        assert_eq!(cache.stats().entries, 2);
    }

    #[test]
    fn arguments_are_part_of_the_key() {
        assert_ne!(CacheKey::new("op", ["x", "1"]), CacheKey::new("op", ["x", "2"]));
        assert_ne!(CacheKey::new("a", ["x"]), CacheKey::new("b", ["x"]));
    }

    #[test]
    fn errors_are_not_cached() {
        let mut cache: FetchCache<u32> = FetchCache::new(4, None);
        let err: Result<_, &str> = cache.get_or_try_insert_with(key("a"), || Err("down"));
        assert!(err.is_err());
        assert_eq!(cache.stats().entries, 0);

        let ok: Result<_, &str> = cache.get_or_try_insert_with(key("a"), || Ok(1));
        assert_eq!(ok.unwrap().value, 1);
    }

    #[test]
    fn entries_expire_after_ttl() {
        let ttl = Duration::from_secs(60);
        let mut cache: FetchCache<u32> = FetchCache::new(4, Some(ttl));
        cache.insert(key("a"), 1);

        let now = Instant::now();
        assert!(cache.get_at(&key("a"), now).is_some());
        assert!(cache.get_at(&key("a"), now + ttl + Duration::from_secs(1)).is_none());
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn clear_drops_every_entry() {
        let mut cache: FetchCache<u32> = FetchCache::new(4, None);
        cache.insert(key("a"), 1);
        cache.insert(key("b"), 2);
        cache.clear();
        assert_eq!(cache.stats().entries, 0);
        assert!(cache.get(&key("a")).is_none());
        assert!(cache.get(&key("b")).is_none());
    }

    #[test]
    fn capacity_evicts_least_recently_used() {
        let mut cache: FetchCache<u32> = FetchCache::new(1, None);
        cache.insert(key("a"), 1);
        cache.insert(key("b"), 2);
        assert!(cache.get(&key("a")).is_none());
        assert_eq!(cache.get(&key("b")).unwrap().value, 2);
    }
}
