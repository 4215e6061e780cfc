//! In-memory cache of last-fetched catalog lists
//!
//! Thread-safe TTL cache over DashMap. The console re-renders the same
//! product/category lists constantly while the operator navigates, so a short
//! TTL spares the API repeated identical GETs.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default TTL: 60 seconds. Catalog edits invalidate explicitly.
const DEFAULT_TTL_SECS: u64 = 60;

/// Cache entry with timestamp for TTL validation
#[derive(Clone, Debug)]
struct CacheEntry<T> {
    value: T,
    created_at: Instant,
    ttl_secs: u64,
}

impl<T> CacheEntry<T> {
    fn is_expired(&self) -> bool {
        self.created_at.elapsed() > Duration::from_secs(self.ttl_secs)
    }

    fn remaining_ttl(&self) -> u64 {
        let elapsed = self.created_at.elapsed().as_secs();
        self.ttl_secs.saturating_sub(elapsed)
    }
}

/// TTL cache keyed by list name (e.g. "products:active", "categories:all")
#[derive(Clone)]
pub struct ListCache<T: Clone> {
    store: Arc<DashMap<String, CacheEntry<T>>>,
    ttl_secs: u64,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl<T: Clone> Default for ListCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> ListCache<T> {
    /// New cache with the default TTL
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL_SECS)
    }

    /// New cache with a custom TTL
    pub fn with_ttl(ttl_secs: u64) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            ttl_secs,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get with TTL validation. Expired entries are dropped on access.
    pub fn get(&self, key: &str) -> Option<T> {
        if let Some(entry) = self.store.get(key) {
            if entry.is_expired() {
                drop(entry); // Release read lock before mutating
                self.store.remove(key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("📭 CACHE MISS (expired): {}", key);
                None
            } else {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("✅ CACHE HIT: {} (TTL: {}s remaining)", key, entry.remaining_ttl());
                Some(entry.value.clone())
            }
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!("📭 CACHE MISS: {}", key);
            None
        }
    }

    /// Store a freshly fetched list
    pub fn set(&self, key: &str, value: T) {
        self.store.insert(
            key.to_string(),
            CacheEntry {
                value,
                created_at: Instant::now(),
                ttl_secs: self.ttl_secs,
            },
        );
        debug!("💾 CACHE SET: {} (TTL: {}s)", key, self.ttl_secs);
    }

    /// Drop every entry. Called after any catalog mutation, since list
    /// responses embed derived fields a single-entry invalidation would miss.
    pub fn clear(&self) {
        self.store.clear();
        debug!("🗑️ CACHE CLEARED");
    }

    /// Cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            entries: self.store.len(),
            hits,
            misses,
            hit_rate,
            ttl_secs: self.ttl_secs,
        }
    }
}

/// Cache statistics snapshot
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub ttl_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_set_get() {
        let cache: ListCache<Vec<i64>> = ListCache::new();
        cache.set("products:all", vec![1, 2, 3]);
        assert_eq!(cache.get("products:all"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_cache_miss() {
        let cache: ListCache<Vec<i64>> = ListCache::new();
        assert!(cache.get("categories:all").is_none());
    }

    #[test]
    fn test_clear_invalidates_everything() {
        let cache: ListCache<i64> = ListCache::new();
        cache.set("a", 1);
        cache.set("b", 2);
        cache.clear();
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_none());
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let cache: ListCache<i64> = ListCache::with_ttl(0);
        cache.set("a", 1);
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get("a").is_none());
    }

    #[test]
    fn test_cache_stats() {
        let cache: ListCache<i64> = ListCache::new();
        cache.set("a", 1);
        cache.get("a"); // HIT
        cache.get("missing"); // MISS
        let stats = cache.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }
}
