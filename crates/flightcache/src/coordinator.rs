//! Coordinator: cache-aside reads with coalesced misses

use std::sync::Arc;

use slowdb::{BackingStore, Error, Result};
use tracing::{trace, warn};

use crate::cache::Cache;
use crate::entry::Entry;
use crate::flight::FlightGroup;
use crate::stats::{CacheStats, StatsSnapshot};

/// Read-through layer combining a [`Cache`] with a [`BackingStore`]
pub struct Coordinator {
    /// Source of truth
    store: Arc<BackingStore>,

    /// Positive and negative lookup outcomes
    cache: Arc<Cache>,

    /// Outstanding store calls, one per key
    flights: FlightGroup<Result<String>>,

    /// Hit/miss/store-call counters for this instance
    stats: CacheStats,
}

impl Coordinator {
    /// Create a coordinator over `store` and `cache`
    ///
    /// # Arguments
    /// * `store` - Backing store consulted on misses
    /// * `cache` - Cache populated with every resolved outcome
    pub fn new(store: Arc<BackingStore>, cache: Arc<Cache>) -> Self {
        Self {
            store,
            cache,
            flights: FlightGroup::new(),
            stats: CacheStats::new(),
        }
    }

    /// Get a value from cache or the backing store
    ///
    /// A cached negative entry counts as a hit and returns `Error::NotFound`.
    /// On a miss, concurrent callers for the same key share one store call
    /// and all receive its outcome.
    ///
    /// # Arguments
    /// * `key` - Key to look up
    ///
    /// # Returns
    /// * `Result<String>` - The value, or `Error::NotFound`
    pub fn get(&self, key: &str) -> Result<String> {
        if let Some(entry) = self.cache.get(key) {
            self.stats.record_hit();
            trace!(key, found = entry.is_found(), "cache hit");
            return entry.into_result(key);
        }

        // Every caller that saw nothing cached is a miss, leader or not
        self.stats.record_miss();
        trace!(key, "cache miss");

        self.flights.run(key, || self.load(key))
    }

    /// Leader path: one store round trip, then populate the cache
    fn load(&self, key: &str) -> Result<String> {
        self.stats.record_store_call();
        let result = self.store.select(key);

        match &result {
            Ok(value) => self.cache.set(key, Entry::Found(value.clone())),
            Err(Error::NotFound { .. }) => self.cache.set(key, Entry::NotFound),
            Err(err) => warn!(key, %err, "store error left uncached"),
        }

        result
    }

    /// Get current statistics
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Get the cache
    pub fn cache(&self) -> &Arc<Cache> {
        &self.cache
    }

    /// Get the backing store
    pub fn store(&self) -> &Arc<BackingStore> {
        &self.store
    }

    /// Number of keys with a store call in progress
    pub fn in_flight(&self) -> usize {
        self.flights.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn coordinator(delay: Duration) -> Coordinator {
        let store = Arc::new(BackingStore::new(delay));
        for (k, v) in [("k1", "v1"), ("k2", "v2"), ("k3", "v3")] {
            store.insert(k, v).unwrap();
        }
        Coordinator::new(store, Arc::new(Cache::new()))
    }

    fn stats(hits: u64, misses: u64, store_calls: u64) -> StatsSnapshot {
        StatsSnapshot {
            hits,
            misses,
            store_calls,
        }
    }

    #[test]
    fn test_get_found_then_hit() {
        let c = coordinator(Duration::ZERO);

        assert_eq!(c.get("k1").unwrap(), "v1");
        assert_eq!(c.stats(), stats(0, 1, 1));

        assert_eq!(c.get("k1").unwrap(), "v1");
        assert_eq!(c.stats(), stats(1, 1, 1));
    }

    #[test]
    fn test_get_absent_is_negatively_cached() {
        let c = coordinator(Duration::ZERO);

        assert_eq!(c.get("k4").unwrap_err(), Error::not_found("k4"));
        assert_eq!(c.stats(), stats(0, 1, 1));
        assert_eq!(c.cache().get("k4"), Some(Entry::NotFound));

        assert_eq!(c.get("k4").unwrap_err(), Error::not_found("k4"));
        assert_eq!(c.stats(), stats(1, 1, 1));
    }

    #[test]
    fn test_cache_populated_by_leader() {
        let c = coordinator(Duration::ZERO);
        c.get("k2").unwrap();

        assert_eq!(c.cache().get("k2"), Some(Entry::Found("v2".to_string())));
        assert_eq!(c.in_flight(), 0);
    }

    #[test]
    fn test_cached_entry_shadows_store() {
        let c = coordinator(Duration::ZERO);
        c.cache().set("k1", Entry::Found("stale".to_string()));

        assert_eq!(c.get("k1").unwrap(), "stale");
        assert_eq!(c.stats(), stats(1, 0, 0));
    }

    #[test]
    fn test_clear_forces_reload() {
        let c = coordinator(Duration::ZERO);
        c.get("k1").unwrap();
        c.cache().clear();

        assert_eq!(c.get("k1").unwrap(), "v1");
        assert_eq!(c.stats(), stats(0, 2, 2));
    }

    #[test]
    fn test_instances_keep_separate_stats() {
        let a = coordinator(Duration::ZERO);
        let b = coordinator(Duration::ZERO);
        a.get("k1").unwrap();

        assert_eq!(a.stats(), stats(0, 1, 1));
        assert_eq!(b.stats(), StatsSnapshot::default());
    }
}
