//! Coordinator statistics tracking

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters owned by a coordinator
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    store_calls: AtomicU64,
}

impl CacheStats {
    /// Create new stats tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a lookup served from cache
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lookup that found nothing cached
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a call dispatched to the backing store
    pub fn record_store_call(&self) {
        self.store_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Read the current counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            store_calls: self.store_calls.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Lookups resolved from cache, positive or negative
    pub hits: u64,
    /// Lookups that found nothing cached
    pub misses: u64,
    /// Coalesced groups dispatched to the store
    pub store_calls: u64,
}

impl StatsSnapshot {
    /// Total lookups
    pub fn total(&self) -> u64 {
        self.hits + self.misses
    }

    /// Calculate hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
