//! Thread-safe key/value cache
//!
//! Unbounded: entries are never evicted, only dropped wholesale by `clear`.

use std::collections::HashMap;

use ahash::RandomState;
use parking_lot::RwLock;

use crate::entry::Entry;

/// Cache of per-key lookup outcomes
#[derive(Default)]
pub struct Cache {
    map: RwLock<HashMap<String, Entry, RandomState>>,
}

impl Cache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `entry` under `key`, replacing any previous entry
    pub fn set(&self, key: &str, entry: Entry) {
        self.map.write().insert(key.to_string(), entry);
    }

    /// Get the entry for `key`, `None` if nothing is cached
    pub fn get(&self, key: &str) -> Option<Entry> {
        self.map.read().get(key).cloned()
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.map.write().clear();
    }

    /// Get the number of cached keys
    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }

    /// Copy of every cached entry
    pub fn snapshot(&self) -> HashMap<String, Entry> {
        self.map
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
