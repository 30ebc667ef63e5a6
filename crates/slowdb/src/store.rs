//! Slow in-memory store
//!
//! Every call sleeps for the configured delay first, so the cost is
//! charged even when the call fails.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use ahash::RandomState;
use parking_lot::RwLock;
use tracing::trace;

use crate::config::StoreConfig;
use crate::error::{Error, Result};

/// BackingStore simulates a slow source of truth
pub struct BackingStore {
    /// Records: key -> value
    records: RwLock<HashMap<String, String, RandomState>>,

    /// Artificial latency per call
    delay: Duration,
}

impl BackingStore {
    /// Create an empty store with the given per-call delay
    ///
    /// # Arguments
    /// * `delay` - Wall-clock latency charged to every `insert` and `select`
    pub fn new(delay: Duration) -> Self {
        Self::with_config(StoreConfig::new().with_delay(delay))
    }

    /// Create an empty store from a [`StoreConfig`]
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            records: RwLock::new(HashMap::default()),
            delay: config.delay,
        }
    }

    /// Insert a new record
    ///
    /// # Arguments
    /// * `key` - Record key
    /// * `value` - Record value
    ///
    /// # Returns
    /// * `Result<()>` - `Error::AlreadyExists` if `key` is present; the
    ///   existing value is left untouched
    pub fn insert(&self, key: &str, value: &str) -> Result<()> {
        self.wait();

        let mut records = self.records.write();
        match records.entry(key.to_string()) {
            Entry::Occupied(_) => {
                trace!(key, "insert rejected, key exists");
                Err(Error::already_exists(key))
            }
            Entry::Vacant(slot) => {
                slot.insert(value.to_string());
                trace!(key, "inserted");
                Ok(())
            }
        }
    }

    /// Look up a record
    ///
    /// # Arguments
    /// * `key` - Record key
    ///
    /// # Returns
    /// * `Result<String>` - The stored value, or `Error::NotFound`
    pub fn select(&self, key: &str) -> Result<String> {
        self.wait();

        let records = self.records.read();
        match records.get(key) {
            Some(value) => {
                trace!(key, "select hit");
                Ok(value.clone())
            }
            None => {
                trace!(key, "select miss");
                Err(Error::not_found(key))
            }
        }
    }

    /// Check for a key without paying the delay
    pub fn contains(&self, key: &str) -> bool {
        self.records.read().contains_key(key)
    }

    /// Get the configured per-call delay
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Get the number of records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Copy of all records
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.records
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn wait(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    fn expected(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_insert_one() {
        let db = BackingStore::new(Duration::ZERO);
        db.insert("k1", "v1").unwrap();

        assert_eq!(db.snapshot(), expected(&[("k1", "v1")]));
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn test_insert_two() {
        let db = BackingStore::new(Duration::ZERO);
        db.insert("k1", "v1").unwrap();
        db.insert("k2", "v2").unwrap();

        assert_eq!(db.snapshot(), expected(&[("k1", "v1"), ("k2", "v2")]));
    }

    #[test]
    fn test_insert_duplicate() {
        let db = BackingStore::new(Duration::ZERO);
        db.insert("k1", "v1").unwrap();

        let err = db.insert("k1", "v2").unwrap_err();
        assert_eq!(err, Error::already_exists("k1"));

        // First write survives
        assert_eq!(db.snapshot(), expected(&[("k1", "v1")]));
    }

    #[test]
    fn test_select() {
        let db = BackingStore::new(Duration::ZERO);
        db.insert("k1", "v1").unwrap();
        db.insert("k2", "v2").unwrap();
        let _ = db.insert("k1", "v3");

        assert_eq!(db.select("k2").unwrap(), "v2");
        assert_eq!(db.select("k1").unwrap(), "v1");
        assert_eq!(db.select("k3").unwrap_err(), Error::not_found("k3"));
    }

    #[test]
    fn test_select_empty_value_is_found() {
        let db = BackingStore::new(Duration::ZERO);
        db.insert("blank", "").unwrap();

        assert_eq!(db.select("blank").unwrap(), "");
        assert!(db.select("missing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_select_charges_delay() {
        let delay = Duration::from_millis(100);
        let db = BackingStore::new(delay);

        let start = Instant::now();
        let _ = db.select("k1");
        assert!(start.elapsed() >= delay);
    }

    #[test]
    fn test_failed_insert_charges_delay() {
        let delay = Duration::from_millis(50);
        let db = BackingStore::new(delay);
        db.insert("k1", "v1").unwrap();

        let start = Instant::now();
        assert!(db.insert("k1", "v2").is_err());
        assert!(start.elapsed() >= delay);
    }

    #[test]
    fn test_contains_and_config() {
        let db = BackingStore::with_config(StoreConfig::new().delay_ms(0));
        assert!(db.is_empty());
        assert!(!db.contains("k1"));

        db.insert("k1", "v1").unwrap();
        assert!(db.contains("k1"));
        assert_eq!(db.delay(), Duration::ZERO);
    }

    #[test]
    fn test_concurrent_insert_select() {
        let db = Arc::new(BackingStore::new(Duration::ZERO));
        let data = [("k1", "v1"), ("k2", "v2"), ("k3", "v3")];

        let mut handles = Vec::new();
        for _ in 0..100 {
            for (k, v) in data {
                let writer = Arc::clone(&db);
                handles.push(std::thread::spawn(move || {
                    let _ = writer.insert(k, v);
                }));
                let reader = Arc::clone(&db);
                handles.push(std::thread::spawn(move || {
                    let _ = reader.select(k);
                }));
            }
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(db.snapshot(), expected(&data));
    }
}
