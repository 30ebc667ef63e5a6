//! # flightcache
//!
//! Read-through cache in front of a slow store, with stampede protection.
//!
//! ## Architecture
//! - **Cache**: AHash map behind a readers/writer lock, negative entries included
//! - **FlightGroup**: claim-or-join registry, one in-flight call per key
//! - **Coordinator**: cache-aside reads, coalesced misses, hit/miss/store-call stats
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use flightcache::{Cache, Coordinator};
//! use slowdb::BackingStore;
//!
//! let store = Arc::new(BackingStore::new(Duration::ZERO));
//! store.insert("k1", "v1").unwrap();
//!
//! let coordinator = Coordinator::new(store, Arc::new(Cache::new()));
//! assert_eq!(coordinator.get("k1").unwrap(), "v1");
//! assert_eq!(coordinator.get("k1").unwrap(), "v1");
//! assert_eq!(coordinator.stats().hits, 1);
//! assert_eq!(coordinator.stats().store_calls, 1);
//! ```

#![warn(missing_docs)]

mod cache;
mod coordinator;
mod entry;
mod flight;
mod stats;

pub use cache::Cache;
pub use coordinator::Coordinator;
pub use entry::Entry;
pub use flight::{Claim, FlightGroup, InFlight, Leader};
pub use stats::{CacheStats, StatsSnapshot};
pub use slowdb::{Error, Result};
