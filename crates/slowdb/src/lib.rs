//! # slowdb
//!
//! A simulated slow source-of-truth store.
//!
//! ## Behavior
//! - String keys and values held in memory
//! - Every `insert`/`select` sleeps for a fixed delay before touching state
//! - Zero delay is valid and keeps tests deterministic

#![warn(missing_docs)]

mod config;
mod error;
mod store;

pub use config::{StoreConfig, DELAY_ENV};
pub use error::{Error, Result};
pub use store::BackingStore;
