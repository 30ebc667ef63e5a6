//! Store configuration

use std::env;
use std::time::Duration;

/// Environment variable holding the per-call delay in milliseconds
pub const DELAY_ENV: &str = "SLOWDB_DELAY_MS";

/// Configuration for a [`BackingStore`](crate::BackingStore)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreConfig {
    /// Artificial latency charged to every `insert` and `select`
    pub delay: Duration,
}

impl StoreConfig {
    /// Create a config with zero delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-call delay
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the per-call delay in milliseconds
    #[must_use]
    pub fn delay_ms(self, ms: u64) -> Self {
        self.with_delay(Duration::from_millis(ms))
    }

    /// Load configuration from environment variables.
    ///
    /// Missing or unparsable `SLOWDB_DELAY_MS` leaves the delay at zero.
    pub fn from_env() -> Self {
        let delay = env::var(DELAY_ENV)
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or_default();

        Self { delay }
    }
}
