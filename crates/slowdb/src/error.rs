//! Error types for slowdb

/// Result type alias for slowdb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for store and cache lookups
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Key is absent
    #[error("key not found: {key}")]
    NotFound {
        /// Key that was looked up
        key: String,
    },

    /// Key is already present
    #[error("key already exists: {key}")]
    AlreadyExists {
        /// Key that was inserted
        key: String,
    },
}

impl Error {
    /// Create a `NotFound` error for `key`
    pub fn not_found(key: impl Into<String>) -> Self {
        Error::NotFound { key: key.into() }
    }

    /// Create an `AlreadyExists` error for `key`
    pub fn already_exists(key: impl Into<String>) -> Self {
        Error::AlreadyExists { key: key.into() }
    }

    /// Returns true for `NotFound`
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Returns true for `AlreadyExists`
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Error::AlreadyExists { .. })
    }
}
