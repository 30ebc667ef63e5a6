//! Cached outcome of a store lookup

use slowdb::{Error, Result};

/// Cached outcome for a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// The store held `value`
    Found(String),
    /// The store had no record (negative entry)
    NotFound,
}

impl Entry {
    /// Turn the entry back into the lookup result for `key`
    pub fn into_result(self, key: &str) -> Result<String> {
        match self {
            Entry::Found(value) => Ok(value),
            Entry::NotFound => Err(Error::not_found(key)),
        }
    }

    /// Returns true for a positive entry
    pub fn is_found(&self) -> bool {
        matches!(self, Entry::Found(_))
    }
}

impl From<String> for Entry {
    fn from(value: String) -> Self {
        Entry::Found(value)
    }
}
