//! Persistent key-value storage for Flashdeck
//!
//! A small string store that survives across page loads. It holds the
//! serialized catalog, its cache timestamp and the recently used list.
//! No transactional guarantees: a stale read only costs a refetch.
//!
//! # Layout
//!
//! - [`CATALOG_KEY`]: serialized catalog JSON
//! - [`CATALOG_TIMESTAMP_KEY`]: cache creation time, epoch milliseconds
//! - [`RECENT_KEY`]: JSON array of recently used entry ids

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use thiserror::Error;

pub const CATALOG_KEY: &str = "flashdeck.catalog";
pub const CATALOG_TIMESTAMP_KEY: &str = "flashdeck.catalog.timestamp";
pub const RECENT_KEY: &str = "flashdeck.recent";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// String key-value store shared by the catalog cache and the recent list
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_keys_are_distinct() {
        assert_ne!(CATALOG_KEY, CATALOG_TIMESTAMP_KEY);
        assert_ne!(CATALOG_KEY, RECENT_KEY);
        assert!(CATALOG_TIMESTAMP_KEY.starts_with(CATALOG_KEY));
    }
}
