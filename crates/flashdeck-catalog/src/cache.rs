//! Time-boxed local catalog cache

use crate::catalog::Catalog;
use crate::clock::Clock;
use crate::CatalogError;
use flashdeck_storage::{CATALOG_KEY, CATALOG_TIMESTAMP_KEY, KeyValueStore};
use std::sync::Arc;
use std::time::Duration;

/// A catalog read back from the store
#[derive(Debug, Clone)]
pub struct CachedCatalog {
    pub catalog: Catalog,
    /// Creation time, epoch milliseconds
    pub stored_at: u64,
}

/// Serialized catalog plus its creation timestamp
pub struct CatalogCache {
    store: Arc<dyn KeyValueStore>,
    expiry: Duration,
    clock: Arc<dyn Clock>,
}

impl CatalogCache {
    pub fn new(store: Arc<dyn KeyValueStore>, expiry: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            expiry,
            clock,
        }
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    /// Read the cached catalog.
    ///
    /// An expired, unreadable or half-written cache is removed and reported
    /// as absent.
    pub fn read(&self) -> Result<Option<CachedCatalog>, CatalogError> {
        let Some(stamp) = self.store.get(CATALOG_TIMESTAMP_KEY)? else {
            return Ok(None);
        };

        let Ok(stored_at) = stamp.trim().parse::<u64>() else {
            tracing::warn!("Discarding catalog cache with bad timestamp '{}'", stamp);
            self.clear()?;
            return Ok(None);
        };

        let now = self.clock.now_millis();
        if stored_at > now {
            tracing::warn!("Discarding catalog cache stamped in the future ({})", stored_at);
            self.clear()?;
            return Ok(None);
        }

        let age = now - stored_at;
        if u128::from(age) > self.expiry.as_millis() {
            tracing::info!(
                "Catalog cache expired ({} min old), discarding",
                age / 60_000
            );
            self.clear()?;
            return Ok(None);
        }

        let Some(json) = self.store.get(CATALOG_KEY)? else {
            return Ok(None);
        };

        match Catalog::parse(&json) {
            Ok(catalog) => Ok(Some(CachedCatalog { catalog, stored_at })),
            Err(e) => {
                tracing::warn!("Discarding unreadable catalog cache: {}", e);
                self.clear()?;
                Ok(None)
            }
        }
    }

    /// Store a catalog stamped with the current time
    pub fn write(&self, catalog: &Catalog) -> Result<(), CatalogError> {
        self.store.set(CATALOG_KEY, &catalog.to_json()?)?;
        self.store
            .set(CATALOG_TIMESTAMP_KEY, &self.clock.now_millis().to_string())?;
        tracing::debug!("Cached catalog with {} entries", catalog.len());
        Ok(())
    }

    pub fn clear(&self) -> Result<(), CatalogError> {
        self.store.remove(CATALOG_KEY)?;
        self.store.remove(CATALOG_TIMESTAMP_KEY)?;
        Ok(())
    }
}
