//! Catalog loading policy
//!
//! Online: a fresh cache is served when preferred, otherwise the document is
//! fetched and re-cached; a failed fetch falls back to a fresh cache.
//! Offline: only a fresh cache will do.

use crate::cache::CatalogCache;
use crate::catalog::Catalog;
use crate::fetcher::CatalogFetch;
use crate::CatalogError;
use flashdeck_network::ConnectivityMonitor;
use std::sync::Arc;

/// Where a loaded catalog came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOrigin {
    Network,
    Cache,
}

/// A loaded catalog
#[derive(Debug, Clone)]
pub struct CatalogLoad {
    pub catalog: Catalog,
    pub origin: CatalogOrigin,
    /// Served from cache because the network could not be used
    pub degraded: bool,
}

pub struct CatalogService {
    fetcher: Arc<dyn CatalogFetch>,
    cache: Option<CatalogCache>,
    connectivity: ConnectivityMonitor,
    prefer_cache: bool,
}

impl CatalogService {
    pub fn new(fetcher: Arc<dyn CatalogFetch>, connectivity: ConnectivityMonitor) -> Self {
        Self {
            fetcher,
            cache: None,
            connectivity,
            prefer_cache: false,
        }
    }

    /// Enable the local cache
    pub fn with_cache(mut self, cache: CatalogCache, prefer_cache: bool) -> Self {
        self.cache = Some(cache);
        self.prefer_cache = prefer_cache;
        self
    }

    pub async fn load(&self) -> Result<CatalogLoad, CatalogError> {
        let cached = self.read_cache();

        if !self.connectivity.is_online() {
            return match cached {
                Some(catalog) => {
                    tracing::warn!("Offline, serving cached catalog");
                    Ok(CatalogLoad {
                        catalog,
                        origin: CatalogOrigin::Cache,
                        degraded: true,
                    })
                }
                None => Err(CatalogError::Offline),
            };
        }

        if self.prefer_cache
            && let Some(catalog) = cached.clone()
        {
            tracing::info!("Serving cached catalog ({} entries)", catalog.len());
            return Ok(CatalogLoad {
                catalog,
                origin: CatalogOrigin::Cache,
                degraded: false,
            });
        }

        match self.fetch_and_cache().await {
            Ok(load) => Ok(load),
            Err(e @ CatalogError::FetchFailed { .. }) => match cached {
                Some(catalog) => {
                    tracing::warn!("{}; falling back to cached catalog", e);
                    Ok(CatalogLoad {
                        catalog,
                        origin: CatalogOrigin::Cache,
                        degraded: true,
                    })
                }
                None => Err(e),
            },
            Err(e) => Err(e),
        }
    }

    /// Fetch from the network and re-cache, ignoring any cached copy
    pub async fn refresh(&self) -> Result<CatalogLoad, CatalogError> {
        if !self.connectivity.is_online() {
            return Err(CatalogError::Offline);
        }
        self.fetch_and_cache().await
    }

    async fn fetch_and_cache(&self) -> Result<CatalogLoad, CatalogError> {
        let body = self.fetcher.fetch().await?;
        let catalog = Catalog::parse(&body)?;

        if let Some(cache) = &self.cache
            && let Err(e) = cache.write(&catalog)
        {
            tracing::warn!("Failed to cache catalog: {}", e);
        }
        Ok(CatalogLoad {
            catalog,
            origin: CatalogOrigin::Network,
            degraded: false,
        })
    }

    fn read_cache(&self) -> Option<Catalog> {
        let cache = self.cache.as_ref()?;
        match cache.read() {
            Ok(cached) => cached.map(|c| c.catalog),
            Err(e) => {
                tracing::warn!("Catalog cache unreadable: {}", e);
                None
            }
        }
    }
}
