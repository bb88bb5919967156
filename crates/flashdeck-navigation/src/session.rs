//! Frontend bootstrap
//!
//! Wires configuration, storage, the redirector, the catalog service and
//! the navigation controller together, then keeps the controller in step
//! with connectivity changes.

use crate::controller::{ControllerSettings, NavigationController, NavigationOutcome, NavigationRequest};
use crate::error::{FrontendError, NavigationError};
use crate::history::HistorySink;
use crate::location::PageLocation;
use crate::notify::{Notification, Notifier};
use crate::state::NavigationState;
use flashdeck_catalog::{
    Catalog, CatalogCache, CatalogFetch, CatalogOrigin, CatalogService, Clock, HttpCatalogFetcher,
    SystemClock,
};
use flashdeck_config::{CacheSettings, FlashdeckConfig};
use flashdeck_network::{
    ConnectivityMonitor, ElementId, HttpAssetProbe, HttpClient, NetworkError, Redirector,
    RequestInterceptor, ResourceElement, ResourceKind, ResourceRegistry,
};
use flashdeck_player::PlayerAdapter;
use flashdeck_storage::{KeyValueStore, MemoryStore, SqliteStore};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Open the persistent store, falling back to memory
pub fn open_store(cache: &CacheSettings) -> Arc<dyn KeyValueStore> {
    match SqliteStore::open(&cache.store_path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::warn!(
                "Store at {} unavailable ({}), keeping state in memory",
                cache.store_path,
                e
            );
            Arc::new(MemoryStore::new())
        }
    }
}

pub struct FrontendBuilder {
    config: FlashdeckConfig,
    adapter: Arc<dyn PlayerAdapter>,
    history: Arc<dyn HistorySink>,
    notifier: Arc<dyn Notifier>,
    store: Option<Arc<dyn KeyValueStore>>,
    fetcher: Option<Arc<dyn CatalogFetch>>,
    connectivity: ConnectivityMonitor,
    clock: Arc<dyn Clock>,
}

impl FrontendBuilder {
    /// Use this store instead of opening the configured one
    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Use this catalog source instead of HTTP
    pub fn fetcher(mut self, fetcher: Arc<dyn CatalogFetch>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn connectivity(mut self, connectivity: ConnectivityMonitor) -> Self {
        self.connectivity = connectivity;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Load the catalog and start the frontend
    pub async fn start(self) -> Result<Frontend, FrontendError> {
        let config = self.config;
        let settings = ControllerSettings::from_config(&config)?;

        let redirector: Arc<dyn RequestInterceptor> =
            Arc::new(Redirector::new(config.redirect.rules.clone()));
        let client = HttpClient::new(redirector.clone(), config.catalog.request_timeout())?;

        let store = self.store.unwrap_or_else(|| open_store(&config.cache));

        let fetcher = self.fetcher.unwrap_or_else(|| {
            Arc::new(HttpCatalogFetcher::new(
                client.clone(),
                config.catalog.url.clone(),
                config.catalog.max_retries,
                config.catalog.retry_backoff(),
            ))
        });

        let mut service = CatalogService::new(fetcher, self.connectivity.clone());
        if config.cache.enabled {
            let cache = CatalogCache::new(store.clone(), config.cache.expiry(), self.clock);
            service = service.with_cache(cache, config.cache.prefer_cache);
        }

        let load = match service.load().await {
            Ok(load) => load,
            Err(e) => {
                let error = NavigationError::from(e);
                self.notifier.notify(Notification::from(&error));
                return Err(error.into());
            }
        };

        tracing::info!(
            "Frontend starting with {} catalog entries from {:?}{}",
            load.catalog.len(),
            load.origin,
            if load.degraded { " (degraded)" } else { "" }
        );

        let mut controller = NavigationController::new(
            load.catalog,
            self.adapter,
            self.history,
            self.notifier,
            settings,
        )
        .with_interceptor(redirector.clone())
        .with_store(store);

        if config.player.verify_assets {
            let probe = HttpAssetProbe::new(client, config.player.probe_timeout());
            controller = controller.with_probe(Arc::new(probe));
        }

        controller.set_online(self.connectivity.is_online());

        let controller = Arc::new(controller);
        let watcher = tokio::spawn(watch_connectivity(
            self.connectivity.subscribe(),
            controller.clone(),
            Arc::new(service),
            load.origin == CatalogOrigin::Cache && load.degraded,
        ));

        Ok(Frontend {
            controller,
            connectivity: self.connectivity,
            resources: Mutex::new(ResourceRegistry::new(redirector)),
            watcher,
        })
    }
}

/// Follow connectivity changes; refresh a degraded catalog once back online
async fn watch_connectivity(
    mut rx: watch::Receiver<bool>,
    controller: Arc<NavigationController>,
    service: Arc<CatalogService>,
    mut stale: bool,
) {
    while rx.changed().await.is_ok() {
        let online = *rx.borrow_and_update();
        controller.set_online(online);

        if !(online && stale) {
            continue;
        }

        match service.refresh().await {
            Ok(load) => {
                tracing::info!("Catalog refreshed with {} entries", load.catalog.len());
                controller.replace_catalog(load.catalog);
                stale = false;
            }
            Err(e) => tracing::warn!("Catalog refresh failed: {}", e),
        }
    }
}

/// A running frontend
pub struct Frontend {
    controller: Arc<NavigationController>,
    connectivity: ConnectivityMonitor,
    resources: Mutex<ResourceRegistry>,
    watcher: JoinHandle<()>,
}

impl Frontend {
    pub fn builder(
        config: FlashdeckConfig,
        adapter: Arc<dyn PlayerAdapter>,
        history: Arc<dyn HistorySink>,
        notifier: Arc<dyn Notifier>,
    ) -> FrontendBuilder {
        FrontendBuilder {
            config,
            adapter,
            history,
            notifier,
            store: None,
            fetcher: None,
            connectivity: ConnectivityMonitor::default(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn controller(&self) -> &Arc<NavigationController> {
        &self.controller
    }

    pub fn catalog(&self) -> Arc<Catalog> {
        self.controller.catalog()
    }

    pub fn state(&self) -> NavigationState {
        self.controller.state()
    }

    pub fn recent(&self) -> Vec<String> {
        self.controller.recent()
    }

    /// Initial page load at `address`
    pub async fn open(&self, address: &str) -> NavigationOutcome {
        match self.locate(address) {
            Ok(location) => self.controller.navigate(NavigationRequest::page_load(location)).await,
            Err(e) => self.controller.report(e),
        }
    }

    /// Browser back/forward landed on `address`
    pub async fn back_forward(&self, address: &str) -> NavigationOutcome {
        match self.locate(address) {
            Ok(location) => {
                self.controller
                    .navigate(NavigationRequest::history_pop(location))
                    .await
            }
            Err(e) => self.controller.report(e),
        }
    }

    /// User picked an entry in the selector
    pub async fn select(&self, id: &str) -> NavigationOutcome {
        self.controller.navigate(NavigationRequest::select(id)).await
    }

    pub async fn retry(&self) -> Option<NavigationOutcome> {
        self.controller.retry().await
    }

    pub fn set_language(&self, code: &str) -> bool {
        self.controller.set_language(code)
    }

    pub fn set_online(&self, online: bool) {
        self.controller.set_online(online);
        self.connectivity.set_online(online);
    }

    /// Register the loadable elements already on the page
    pub fn adopt_resources(&self, elements: impl IntoIterator<Item = ResourceElement>) -> Vec<ElementId> {
        let (ids, _) = self.lock_resources().adopt_existing(elements);
        ids
    }

    pub fn create_resource(&self, kind: ResourceKind, source: Option<&str>) -> ElementId {
        self.lock_resources().create(kind, source)
    }

    /// Set an element's source; returns the address actually used
    pub fn assign_resource_source(&self, id: ElementId, address: &str) -> Result<String, NetworkError> {
        self.lock_resources()
            .assign_source(id, address)
            .map(str::to_string)
    }

    pub fn resource(&self, id: ElementId) -> Option<ResourceElement> {
        self.lock_resources().get(id).cloned()
    }

    fn lock_resources(&self) -> std::sync::MutexGuard<'_, ResourceRegistry> {
        self.resources.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn locate(&self, address: &str) -> Result<PageLocation, NavigationError> {
        PageLocation::parse(address, &self.controller.settings().site_origin).map_err(|e| {
            tracing::warn!("Unusable page address '{}': {}", address, e);
            NavigationError::EntryNotFound(address.to_string())
        })
    }
}

impl Drop for Frontend {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}
