//! Navigation state machine
//!
//! `Idle -> Resolving -> Loading -> Ready`, with `Error` reachable from
//! `Resolving` and `Loading`. Every navigation takes a ticket from a
//! monotonically increasing sequence. Its results are applied only while the
//! ticket is still the latest one; a superseded navigation runs to completion
//! and is then discarded.

use crate::error::{FrontendError, NavigationError};
use crate::history::{HistoryMode, HistorySink};
use crate::location::{PageLocation, canonical_url};
use crate::notify::{Notification, Notifier};
use crate::state::{NavigationPhase, NavigationState};
use flashdeck_catalog::{Catalog, CatalogEntry, RecentList, resolve};
use flashdeck_config::FlashdeckConfig;
use flashdeck_network::{AssetProbe, PassThrough, RequestInterceptor};
use flashdeck_player::{
    LoadOptions, PlayerAdapter, PlayerContainer, PlayerError, PlayerEvent, PlayerHandle,
};
use flashdeck_storage::KeyValueStore;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;
use url::Url;

/// What started a navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Initial page load
    PageLoad,
    /// Explicit choice in the selector
    UserSelection,
    /// Browser back/forward
    HistoryPop,
}

impl Trigger {
    fn history_mode(self) -> HistoryMode {
        match self {
            Trigger::UserSelection => HistoryMode::Push,
            Trigger::PageLoad | Trigger::HistoryPop => HistoryMode::Replace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Location(PageLocation),
    /// Catalog id or display name
    Entry(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub trigger: Trigger,
    pub target: Target,
}

impl NavigationRequest {
    pub fn page_load(location: PageLocation) -> Self {
        Self {
            trigger: Trigger::PageLoad,
            target: Target::Location(location),
        }
    }

    pub fn history_pop(location: PageLocation) -> Self {
        Self {
            trigger: Trigger::HistoryPop,
            target: Target::Location(location),
        }
    }

    pub fn select(id: impl Into<String>) -> Self {
        Self {
            trigger: Trigger::UserSelection,
            target: Target::Entry(id.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Entry is playing; `url` is the address now shown
    Ready { entry_id: String, url: Url },
    /// Back on the home page
    Home,
    Failed(NavigationError),
    /// A later navigation took over
    Superseded,
}

impl NavigationOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, NavigationOutcome::Ready { .. })
    }
}

#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// Element id the player mounts into
    pub container: String,
    pub load_timeout: Duration,
    /// Relative asset paths are joined onto this
    pub asset_base_url: Option<Url>,
    pub site_origin: Url,
    pub default_language: String,
    pub supported_languages: Vec<String>,
    pub recent_limit: usize,
}

impl ControllerSettings {
    pub fn from_config(config: &FlashdeckConfig) -> Result<Self, FrontendError> {
        let site_origin = parse_setting("site_origin", &config.navigation.site_origin)?;
        let asset_base_url = config
            .player
            .asset_base_url
            .as_deref()
            .map(|base| parse_setting("asset_base_url", base))
            .transpose()?;

        Ok(Self {
            container: config.player.container.clone(),
            load_timeout: config.player.load_timeout(),
            asset_base_url,
            site_origin,
            default_language: config.navigation.default_language.to_ascii_lowercase(),
            supported_languages: config
                .navigation
                .supported_languages
                .iter()
                .map(|lang| lang.to_ascii_lowercase())
                .collect(),
            recent_limit: config.navigation.recent_limit,
        })
    }

    pub fn supports_language(&self, code: &str) -> bool {
        self.supported_languages
            .iter()
            .any(|lang| lang.eq_ignore_ascii_case(code))
    }
}

fn parse_setting(field: &'static str, value: &str) -> Result<Url, FrontendError> {
    Url::parse(value).map_err(|e| FrontendError::InvalidUrl {
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

enum Resolved {
    Home,
    Entry(CatalogEntry),
    NotFound(String),
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct NavigationController {
    catalog: RwLock<Arc<Catalog>>,
    adapter: Arc<dyn PlayerAdapter>,
    interceptor: Arc<dyn RequestInterceptor>,
    probe: Option<Arc<dyn AssetProbe>>,
    history: Arc<dyn HistorySink>,
    notifier: Arc<dyn Notifier>,
    store: Option<Arc<dyn KeyValueStore>>,
    settings: ControllerSettings,
    sequence: AtomicU64,
    // Lock order: state, then any of the others
    state: Mutex<NavigationState>,
    recent: Mutex<RecentList>,
    player: Mutex<Option<Box<dyn PlayerHandle>>>,
    last_failed: Mutex<Option<NavigationRequest>>,
}

impl NavigationController {
    pub fn new(
        catalog: Catalog,
        adapter: Arc<dyn PlayerAdapter>,
        history: Arc<dyn HistorySink>,
        notifier: Arc<dyn Notifier>,
        settings: ControllerSettings,
    ) -> Self {
        Self {
            catalog: RwLock::new(Arc::new(catalog)),
            adapter,
            interceptor: Arc::new(PassThrough),
            probe: None,
            history,
            notifier,
            store: None,
            sequence: AtomicU64::new(0),
            state: Mutex::new(NavigationState::new(settings.default_language.clone())),
            recent: Mutex::new(RecentList::new(settings.recent_limit)),
            player: Mutex::new(None),
            last_failed: Mutex::new(None),
            settings,
        }
    }

    /// Rewrite asset addresses before they reach the player
    pub fn with_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptor = interceptor;
        self
    }

    /// Check assets exist before loading them
    pub fn with_probe(mut self, probe: Arc<dyn AssetProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Persist the recent list, restoring any saved one
    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        match RecentList::load(store.as_ref(), self.settings.recent_limit) {
            Ok(mut recent) => {
                recent.retain_known(&self.catalog());
                *lock(&self.recent) = recent;
            }
            Err(e) => tracing::warn!("Could not restore recent list: {}", e),
        }
        self.store = Some(store);
        self
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn catalog(&self) -> Arc<Catalog> {
        self.catalog
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swap in a refreshed catalog
    pub fn replace_catalog(&self, catalog: Catalog) {
        tracing::info!("Catalog replaced ({} entries)", catalog.len());
        lock(&self.recent).retain_known(&catalog);
        *self.catalog.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(catalog);
    }

    pub fn state(&self) -> NavigationState {
        lock(&self.state).clone()
    }

    /// Recently used ids, most recent first
    pub fn recent(&self) -> Vec<String> {
        lock(&self.recent).to_vec()
    }

    /// Recently used entries still in the catalog
    pub fn recent_entries(&self) -> Vec<CatalogEntry> {
        let catalog = self.catalog();
        lock(&self.recent)
            .ids()
            .filter_map(|id| catalog.get(id).cloned())
            .collect()
    }

    pub fn set_online(&self, online: bool) {
        let mut state = lock(&self.state);
        if state.offline != online {
            return;
        }
        state.offline = !online;
        if online {
            tracing::info!("Connectivity restored");
        } else {
            tracing::warn!("Connectivity lost, running in degraded mode");
        }
    }

    /// Switch language and rewrite the address of the current entry
    pub fn set_language(&self, code: &str) -> bool {
        if !self.settings.supports_language(code) {
            tracing::warn!("Unsupported language '{}'", code);
            return false;
        }

        let mut state = lock(&self.state);
        state.language = code.to_ascii_lowercase();

        if let Some(id) = state.current_entry_id.as_deref()
            && let Some(entry) = self.catalog().get(id)
        {
            let url = self.canonical(entry, &state.language);
            self.history.replace(&url);
        }

        true
    }

    /// Re-issue the last failed navigation
    pub async fn retry(&self) -> Option<NavigationOutcome> {
        let request = lock(&self.last_failed).clone();
        match request {
            Some(request) => Some(self.navigate(request).await),
            None => None,
        }
    }

    /// Report a failure that happened outside a navigation
    pub fn report(&self, error: NavigationError) -> NavigationOutcome {
        let ticket = self.next_ticket();
        self.fail(ticket, None, error)
    }

    pub async fn navigate(&self, request: NavigationRequest) -> NavigationOutcome {
        let ticket = self.next_ticket();
        tracing::debug!("Navigation #{} started: {:?}", ticket, request.target);

        let (language, fullscreen) = match &request.target {
            Target::Location(location) => (location.language.clone(), location.fullscreen),
            Target::Entry(_) => (None, false),
        };

        {
            let mut state = lock(&self.state);
            if !self.is_current(ticket) {
                return NavigationOutcome::Superseded;
            }
            state.phase = NavigationPhase::Resolving;
            if let Some(language) = language {
                if self.settings.supports_language(&language) {
                    state.language = language;
                } else {
                    tracing::warn!("Ignoring unsupported language '{}'", language);
                }
            }
        }

        let entry = match self.resolve_target(&request.target) {
            Resolved::Entry(entry) => entry,
            Resolved::Home => return self.go_home(ticket),
            Resolved::NotFound(key) => {
                return self.fail(ticket, Some(&request), NavigationError::EntryNotFound(key));
            }
        };

        {
            let mut state = lock(&self.state);
            if !self.is_current(ticket) {
                return NavigationOutcome::Superseded;
            }
            if state.offline {
                drop(state);
                return self.fail(ticket, Some(&request), NavigationError::Offline);
            }
            state.phase = NavigationPhase::Loading;
        }

        let asset = self.asset_address(&entry.asset_path);
        match self.load_player(&entry, &asset, fullscreen).await {
            Ok(handle) => self.complete(ticket, &request, entry, handle, fullscreen),
            Err(e) => self.fail(ticket, Some(&request), e),
        }
    }

    fn next_ticket(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.sequence.load(Ordering::SeqCst) == ticket
    }

    fn resolve_target(&self, target: &Target) -> Resolved {
        let catalog = self.catalog();
        let find = |key: &str| resolve(key, &catalog).map(|found| found.entry.clone());

        match target {
            Target::Entry(id) => match find(id) {
                Some(entry) => Resolved::Entry(entry),
                None => Resolved::NotFound(id.clone()),
            },
            Target::Location(location) if location.is_home() => Resolved::Home,
            Target::Location(location) => {
                let by_key = location.key.as_deref().and_then(|key| find(key));
                match by_key.or_else(|| location.id.as_deref().and_then(|id| find(id))) {
                    Some(entry) => Resolved::Entry(entry),
                    None => Resolved::NotFound(
                        location
                            .key
                            .clone()
                            .or_else(|| location.id.clone())
                            .unwrap_or_default(),
                    ),
                }
            }
        }
    }

    /// Absolute, rewritten asset address
    fn asset_address(&self, asset_path: &str) -> String {
        let address = match (&self.settings.asset_base_url, Url::parse(asset_path)) {
            (_, Ok(_)) => asset_path.to_string(),
            (Some(base), Err(url::ParseError::RelativeUrlWithoutBase)) => base
                .join(asset_path)
                .map(String::from)
                .unwrap_or_else(|_| asset_path.to_string()),
            _ => asset_path.to_string(),
        };
        self.interceptor.apply(&address)
    }

    fn load_options(&self, entry: &CatalogEntry, fullscreen: bool) -> LoadOptions {
        let mut options = LoadOptions::new().fullscreen(fullscreen);
        if let Some(base) = &self.settings.asset_base_url {
            options = options.with_base_url(base.as_str());
        }
        if let Some(vars) = &entry.flash_vars {
            options = options.with_flash_vars(vars);
        }
        if let Some(player_options) = &entry.player_options {
            options = options.with_player_options(player_options);
        }
        options
    }

    async fn load_player(
        &self,
        entry: &CatalogEntry,
        asset: &str,
        fullscreen: bool,
    ) -> Result<Box<dyn PlayerHandle>, NavigationError> {
        let unreachable_asset = |cause: String| NavigationError::AssetUnreachable {
            asset: asset.to_string(),
            cause,
        };

        if let Some(probe) = &self.probe {
            probe.check(asset).await.map_err(|e| unreachable_asset(e.to_string()))?;
        }

        let container = PlayerContainer::new(self.settings.container.clone());
        let mut handle = self
            .adapter
            .create_player(&container)
            .map_err(|e| NavigationError::PlayerInitFailed(e.to_string()))?;

        tracing::debug!("Loading {} with {} player", asset, self.adapter.name());

        if let Err(e) = handle.load(asset, &self.load_options(entry, fullscreen)) {
            handle.close();
            return Err(match e {
                PlayerError::LoadFailed(cause) => unreachable_asset(cause),
                other => NavigationError::PlayerInitFailed(other.to_string()),
            });
        }

        let timeout = self.settings.load_timeout;
        let event = tokio::time::timeout(timeout, handle.next_event()).await;

        let error = match event {
            Ok(Some(PlayerEvent::Loaded)) => return Ok(handle),
            Ok(Some(PlayerEvent::Error { cause })) => unreachable_asset(cause),
            Ok(None) => NavigationError::PlayerInitFailed("player went away before loading".into()),
            Err(_) => NavigationError::PlayerInitFailed(format!("no response within {:?}", timeout)),
        };
        handle.close();
        Err(error)
    }

    fn complete(
        &self,
        ticket: u64,
        request: &NavigationRequest,
        entry: CatalogEntry,
        mut handle: Box<dyn PlayerHandle>,
        fullscreen: bool,
    ) -> NavigationOutcome {
        let mut state = lock(&self.state);
        if !self.is_current(ticket) {
            drop(state);
            tracing::debug!("Navigation #{} superseded, discarding {}", ticket, entry.id);
            handle.close();
            return NavigationOutcome::Superseded;
        }

        let mut presented_fullscreen = false;
        if fullscreen {
            match handle.enter_fullscreen() {
                Ok(()) => presented_fullscreen = true,
                Err(e) => tracing::warn!("Fullscreen request failed: {}", e),
            }
        }

        if let Some(mut previous) = lock(&self.player).replace(handle) {
            previous.close();
        }

        state.current_entry_id = Some(entry.id.clone());
        state.phase = NavigationPhase::Ready;
        state.last_error = None;
        state.fullscreen = presented_fullscreen;

        let url = self.canonical(&entry, &state.language);
        self.history.update(request.trigger.history_mode(), &url);
        self.remember(&entry.id);
        lock(&self.last_failed).take();

        tracing::info!("Playing {} ({})", entry.display_name, entry.id);
        NavigationOutcome::Ready {
            entry_id: entry.id,
            url,
        }
    }

    fn go_home(&self, ticket: u64) -> NavigationOutcome {
        let mut state = lock(&self.state);
        if !self.is_current(ticket) {
            return NavigationOutcome::Superseded;
        }

        if let Some(mut player) = lock(&self.player).take() {
            player.close();
        }
        state.current_entry_id = None;
        state.phase = NavigationPhase::Idle;
        state.last_error = None;
        state.fullscreen = false;

        tracing::debug!("Navigation #{} went home", ticket);
        NavigationOutcome::Home
    }

    fn fail(
        &self,
        ticket: u64,
        request: Option<&NavigationRequest>,
        error: NavigationError,
    ) -> NavigationOutcome {
        let mut state = lock(&self.state);
        if !self.is_current(ticket) {
            tracing::debug!("Navigation #{} superseded, dropping error: {}", ticket, error);
            return NavigationOutcome::Superseded;
        }

        let error = match error {
            NavigationError::AssetUnreachable { .. } if state.offline => NavigationError::Offline,
            other => other,
        };

        tracing::warn!("Navigation failed: {}", error);
        state.phase = NavigationPhase::Error;
        state.last_error = Some(error.kind());
        *lock(&self.last_failed) = request.cloned();

        self.notifier.notify(Notification::from(&error));
        NavigationOutcome::Failed(error)
    }

    fn canonical(&self, entry: &CatalogEntry, language: &str) -> Url {
        let language = (!language.eq_ignore_ascii_case(&self.settings.default_language))
            .then_some(language);
        canonical_url(&self.settings.site_origin, entry, language)
    }

    fn remember(&self, id: &str) {
        let mut recent = lock(&self.recent);
        recent.touch(id);
        if let Some(store) = &self.store
            && let Err(e) = recent.save(store.as_ref())
        {
            tracing::warn!("Could not save recent list: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::RecordingHistory;
    use crate::notify::LogNotifier;
    use flashdeck_network::Redirector;
    use flashdeck_player::mock::MockPlayer;

    fn controller(settings: ControllerSettings) -> NavigationController {
        let catalog = Catalog::from_entries(vec![CatalogEntry::new(
            "faq",
            "FAQ",
            "https://jogos.ipv7.pt/faq.swf",
        )]);
        NavigationController::new(
            catalog,
            Arc::new(MockPlayer::new()),
            Arc::new(RecordingHistory::new()),
            Arc::new(LogNotifier),
            settings,
        )
    }

    fn settings() -> ControllerSettings {
        ControllerSettings::from_config(&FlashdeckConfig::default()).unwrap()
    }

    #[test]
    fn test_settings_from_config() {
        let settings = settings();
        assert_eq!(settings.container, "player");
        assert_eq!(settings.load_timeout, Duration::from_secs(10));
        assert_eq!(settings.site_origin.as_str(), "https://jogos.ipv7.pt/");
        assert!(settings.supports_language("EN"));
        assert!(!settings.supports_language("de"));
    }

    #[test]
    fn test_invalid_origin_rejected() {
        let mut config = FlashdeckConfig::default();
        config.navigation.site_origin = "not a url".into();
        assert!(matches!(
            ControllerSettings::from_config(&config),
            Err(FrontendError::InvalidUrl { field: "site_origin", .. })
        ));
    }

    #[test]
    fn test_asset_address_is_redirected() {
        let controller = controller(settings()).with_interceptor(Arc::new(Redirector::default()));
        assert_eq!(
            controller.asset_address("https://jogos.ipv7.pt/faq.swf"),
            "https://cdn.xperia.pt/laserquest/faq.swf"
        );
    }

    #[test]
    fn test_relative_asset_joined_onto_base() {
        let mut settings = settings();
        settings.asset_base_url = Some(Url::parse("https://cdn.xperia.pt/laserquest/").unwrap());
        let controller = controller(settings);

        assert_eq!(
            controller.asset_address("games/a.swf"),
            "https://cdn.xperia.pt/laserquest/games/a.swf"
        );
        assert_eq!(
            controller.asset_address("https://other.example/b.swf"),
            "https://other.example/b.swf"
        );
    }

    #[test]
    fn test_relative_asset_without_base_passes_through() {
        let controller = controller(settings());
        assert_eq!(controller.asset_address("a.swf"), "a.swf");
    }

    #[test]
    fn test_canonical_omits_default_language() {
        let controller = controller(settings());
        let entry = CatalogEntry::new("faq", "FAQ", "faq.swf");
        assert_eq!(
            controller.canonical(&entry, "pt").as_str(),
            "https://jogos.ipv7.pt/faq?id=faq"
        );
        assert_eq!(
            controller.canonical(&entry, "en").as_str(),
            "https://jogos.ipv7.pt/faq?id=faq&lang=en"
        );
    }

    #[test]
    fn test_trigger_history_modes() {
        assert_eq!(Trigger::PageLoad.history_mode(), HistoryMode::Replace);
        assert_eq!(Trigger::HistoryPop.history_mode(), HistoryMode::Replace);
        assert_eq!(Trigger::UserSelection.history_mode(), HistoryMode::Push);
    }
}
