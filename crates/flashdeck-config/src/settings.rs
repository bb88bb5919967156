//! Configuration sections
//!
//! Every field carries a serde default so a partial file is always valid.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where the catalog lives and how hard to try fetching it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Catalog JSON document URL
    #[serde(default = "default_catalog_url")]
    pub url: String,
    /// Fetch attempts before giving up
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base delay between attempts, doubled per retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// Per-request timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_catalog_url() -> String {
    "https://jogos.ipv7.pt/games.json".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            url: default_catalog_url(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl CatalogSettings {
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Local catalog cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Horizon after which a cached catalog is discarded
    #[serde(default = "default_expiry_hours")]
    pub expiry_hours: u64,
    /// Serve a fresh cache instead of fetching while online
    #[serde(default = "default_true")]
    pub prefer_cache: bool,
    /// SQLite database holding the cache and recent list
    #[serde(default = "default_store_path")]
    pub store_path: String,
}

fn default_true() -> bool {
    true
}

fn default_expiry_hours() -> u64 {
    24
}

fn default_store_path() -> String {
    "/var/lib/flashdeck/store.db".to_string()
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            expiry_hours: default_expiry_hours(),
            prefer_cache: true,
            store_path: default_store_path(),
        }
    }
}

impl CacheSettings {
    pub fn expiry(&self) -> Duration {
        Duration::from_secs(self.expiry_hours.saturating_mul(60 * 60))
    }
}

/// One literal (from, to) address substring mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectRule {
    pub from: String,
    pub to: String,
}

impl RedirectRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Legacy host redirect table, evaluated in declared order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectSettings {
    #[serde(default = "default_rules")]
    pub rules: Vec<RedirectRule>,
}

fn default_rules() -> Vec<RedirectRule> {
    vec![
        RedirectRule::new("https://jogos.ipv7.pt/", "https://cdn.xperia.pt/laserquest/"),
        RedirectRule::new("http://jogos.ipv7.pt/", "https://cdn.xperia.pt/laserquest/"),
        RedirectRule::new("//jogos.ipv7.pt/", "//cdn.xperia.pt/laserquest/"),
    ]
}

impl Default for RedirectSettings {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

/// Player bootstrap settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSettings {
    /// Element id of the container the player mounts into
    #[serde(default = "default_container")]
    pub container: String,
    /// Bounded wait for the player to report a load
    #[serde(default = "default_load_timeout_secs")]
    pub load_timeout_secs: u64,
    /// Probe the asset with a HEAD request before loading
    #[serde(default)]
    pub verify_assets: bool,
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    /// Base URL relative asset paths are joined onto
    #[serde(default)]
    pub asset_base_url: Option<String>,
}

fn default_container() -> String {
    "player".to_string()
}

fn default_load_timeout_secs() -> u64 {
    10
}

fn default_probe_timeout_secs() -> u64 {
    5
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            container: default_container(),
            load_timeout_secs: default_load_timeout_secs(),
            verify_assets: false,
            probe_timeout_secs: default_probe_timeout_secs(),
            asset_base_url: None,
        }
    }
}

impl PlayerSettings {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.load_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

/// Navigation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationSettings {
    /// Origin used for canonical addresses before any page URL is seen
    #[serde(default = "default_site_origin")]
    pub site_origin: String,
    #[serde(default = "default_language")]
    pub default_language: String,
    #[serde(default = "default_supported_languages")]
    pub supported_languages: Vec<String>,
    /// Length of the recently used list
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

fn default_site_origin() -> String {
    "https://jogos.ipv7.pt/".to_string()
}

fn default_language() -> String {
    "pt".to_string()
}

fn default_supported_languages() -> Vec<String> {
    vec!["pt".to_string(), "en".to_string()]
}

fn default_recent_limit() -> usize {
    10
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            site_origin: default_site_origin(),
            default_language: default_language(),
            supported_languages: default_supported_languages(),
            recent_limit: default_recent_limit(),
        }
    }
}

impl NavigationSettings {
    pub fn supports_language(&self, code: &str) -> bool {
        self.supported_languages
            .iter()
            .any(|lang| lang.eq_ignore_ascii_case(code))
    }
}

/// Log output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub ansi: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            ansi: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_order() {
        let rules = RedirectSettings::default().rules;
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].from, "https://jogos.ipv7.pt/");
        assert_eq!(rules[0].to, "https://cdn.xperia.pt/laserquest/");
    }

    #[test]
    fn test_huge_expiry_saturates() {
        let cache = CacheSettings {
            expiry_hours: u64::MAX,
            ..CacheSettings::default()
        };
        assert_eq!(cache.expiry(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_durations() {
        assert_eq!(CacheSettings::default().expiry(), Duration::from_secs(86_400));
        assert_eq!(PlayerSettings::default().load_timeout(), Duration::from_secs(10));
        assert_eq!(
            CatalogSettings::default().retry_backoff(),
            Duration::from_millis(1000)
        );
    }

    #[test]
    fn test_supports_language() {
        let nav = NavigationSettings::default();
        assert!(nav.supports_language("pt"));
        assert!(nav.supports_language("EN"));
        assert!(!nav.supports_language("fr"));
    }

    #[test]
    fn test_partial_section_uses_defaults() {
        let player: PlayerSettings = toml::from_str("verify_assets = true").unwrap();
        assert!(player.verify_assets);
        assert_eq!(player.container, "player");
        assert_eq!(player.asset_base_url, None);
    }
}
