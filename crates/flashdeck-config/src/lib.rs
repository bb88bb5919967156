//! Configuration management for Flashdeck
//!
//! Handles catalog location, cache horizon, redirect rules, player timeouts
//! and navigation defaults. TOML-based config files, layered user over system.

mod logging;
mod settings;

pub use logging::init_logging;
pub use settings::{
    CacheSettings, CatalogSettings, LoggingSettings, NavigationSettings, PlayerSettings,
    RedirectRule, RedirectSettings,
};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Standard configuration paths
pub const CONFIG_DIR: &str = "/etc/flashdeck";
pub const USER_CONFIG_DIR: &str = "/var/lib/flashdeck";
pub const CONFIG_FILE: &str = "flashdeck.toml";

/// Longest accepted catalog cache lifetime (one year)
pub const MAX_EXPIRY_HOURS: u64 = 24 * 365;

/// Main Flashdeck configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlashdeckConfig {
    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub redirect: RedirectSettings,

    #[serde(default)]
    pub player: PlayerSettings,

    #[serde(default)]
    pub navigation: NavigationSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl FlashdeckConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the system file with the user file merged over it
    pub fn load_layered(system: &Path, user: &Path) -> Result<Self, ConfigError> {
        let mut merged = toml::Value::Table(toml::map::Map::new());
        let mut found = false;

        for path in [system, user] {
            if path.exists() {
                let contents = std::fs::read_to_string(path)?;
                let layer: toml::Value = toml::from_str(&contents)?;
                merge_toml(&mut merged, layer);
                found = true;
            }
        }

        if !found {
            tracing::warn!("No configuration file found, using defaults");
            return Ok(Self::default());
        }

        let config: Self = merged.try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_layered(
            &Path::new(CONFIG_DIR).join(CONFIG_FILE),
            &Path::new(USER_CONFIG_DIR).join(CONFIG_FILE),
        )
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject settings the rest of the system cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.url.trim().is_empty() {
            return Err(ConfigError::Invalid("catalog.url is empty".into()));
        }
        if self.catalog.max_retries == 0 {
            return Err(ConfigError::Invalid(
                "catalog.max_retries must be at least 1".into(),
            ));
        }
        if self.cache.expiry_hours > MAX_EXPIRY_HOURS {
            return Err(ConfigError::Invalid(format!(
                "cache.expiry_hours must be at most {}",
                MAX_EXPIRY_HOURS
            )));
        }
        if self.navigation.recent_limit == 0 {
            return Err(ConfigError::Invalid(
                "navigation.recent_limit must be at least 1".into(),
            ));
        }
        if !self
            .navigation
            .supported_languages
            .iter()
            .any(|lang| lang == &self.navigation.default_language)
        {
            return Err(ConfigError::Invalid(format!(
                "default language '{}' is not in navigation.supported_languages",
                self.navigation.default_language
            )));
        }
        if let Some(rule) = self.redirect.rules.iter().find(|r| r.from.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "redirect rule to '{}' has an empty 'from'",
                rule.to
            )));
        }
        Ok(())
    }
}

/// Helper function to merge TOML values
pub fn merge_toml(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(&key) {
                    merge_toml(base_value, value);
                } else {
                    base_table.insert(key, value);
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
