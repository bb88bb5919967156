//! Player load options

use serde_json::{Map, Value};

/// Options handed to the player together with the asset address
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    /// Base URL the movie resolves its own relative requests against
    pub base_url: Option<String>,

    /// FlashVars as ordered key/value pairs
    pub flash_vars: Vec<(String, String)>,

    /// Emulator-specific options, passed through
    pub player_options: Map<String, Value>,

    pub autoplay: bool,

    /// Enter fullscreen once loaded
    pub fullscreen: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            flash_vars: Vec::new(),
            player_options: Map::new(),
            autoplay: true,
            fullscreen: false,
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add FlashVars from an object or a `a=1&b=2` string
    pub fn with_flash_vars(mut self, vars: &Value) -> Self {
        match vars {
            Value::Object(map) => {
                for (key, value) in map {
                    let value = match value {
                        Value::String(s) => s.clone(),
                        Value::Null => String::new(),
                        other => other.to_string(),
                    };
                    self.flash_vars.push((key.clone(), value));
                }
            }
            Value::String(query) => {
                for pair in query.split('&').filter(|p| !p.is_empty()) {
                    let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                    self.flash_vars.push((key.to_string(), value.to_string()));
                }
            }
            other => tracing::warn!("Ignoring FlashVars that are not an object or string: {}", other),
        }
        self
    }

    /// Merge emulator options; later keys overwrite earlier ones
    pub fn with_player_options(mut self, options: &Value) -> Self {
        if let Value::Object(map) = options {
            for (key, value) in map {
                self.player_options.insert(key.clone(), value.clone());
            }
        } else {
            tracing::warn!("Ignoring player options that are not an object");
        }
        self
    }

    pub fn fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    pub fn autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    /// FlashVars in query-string form
    pub fn flash_vars_query(&self) -> String {
        self.flash_vars
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_load_options_builder() {
        let options = LoadOptions::new()
            .with_base_url("https://cdn.xperia.pt/laserquest/")
            .with_flash_vars(&json!({"lang": "pt", "level": 3}))
            .with_player_options(&json!({"letterbox": "on"}))
            .fullscreen(true);

        assert_eq!(options.base_url.as_deref(), Some("https://cdn.xperia.pt/laserquest/"));
        assert_eq!(options.flash_vars_query(), "lang=pt&level=3");
        assert_eq!(options.player_options["letterbox"], "on");
        assert!(options.fullscreen);
        assert!(options.autoplay);
    }

    #[test]
    fn test_flash_vars_from_query_string() {
        let options = LoadOptions::new().with_flash_vars(&json!("a=1&&b=&c"));
        assert_eq!(
            options.flash_vars,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), String::new()),
                ("c".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_non_object_options_ignored() {
        let options = LoadOptions::new()
            .with_flash_vars(&json!(42))
            .with_player_options(&json!([1, 2]));
        assert!(options.flash_vars.is_empty());
        assert!(options.player_options.is_empty());
    }
}
