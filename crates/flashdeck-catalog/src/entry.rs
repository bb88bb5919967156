//! Catalog entry

use crate::slug::normalize;
use serde::{Deserialize, Serialize};

/// One playable title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Unique within the catalog, compared case-insensitively
    pub id: String,
    pub display_name: String,
    /// Location of the .swf asset
    pub asset_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Passed to the player untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flash_vars: Option<serde_json::Value>,
    /// Passed to the player untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_options: Option<serde_json::Value>,
}

impl CatalogEntry {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        asset_path: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            asset_path: asset_path.into(),
            description: None,
            flash_vars: None,
            player_options: None,
        }
    }

    /// Key used in the lookup table
    pub fn lookup_key(&self) -> String {
        self.id.to_lowercase()
    }

    /// Human-readable URL segment for this entry
    pub fn slug(&self) -> String {
        let slug = normalize(&self.display_name);
        if !slug.is_empty() {
            return slug;
        }
        let slug = normalize(&self.id);
        if !slug.is_empty() {
            return slug;
        }
        self.id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_prefers_display_name() {
        let entry = CatalogEntry::new("lq1", "Laser Quest", "lq.swf");
        assert_eq!(entry.slug(), "laser-quest");
        assert_eq!(entry.lookup_key(), "lq1");
    }

    #[test]
    fn test_slug_falls_back_to_id() {
        let entry = CatalogEntry::new("Game_7", "???", "g.swf");
        assert_eq!(entry.slug(), "game-7");

        let entry = CatalogEntry::new("???", "", "g.swf");
        assert_eq!(entry.slug(), "???");
    }

    #[test]
    fn test_serialized_field_names() {
        let entry = CatalogEntry::new("a", "A", "a.swf");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["displayName"], "A");
        assert_eq!(json["assetPath"], "a.swf");
        assert!(json.get("flashVars").is_none());
    }
}
