//! Catalog document parsing
//!
//! The document is either a bare array of entries or an object holding one
//! or more arrays of entries. Every array is read, in document order.

use crate::CatalogError;
use crate::entry::CatalogEntry;
use crate::slug::normalize;
use serde_json::{Map, Value};

const ID_FIELDS: &[&str] = &["id", "slug"];
const NAME_FIELDS: &[&str] = &["displayName", "name", "title"];
const ASSET_FIELDS: &[&str] = &["assetPath", "path", "url", "src", "swf"];
const DESCRIPTION_FIELDS: &[&str] = &["description", "desc"];
const FLASH_VARS_FIELDS: &[&str] = &["flashVars", "flashvars"];
const PLAYER_OPTIONS_FIELDS: &[&str] = &["playerOptions", "options"];

/// Parse a catalog document into entries, in declaration order.
///
/// Duplicates are kept; deduplication happens when the lookup table is built.
pub fn parse_document(json: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
    let document: Value = serde_json::from_str(json)
        .map_err(|e| CatalogError::Malformed(format!("invalid JSON: {}", e)))?;

    let mut entries = Vec::new();

    match &document {
        Value::Array(items) => collect_entries(items, &mut entries),
        Value::Object(map) => {
            for (key, value) in map {
                if let Value::Array(items) = value {
                    tracing::trace!("Reading catalog array '{}' ({} items)", key, items.len());
                    collect_entries(items, &mut entries);
                }
            }
        }
        _ => {
            return Err(CatalogError::Malformed(
                "document is neither an object nor an array".into(),
            ));
        }
    }

    if entries.is_empty() {
        return Err(CatalogError::Malformed("no entries found".into()));
    }

    Ok(entries)
}

fn collect_entries(items: &[Value], entries: &mut Vec<CatalogEntry>) {
    for item in items {
        if let Value::Object(fields) = item
            && let Some(entry) = entry_from_fields(fields)
        {
            entries.push(entry);
        }
    }
}

fn entry_from_fields(fields: &Map<String, Value>) -> Option<CatalogEntry> {
    let id = first_string(fields, ID_FIELDS);
    let name = first_string(fields, NAME_FIELDS);

    let Some(asset_path) = first_string(fields, ASSET_FIELDS) else {
        tracing::warn!(
            "Skipping catalog entry without an asset path: {}",
            id.as_deref().or(name.as_deref()).unwrap_or("<unnamed>")
        );
        return None;
    };

    let (id, display_name) = match (id, name) {
        (Some(id), Some(name)) => (id, name),
        (Some(id), None) => (id.clone(), id),
        (None, Some(name)) => {
            let id = normalize(&name);
            if id.is_empty() {
                tracing::warn!("Skipping catalog entry with unusable name '{}'", name);
                return None;
            }
            (id, name)
        }
        (None, None) => {
            tracing::warn!("Skipping catalog entry without id or name ({})", asset_path);
            return None;
        }
    };

    Some(CatalogEntry {
        id,
        display_name,
        asset_path,
        description: first_string(fields, DESCRIPTION_FIELDS),
        flash_vars: first_value(fields, FLASH_VARS_FIELDS),
        player_options: first_value(fields, PLAYER_OPTIONS_FIELDS),
    })
}

/// First non-blank string (or number) among the aliases
fn first_string(fields: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|alias| match fields.get(*alias)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn first_value(fields: &Map<String, Value>, aliases: &[&str]) -> Option<Value> {
    aliases
        .iter()
        .find_map(|alias| fields.get(*alias).filter(|v| !v.is_null()).cloned())
}
