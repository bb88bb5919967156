//! In-memory catalog store

use crate::document::parse_document;
use crate::entry::CatalogEntry;
use crate::slug::normalize;
use crate::CatalogError;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Serialize)]
struct CacheDocument<'a> {
    entries: &'a [CatalogEntry],
}

/// Immutable list of playable titles with a case-insensitive id index
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    /// Normalized display names, parallel to `entries`
    slugs: Vec<String>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build the lookup table.
    ///
    /// A later entry with an already-seen id replaces the earlier one but
    /// keeps its position.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut catalog = Self::default();

        for entry in entries {
            let key = entry.lookup_key();
            let slug = normalize(&entry.display_name);
            match catalog.index.get(&key) {
                Some(&position) => {
                    tracing::debug!("Duplicate catalog id '{}', keeping the later entry", entry.id);
                    catalog.entries[position] = entry;
                    catalog.slugs[position] = slug;
                }
                None => {
                    catalog.index.insert(key, catalog.entries.len());
                    catalog.entries.push(entry);
                    catalog.slugs.push(slug);
                }
            }
        }

        catalog
    }

    /// Parse a catalog document
    pub fn parse(json: &str) -> Result<Self, CatalogError> {
        let catalog = Self::from_entries(parse_document(json)?);
        tracing::info!("Catalog loaded with {} entries", catalog.len());
        Ok(catalog)
    }

    /// Serialize for the local cache
    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string(&CacheDocument {
            entries: &self.entries,
        })?)
    }

    /// Look up by id, ignoring case
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.index
            .get(&id.to_lowercase())
            .map(|&position| &self.entries[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(&id.to_lowercase())
    }

    /// Entries in declaration order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Entries paired with their normalized display names
    pub(crate) fn entries_with_slugs(&self) -> impl Iterator<Item = (&CatalogEntry, &str)> {
        self.entries
            .iter()
            .zip(self.slugs.iter().map(String::as_str))
    }

    /// Entries ordered for the selector dropdown
    pub fn selector_items(&self) -> Vec<&CatalogEntry> {
        let mut items: Vec<&CatalogEntry> = self.entries.iter().collect();
        items.sort_by_cached_key(|entry| entry.display_name.to_lowercase());
        items
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
