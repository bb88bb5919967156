//! URL key to catalog entry resolution

use crate::catalog::Catalog;
use crate::entry::CatalogEntry;
use crate::slug::normalize;

/// Which rule matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Case-insensitive id
    Id,
    /// Normalized display name
    Name,
}

/// A successful lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution<'a> {
    pub entry: &'a CatalogEntry,
    pub matched_by: MatchKind,
}

/// Map a raw URL segment or query value to a catalog entry.
///
/// Exact id match (ignoring case) first, then normalized display name in
/// declaration order. Ties on name go to the earliest entry.
pub fn resolve<'a>(raw_key: &str, catalog: &'a Catalog) -> Option<Resolution<'a>> {
    if let Some(entry) = catalog.get(raw_key) {
        tracing::debug!("Resolved '{}' by id to {}", raw_key, entry.id);
        return Some(Resolution {
            entry,
            matched_by: MatchKind::Id,
        });
    }

    let key = normalize(raw_key);
    if key.is_empty() {
        return None;
    }

    let found = catalog
        .entries_with_slugs()
        .find(|(_, slug)| *slug == key)
        .map(|(entry, _)| Resolution {
            entry,
            matched_by: MatchKind::Name,
        });

    match &found {
        Some(resolution) => {
            tracing::debug!("Resolved '{}' by name to {}", raw_key, resolution.entry.id)
        }
        None => tracing::debug!("No catalog entry for '{}'", raw_key),
    }

    found
}
