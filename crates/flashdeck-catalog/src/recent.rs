//! Recently used entries

use crate::catalog::Catalog;
use crate::CatalogError;
use flashdeck_storage::{KeyValueStore, RECENT_KEY};
use std::collections::VecDeque;

/// Default bound on the list
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Bounded most-recent-first list of entry ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentList {
    ids: VecDeque<String>,
    limit: usize,
}

impl Default for RecentList {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_LIMIT)
    }
}

impl RecentList {
    pub fn new(limit: usize) -> Self {
        Self {
            ids: VecDeque::with_capacity(limit),
            limit: limit.max(1),
        }
    }

    /// Move `id` to the front, dropping the oldest past the limit
    pub fn touch(&mut self, id: &str) {
        self.ids.retain(|existing| !existing.eq_ignore_ascii_case(id));
        self.ids.push_front(id.to_string());
        self.ids.truncate(self.limit);
    }

    /// Ids, most recent first
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing.eq_ignore_ascii_case(id))
    }

    /// Drop ids the catalog no longer has
    pub fn retain_known(&mut self, catalog: &Catalog) {
        self.ids.retain(|id| catalog.contains(id));
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Read the persisted list; an unreadable value gives an empty list
    pub fn load(store: &dyn KeyValueStore, limit: usize) -> Result<Self, CatalogError> {
        let mut list = Self::new(limit);

        let Some(json) = store.get(RECENT_KEY)? else {
            return Ok(list);
        };

        match serde_json::from_str::<Vec<String>>(&json) {
            Ok(ids) => {
                // Stored most recent first; replay oldest first
                for id in ids.iter().take(list.limit).rev() {
                    list.touch(id);
                }
            }
            Err(e) => tracing::warn!("Ignoring unreadable recent list: {}", e),
        }

        Ok(list)
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), CatalogError> {
        store.set(RECENT_KEY, &serde_json::to_string(&self.ids)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::CatalogEntry;
    use flashdeck_storage::MemoryStore;

    #[test]
    fn test_touch_moves_existing_to_front() {
        let mut recent = RecentList::default();
        recent.touch("a");
        recent.touch("b");
        recent.touch("c");
        recent.touch("A");

        assert_eq!(recent.to_vec(), vec!["A", "c", "b"]);
    }

    #[test]
    fn test_bounded_oldest_dropped_first() {
        let mut recent = RecentList::default();
        for i in 0..15 {
            recent.touch(&format!("game-{}", i));
        }

        assert_eq!(recent.len(), 10);
        assert_eq!(recent.ids().next(), Some("game-14"));
        assert!(!recent.contains("game-4"));
        assert!(recent.contains("game-5"));
    }

    #[test]
    fn test_persist_and_reload() {
        let store = MemoryStore::new();
        let mut recent = RecentList::new(3);
        recent.touch("x");
        recent.touch("y");
        recent.save(&store).unwrap();

        let loaded = RecentList::load(&store, 3).unwrap();
        assert_eq!(loaded, recent);
    }

    #[test]
    fn test_load_truncates_and_tolerates_garbage() {
        let store = MemoryStore::new();
        store.set(RECENT_KEY, r#"["a","b","c","d"]"#).unwrap();
        let loaded = RecentList::load(&store, 2).unwrap();
        assert_eq!(loaded.to_vec(), vec!["a", "b"]);

        store.set(RECENT_KEY, "nope").unwrap();
        assert!(RecentList::load(&store, 2).unwrap().is_empty());
    }

    #[test]
    fn test_retain_known() {
        let catalog = Catalog::from_entries(vec![CatalogEntry::new("Kept", "Kept", "k.swf")]);
        let mut recent = RecentList::default();
        recent.touch("gone");
        recent.touch("kept");

        recent.retain_known(&catalog);
        assert_eq!(recent.to_vec(), vec!["kept"]);
    }
}
