//! Address bar updates without reloading

use std::sync::{Mutex, PoisonError};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    /// New history entry
    Push,
    /// Rewrite the current entry in place
    Replace,
}

/// Browser session history
pub trait HistorySink: Send + Sync {
    fn push(&self, url: &Url);

    fn replace(&self, url: &Url);

    fn update(&self, mode: HistoryMode, url: &Url) {
        match mode {
            HistoryMode::Push => self.push(url),
            HistoryMode::Replace => self.replace(url),
        }
    }
}

/// In-memory history stack
#[derive(Debug, Default)]
pub struct RecordingHistory {
    entries: Mutex<Vec<(HistoryMode, String)>>,
}

impl RecordingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every update in order
    pub fn entries(&self) -> Vec<(HistoryMode, String)> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Address currently shown
    pub fn current(&self) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .map(|(_, url)| url.clone())
    }

    /// Number of history entries, counting replacements as none
    pub fn depth(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let pushes = entries
            .iter()
            .filter(|(mode, _)| *mode == HistoryMode::Push)
            .count();
        // The page itself is the first entry
        pushes + 1
    }

    fn record(&self, mode: HistoryMode, url: &Url) {
        tracing::debug!("History {:?} {}", mode, url);
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((mode, url.to_string()));
    }
}

impl HistorySink for RecordingHistory {
    fn push(&self, url: &Url) {
        self.record(HistoryMode::Push, url);
    }

    fn replace(&self, url: &Url) {
        self.record(HistoryMode::Replace, url);
    }
}
