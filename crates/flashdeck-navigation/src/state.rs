//! Observable navigation state

use crate::error::ErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationPhase {
    /// Home page, nothing selected
    #[default]
    Idle,
    Resolving,
    Loading,
    Ready,
    Error,
}

/// Snapshot of what the page is showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    /// Id of the entry on screen
    pub current_entry_id: Option<String>,
    pub language: String,
    pub phase: NavigationPhase,
    pub last_error: Option<ErrorKind>,
    /// Degraded mode: no connectivity, catalog served from cache
    pub offline: bool,
    /// Current entry was presented fullscreen
    pub fullscreen: bool,
}

impl NavigationState {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            current_entry_id: None,
            language: language.into(),
            phase: NavigationPhase::Idle,
            last_error: None,
            offline: false,
            fullscreen: false,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            NavigationPhase::Resolving | NavigationPhase::Loading
        )
    }
}
