//! Flash player adapter for Flashdeck
//!
//! The emulator itself is an external collaborator. This crate defines the
//! contract the navigation layer drives: create a player inside a container,
//! load an asset, then wait for a `Loaded` or `Error` event.

pub mod mock;
mod options;

pub use options::LoadOptions;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Player initialization failed: {0}")]
    InitFailed(String),

    #[error("Load failed: {0}")]
    LoadFailed(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Player closed")]
    Closed,
}

/// Page element the player mounts into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerContainer {
    pub element_id: String,
}

impl PlayerContainer {
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
        }
    }
}

/// Outcome reported by a player after `load`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    Loaded,
    Error { cause: String },
}

/// Factory for player instances
pub trait PlayerAdapter: Send + Sync {
    /// Adapter identifier for logging
    fn name(&self) -> &str;

    /// Instantiate a playback surface inside the container
    fn create_player(&self, container: &PlayerContainer) -> Result<Box<dyn PlayerHandle>, PlayerError>;
}

/// One live player instance
#[async_trait]
pub trait PlayerHandle: Send {
    /// Start loading an asset; completion arrives through [`next_event`]
    ///
    /// [`next_event`]: PlayerHandle::next_event
    fn load(&mut self, asset_url: &str, options: &LoadOptions) -> Result<(), PlayerError>;

    /// Next event, or `None` once the player is gone
    async fn next_event(&mut self) -> Option<PlayerEvent>;

    fn enter_fullscreen(&mut self) -> Result<(), PlayerError>;

    /// Tear the player down
    fn close(&mut self) {}
}

/// Sending half of a player event channel
pub type PlayerEventSender = mpsc::UnboundedSender<PlayerEvent>;

/// Receiving half of a player event channel
pub type PlayerEventReceiver = mpsc::UnboundedReceiver<PlayerEvent>;

/// Channel that host callbacks push player events into
pub fn event_channel() -> (PlayerEventSender, PlayerEventReceiver) {
    mpsc::unbounded_channel()
}
