//! Scripted player for testing without an emulator
//!
//! Each asset can be scripted to load after a delay, fail with a cause, or
//! never answer. Every load is recorded.
//!
//! # Usage
//!
//! ```no_run
//! use flashdeck_player::mock::{MockPlayer, Script};
//! use std::time::Duration;
//!
//! let player = MockPlayer::new();
//! player.script("slow.swf", Script::Succeed { after: Duration::from_secs(2) });
//! player.script("broken.swf", Script::Fail { after: Duration::ZERO, cause: "404".into() });
//! ```

use crate::{
    LoadOptions, PlayerAdapter, PlayerContainer, PlayerError, PlayerEvent, PlayerEventReceiver,
    PlayerEventSender, PlayerHandle, event_channel,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// How the player answers a load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Script {
    Succeed { after: Duration },
    Fail { after: Duration, cause: String },
    /// Never report anything
    Silent,
}

/// A recorded `load` call
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRecord {
    pub container: String,
    pub asset_url: String,
    pub options: LoadOptions,
}

#[derive(Debug, Default)]
struct Shared {
    scripts: RwLock<HashMap<String, Script>>,
    loads: RwLock<Vec<LoadRecord>>,
    fail_init: AtomicBool,
    fullscreen_requests: AtomicUsize,
    closed: AtomicUsize,
}

/// Mock adapter; clones share scripts and records
#[derive(Debug, Clone, Default)]
pub struct MockPlayer {
    shared: Arc<Shared>,
}

impl MockPlayer {
    /// Every asset loads immediately unless scripted otherwise
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, asset_url: &str, script: Script) {
        if let Ok(mut scripts) = self.shared.scripts.write() {
            scripts.insert(asset_url.to_string(), script);
        }
    }

    /// Make `create_player` fail
    pub fn fail_init(&self, fail: bool) {
        self.shared.fail_init.store(fail, Ordering::SeqCst);
    }

    pub fn loads(&self) -> Vec<LoadRecord> {
        self.shared
            .loads
            .read()
            .map(|loads| loads.clone())
            .unwrap_or_default()
    }

    pub fn loaded_assets(&self) -> Vec<String> {
        self.loads().into_iter().map(|l| l.asset_url).collect()
    }

    pub fn fullscreen_requests(&self) -> usize {
        self.shared.fullscreen_requests.load(Ordering::SeqCst)
    }

    pub fn closed_players(&self) -> usize {
        self.shared.closed.load(Ordering::SeqCst)
    }

    fn script_for(&self, asset_url: &str) -> Script {
        self.shared
            .scripts
            .read()
            .ok()
            .and_then(|scripts| scripts.get(asset_url).cloned())
            .unwrap_or(Script::Succeed {
                after: Duration::ZERO,
            })
    }
}

impl PlayerAdapter for MockPlayer {
    fn name(&self) -> &str {
        "mock"
    }

    fn create_player(&self, container: &PlayerContainer) -> Result<Box<dyn PlayerHandle>, PlayerError> {
        if self.shared.fail_init.load(Ordering::SeqCst) {
            return Err(PlayerError::InitFailed("mock player refused to start".into()));
        }

        let (tx, rx) = event_channel();
        Ok(Box::new(MockHandle {
            player: self.clone(),
            container: container.element_id.clone(),
            tx,
            rx,
            closed: false,
        }))
    }
}

struct MockHandle {
    player: MockPlayer,
    container: String,
    tx: PlayerEventSender,
    rx: PlayerEventReceiver,
    closed: bool,
}

#[async_trait]
impl PlayerHandle for MockHandle {
    fn load(&mut self, asset_url: &str, options: &LoadOptions) -> Result<(), PlayerError> {
        if self.closed {
            return Err(PlayerError::Closed);
        }

        if let Ok(mut loads) = self.player.shared.loads.write() {
            loads.push(LoadRecord {
                container: self.container.clone(),
                asset_url: asset_url.to_string(),
                options: options.clone(),
            });
        }

        let (after, event) = match self.player.script_for(asset_url) {
            Script::Succeed { after } => (after, PlayerEvent::Loaded),
            Script::Fail { after, cause } => (after, PlayerEvent::Error { cause }),
            Script::Silent => return Ok(()),
        };

        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            // Receiver is gone once the handle is dropped
            let _ = tx.send(event);
        });

        Ok(())
    }

    async fn next_event(&mut self) -> Option<PlayerEvent> {
        self.rx.recv().await
    }

    fn enter_fullscreen(&mut self) -> Result<(), PlayerError> {
        if self.closed {
            return Err(PlayerError::Closed);
        }
        self.player
            .shared
            .fullscreen_requests
            .fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.player.shared.closed.fetch_add(1, Ordering::SeqCst);
        }
    }
}
