//! Navigation for Flashdeck
//!
//! Turns page addresses and selector choices into a playing game. The
//! [`NavigationController`] resolves the address against the catalog, asks
//! the player adapter to load the asset and updates the address bar. The
//! [`Frontend`] wires it to the configuration, the catalog service and the
//! connectivity signal.
//!
//! Browser surfaces (history, notifications, the player itself) are traits
//! the host implements.

mod controller;
mod error;
mod history;
mod location;
mod notify;
mod session;
mod state;

pub use controller::{
    ControllerSettings, NavigationController, NavigationOutcome, NavigationRequest, Target, Trigger,
};
pub use error::{ErrorKind, FrontendError, NavigationError};
pub use history::{HistoryMode, HistorySink, RecordingHistory};
pub use location::{PageLocation, canonical_url};
pub use notify::{ChannelNotifier, LogNotifier, Notification, Notifier, SuggestedAction};
pub use session::{Frontend, FrontendBuilder, open_store};
pub use state::{NavigationPhase, NavigationState};
