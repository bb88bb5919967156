//! User-facing failure notifications

use crate::error::{ErrorKind, NavigationError};
use tokio::sync::mpsc;

/// What the notification offers the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestedAction {
    Retry,
    ChooseAnother,
    CheckConnection,
    Reload,
}

impl SuggestedAction {
    pub fn for_kind(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::CatalogFetchFailed | ErrorKind::CatalogMalformed => SuggestedAction::Reload,
            ErrorKind::EntryNotFound => SuggestedAction::ChooseAnother,
            ErrorKind::AssetUnreachable | ErrorKind::PlayerInitFailed => SuggestedAction::Retry,
            ErrorKind::Offline => SuggestedAction::CheckConnection,
        }
    }
}

/// Dismissible message shown when a navigation fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: ErrorKind,
    pub message: String,
    pub action: SuggestedAction,
}

impl From<&NavigationError> for Notification {
    fn from(err: &NavigationError) -> Self {
        let kind = err.kind();
        Self {
            kind,
            message: err.to_string(),
            action: SuggestedAction::for_kind(kind),
        }
    }
}

/// Surface notifications are delivered to
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Forwards notifications to a channel the UI drains
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            tracing::debug!("Notification dropped, nobody is listening");
        }
    }
}

/// Writes notifications to the log only
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        tracing::warn!(
            "[{}] {} (suggest {:?})",
            notification.kind,
            notification.message,
            notification.action
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions() {
        let cases = [
            (NavigationError::EntryNotFound("x".into()), SuggestedAction::ChooseAnother),
            (NavigationError::Offline, SuggestedAction::CheckConnection),
            (NavigationError::PlayerInitFailed("timeout".into()), SuggestedAction::Retry),
            (NavigationError::CatalogMalformed("empty".into()), SuggestedAction::Reload),
        ];

        for (err, action) in cases {
            let notification = Notification::from(&err);
            assert_eq!(notification.action, action);
            assert_eq!(notification.kind, err.kind());
            assert_eq!(notification.message, err.to_string());
        }
    }

    #[tokio::test]
    async fn test_channel_notifier() {
        let (notifier, mut rx) = ChannelNotifier::new();
        notifier.notify(Notification::from(&NavigationError::Offline));
        let received = rx.recv().await.unwrap();
        assert_eq!(received.kind, ErrorKind::Offline);

        drop(rx);
        notifier.notify(Notification::from(&NavigationError::Offline));
    }
}
