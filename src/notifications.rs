//! User-facing notifications.
//!
//! Orchestrators report failures of background fetches through a [`Notifier`]. What
//! happens to a notification (log line, toast in a UI, ...) is up to the implementation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::warn;

/// A message meant for the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    /// Whether the message should be surfaced immediately rather than only listed.
    pub display: bool,
    pub date: DateTime<Utc>,
}

impl Notification {
    /// An error notification that is displayed right away.
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            display: true,
            date: Utc::now(),
        }
    }
}

/// Publishes notifications to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        warn!("{}: {}", notification.title, notification.message);
    }
}

/// Forwards notifications to a receiver, e.g. a UI event loop.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if let Err(e) = self.sender.send(notification) {
            warn!(
                "Notification receiver dropped, lost: {}: {}",
                e.0.title, e.0.message
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_notifier_forwards_in_order() {
        let (notifier, mut receiver) = ChannelNotifier::new();
        notifier.notify(Notification::error("first", "a"));
        notifier.notify(Notification::error("second", "b"));

        assert_eq!(receiver.try_recv().unwrap().title, "first");
        let second = receiver.try_recv().unwrap();
        assert_eq!(second.title, "second");
        assert!(second.display);
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn channel_notifier_survives_dropped_receiver() {
        let (notifier, receiver) = ChannelNotifier::new();
        drop(receiver);
        notifier.notify(Notification::error("lost", "nobody listens"));
    }
}
