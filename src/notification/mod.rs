use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tokio::sync::broadcast;
use tracing::debug;

/// Severity levels for user-facing notifications, mirroring the
/// toast levels the frontend understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Success,
    Primary,
    Warning,
    Danger,
}

/// Short user-facing payload produced by state-changing operations
/// (record saved, session started, achievement unlocked, ...).
/// The core only guarantees that the signal fires; rendering is up
/// to whatever subscribes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(title: impl Into<String>, description: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
        }
    }
}

/// Broadcast bus for distributing notifications throughout the application
#[derive(Debug, Clone)]
pub struct NotificationBus {
    sender: broadcast::Sender<Notification>,
}

impl NotificationBus {
    /// Creates a new bus with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Emits a notification to all current subscribers
    pub fn emit(&self, notification: Notification) {
        match self.sender.send(notification) {
            Ok(receiver_count) => {
                debug!(receivers = receiver_count, "Notification emitted");
            }
            Err(_) => {
                debug!("Notification emitted with no receivers");
            }
        }
    }

    /// Subscribe to the notification stream
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(64)
    }
}
