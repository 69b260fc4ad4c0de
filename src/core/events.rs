//! User-visible notifications
//!
//! Every engine outcome that the user should hear about (a toy was removed,
//! a reload failed, ...) is published on a [`NotificationBus`]. The bus uses
//! `tokio::sync::broadcast` so any number of UI surfaces (toast area, status
//! bar, log panel) can listen independently.
//!
//! ```text
//! CatalogEngine ──▶ NotificationBus::publish() ──▶ broadcast channel ──▶ toast widget
//!                                                                    ──▶ status bar
//! ```

use crate::core::error::CatalogError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A message for the user, with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub level: NotificationLevel,
    pub message: String,
    /// Stable error code for error notifications
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level: NotificationLevel::Success,
            message: message.into(),
            error_code: None,
            timestamp: Utc::now(),
        }
    }

    /// `message` is the user-facing summary ("Cannot remove toy"); the error
    /// only contributes its code.
    pub fn error(message: impl Into<String>, err: &CatalogError) -> Self {
        Self {
            id: Uuid::new_v4(),
            level: NotificationLevel::Error,
            message: message.into(),
            error_code: Some(err.error_code().to_string()),
            timestamp: Utc::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

/// Broadcast-based notification bus
///
/// Cheap to clone (Arc internally) and shareable across tasks.
#[derive(Debug, Clone)]
pub struct NotificationBus {
    sender: broadcast::Sender<Notification>,
}

impl NotificationBus {
    /// `capacity` is how many notifications a slow listener may fall behind
    /// before it starts receiving `Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all listeners. Never fails; with no listeners the
    /// notification is dropped. Returns the number of receivers.
    pub fn publish(&self, notification: Notification) -> usize {
        self.sender.send(notification).unwrap_or(0)
    }

    /// Receive every notification published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(256)
    }
}
