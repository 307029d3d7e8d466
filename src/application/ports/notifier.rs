//! Notification port interface

use async_trait::async_trait;
use thiserror::Error;

/// Notification errors
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("Failed to show notification: {0}")]
    SendFailed(String),
}

/// Icon shown with the ongoing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationIcon {
    Recording,
    Call,
}

impl NotificationIcon {
    /// Get the freedesktop icon name
    pub const fn icon_name(&self) -> &'static str {
        match self {
            Self::Recording => "audio-input-microphone",
            Self::Call => "call-start",
        }
    }
}

/// Port for the notification shown while a recording runs
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Show a notification that stays up until [`Notifier::dismiss`].
    /// Replaces any ongoing notification.
    async fn show_ongoing(
        &self,
        title: &str,
        message: &str,
        icon: NotificationIcon,
    ) -> Result<(), NotificationError>;

    /// Take the ongoing notification down; no-op when none is showing
    async fn dismiss(&self) -> Result<(), NotificationError>;
}
