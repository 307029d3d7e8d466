//! Ongoing-recording notification using notify-rust
//!
//! The notification never times out. On Linux the server handle is kept so
//! the same bubble can be closed when the recording ends; elsewhere the
//! handle is dropped and the notification expires on its own.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use notify_rust::{Notification, NotificationHandle, Timeout};
use tracing::debug;

use crate::application::ports::{NotificationError, NotificationIcon, Notifier};

/// Notifier holding at most one ongoing notification
pub struct OngoingNotifier {
    app_name: String,
    ongoing: Arc<Mutex<Option<NotificationHandle>>>,
}

impl OngoingNotifier {
    pub fn new() -> Self {
        Self::with_app_name("Call Recorder")
    }

    pub fn with_app_name(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            ongoing: Arc::new(Mutex::new(None)),
        }
    }

    fn build(&self, title: &str, message: &str, icon: NotificationIcon) -> Notification {
        let mut notification = Notification::new();
        notification
            .appname(&self.app_name)
            .summary(title)
            .body(message)
            .icon(icon.icon_name())
            .timeout(Timeout::Never);
        #[cfg(target_os = "linux")]
        notification
            .hint(notify_rust::Hint::Resident(true))
            .hint(notify_rust::Hint::Category("device".to_string()));
        notification
    }

    fn take_ongoing(&self) -> Result<Option<NotificationHandle>, NotificationError> {
        self.ongoing
            .lock()
            .map(|mut slot| slot.take())
            .map_err(|_| poisoned())
    }
}

impl Default for OngoingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> NotificationError {
    NotificationError::SendFailed("notification state poisoned".to_string())
}

/// Close a shown notification; dbus calls block
fn close(handle: NotificationHandle) {
    #[cfg(target_os = "linux")]
    handle.close();
    #[cfg(not(target_os = "linux"))]
    drop(handle);
}

#[async_trait]
impl Notifier for OngoingNotifier {
    async fn show_ongoing(
        &self,
        title: &str,
        message: &str,
        icon: NotificationIcon,
    ) -> Result<(), NotificationError> {
        let previous = self.take_ongoing()?;
        let notification = self.build(title, message, icon);
        let ongoing = Arc::clone(&self.ongoing);

        tokio::task::spawn_blocking(move || {
            if let Some(handle) = previous {
                close(handle);
            }
            let handle = notification
                .show()
                .map_err(|e| NotificationError::SendFailed(e.to_string()))?;
            *ongoing.lock().map_err(|_| poisoned())? = Some(handle);
            Ok(())
        })
        .await
        .map_err(|e| NotificationError::SendFailed(format!("Task join error: {}", e)))?
    }

    async fn dismiss(&self) -> Result<(), NotificationError> {
        let Some(handle) = self.take_ongoing()? else {
            return Ok(());
        };
        tokio::task::spawn_blocking(move || close(handle))
            .await
            .map_err(|e| NotificationError::SendFailed(format!("Task join error: {}", e)))?;
        debug!("Recording notification dismissed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_carries_session_details() {
        let notifier = OngoingNotifier::with_app_name("Recorder Test");
        let notification =
            notifier.build("Recording in progress", "Standup", NotificationIcon::Call);

        assert_eq!(notification.appname, "Recorder Test");
        assert_eq!(notification.summary, "Recording in progress");
        assert_eq!(notification.body, "Standup");
        assert_eq!(notification.icon, "call-start");
    }

    #[tokio::test]
    async fn dismiss_without_notification_is_noop() {
        let notifier = OngoingNotifier::default();
        notifier.dismiss().await.unwrap();
        assert!(notifier.take_ongoing().unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "Requires a notification daemon"]
    async fn shows_and_dismisses_recording_notification() {
        let notifier = OngoingNotifier::new();
        notifier
            .show_ongoing("Recording in progress", "Standup", NotificationIcon::Recording)
            .await
            .unwrap();
        notifier.dismiss().await.unwrap();
        assert!(notifier.take_ongoing().unwrap().is_none());
    }
}
