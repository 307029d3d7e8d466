//! Notification infrastructure module
//!
//! The ongoing-recording notification, backed by notify-rust.

mod notify_rust;

pub use self::notify_rust::OngoingNotifier;

use std::sync::Arc;

use crate::application::ports::Notifier;

/// Create the default notifier for the current platform
pub fn create_notifier() -> Arc<dyn Notifier> {
    Arc::new(OngoingNotifier::new())
}
