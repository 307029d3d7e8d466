//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod clock;
pub mod config;
pub mod library;
pub mod notifier;
pub mod permissions;
pub mod player;
pub mod recorder;

// Re-export common types
pub use clock::{Clock, SystemClock};
pub use config::{ConfigStore, PreferenceStore};
pub use library::{LibraryError, RecordingLibrary};
pub use notifier::{NotificationError, NotificationIcon, Notifier};
pub use permissions::{PermissionError, PermissionProvider};
pub use player::{AudioPlayer, PlaybackControl, PlaybackEnd, PlaybackError, PlaybackHandle};
pub use recorder::{PlatformRecorder, RecorderHandle, RecordingError};
