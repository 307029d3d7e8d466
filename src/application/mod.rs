//! Application layer - Use cases and port interfaces
//!
//! Contains the controllers that own the recorder and player, the
//! call-state listener, the permission gate and the typed command
//! interface, plus the trait definitions for external systems.

pub mod call_listener;
pub mod error;
pub mod permission_gate;
pub mod playback;
pub mod ports;
pub mod recording;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export use cases
pub use call_listener::{CallAction, CallStateListener};
pub use error::AppError;
pub use permission_gate::{PermissionGate, PermissionReport};
pub use playback::{PlaybackController, PlaybackEvent, PlaybackToggle};
pub use recording::{RecordingConfig, RecordingController};
pub use service::{Command, CommandOutcome, RecorderService, StatusReport};
