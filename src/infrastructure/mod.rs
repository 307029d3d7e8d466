//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like FFmpeg, rodio and the filesystem.

pub mod config;
pub mod library;
pub mod notification;
pub mod permissions;
pub mod playback;
pub mod recording;

// Re-export adapters
pub use config::XdgConfigStore;
pub use library::FsRecordingLibrary;
pub use notification::{create_notifier, OngoingNotifier};
pub use permissions::SystemPermissions;
pub use playback::RodioPlayer;
pub use recording::FfmpegRecorder;
