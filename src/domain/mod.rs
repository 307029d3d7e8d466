//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod library;
pub mod permission;
pub mod recording;
pub mod telephony;

// Re-export common types
pub use config::AppConfig;
pub use error::*;
pub use library::RecordingFileEntry;
pub use permission::{Capability, PermissionStatus};
pub use recording::{
    RecorderLifecycle, RecorderState, RecordingFileName, RecordingFormat, RecordingSession,
    SourceType,
};
pub use telephony::{CallState, TelephonyEvent};
