//! Application error taxonomy

use thiserror::Error;

use crate::domain::error::{ConfigError, EmptyTitleError};
use crate::domain::permission::{Capability, PermissionStatus};
use crate::domain::recording::InvalidStateTransition;

use super::ports::{LibraryError, PlaybackError, RecordingError};

/// Errors surfaced to the user by any command
#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("{} permission is {status}", capability.label())]
    PermissionDenied {
        capability: Capability,
        status: PermissionStatus,
    },

    #[error(transparent)]
    InvalidTitle(#[from] EmptyTitleError),

    #[error(transparent)]
    InvalidState(#[from] InvalidStateTransition),

    #[error("Could not start recorder: {0}")]
    RecorderInit(#[from] RecordingError),

    #[error("Playback failed: {0}")]
    Playback(#[from] PlaybackError),

    #[error("Recordings directory error: {0}")]
    Filesystem(#[from] LibraryError),

    #[error("Could not save preference: {0}")]
    PreferenceWrite(#[from] ConfigError),
}

impl AppError {
    /// Whether the user can fix this by enabling a permission in settings
    pub fn needs_settings(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied {
                status: PermissionStatus::Blocked,
                ..
            }
        )
    }
}
