//! Recording library port

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::library::RecordingFileEntry;

/// Filesystem errors for the recordings directory
#[derive(Debug, Clone, Error)]
pub enum LibraryError {
    #[error("Failed to list recordings in {path}: {message}")]
    ListFailed { path: String, message: String },

    #[error("Failed to create recordings directory {path}: {message}")]
    CreateFailed { path: String, message: String },

    #[error("Failed to delete {path}: {message}")]
    DeleteFailed { path: String, message: String },

    #[error("Not a recording in the library: {0}")]
    NotARecording(String),

    #[error("Recording is still in progress: {0}")]
    InUse(String),
}

/// Port for the recordings directory
#[async_trait]
pub trait RecordingLibrary: Send + Sync {
    /// Directory new recordings are written to
    fn directory(&self) -> &Path;

    /// Create the directory if it does not exist
    async fn ensure_directory(&self) -> Result<(), LibraryError>;

    /// Recording files, most recently modified first.
    /// A missing directory yields an empty list.
    async fn list(&self) -> Result<Vec<RecordingFileEntry>, LibraryError>;

    /// Remove one recording file
    async fn delete(&self, path: &Path) -> Result<(), LibraryError>;
}
