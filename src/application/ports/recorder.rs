//! Recording port interfaces

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::RecordingFormat;

/// Recording errors
#[derive(Debug, Clone, Error)]
pub enum RecordingError {
    #[error("FFmpeg not found. Install it and make sure it is on PATH")]
    FfmpegNotFound,

    #[error("No audio device available")]
    NoAudioDevice,

    #[error("Recording device is busy: {0}")]
    DeviceBusy(String),

    #[error("Failed to start recording: {0}")]
    StartFailed(String),

    #[error("Failed to write recording: {0}")]
    StorageFailed(String),

    #[error("Failed to finalize recording: {0}")]
    FinalizeFailed(String),
}

/// Port for the platform audio recorder.
///
/// Each call to [`PlatformRecorder::open`] acquires the capture resource and
/// returns a handle that owns it exclusively.
#[async_trait]
pub trait PlatformRecorder: Send + Sync {
    /// Start capturing into `output` with the given encoder settings.
    ///
    /// Returns once the recorder is running, or with an error if it could
    /// not be initialised. No file is guaranteed to exist on error.
    async fn open(
        &self,
        output: &Path,
        format: RecordingFormat,
    ) -> Result<Box<dyn RecorderHandle>, RecordingError>;
}

/// Exclusive ownership of one running capture.
/// Dropping a handle without calling `finish` must still release the device.
#[async_trait]
pub trait RecorderHandle: Send {
    /// Flush, close and release the recorder.
    /// The output file is complete once this returns `Ok`.
    async fn finish(&mut self) -> Result<(), RecordingError>;
}
