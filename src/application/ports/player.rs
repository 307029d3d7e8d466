//! Audio playback port

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::oneshot;

/// Errors that can occur during playback
#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    #[error("Recording not found: {0}")]
    NotFound(String),

    #[error("Unsupported or corrupt audio file: {0}")]
    DecodeFailed(String),

    #[error("Audio device not available: {0}")]
    DeviceNotAvailable(String),

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),
}

/// How a playback ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEnd {
    /// Reached the end of the file
    Completed,
    /// Stopped before the end
    Stopped,
}

/// Control side of an active playback
pub trait PlaybackControl: Send + Sync {
    /// Stop output and release the device. Stopping twice is harmless.
    fn stop(&self) -> Result<(), PlaybackError>;

    fn is_playing(&self) -> bool;
}

/// An opened, playing file
pub struct PlaybackHandle {
    control: Box<dyn PlaybackControl>,
    finished: oneshot::Receiver<PlaybackEnd>,
}

impl PlaybackHandle {
    /// Bundle a control with the channel that fires when playback ends
    pub fn new(control: Box<dyn PlaybackControl>, finished: oneshot::Receiver<PlaybackEnd>) -> Self {
        Self { control, finished }
    }

    pub fn into_parts(self) -> (Box<dyn PlaybackControl>, oneshot::Receiver<PlaybackEnd>) {
        (self.control, self.finished)
    }
}

/// Port for the platform audio player
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Open `path` and start playing it
    async fn open(&self, path: &Path) -> Result<PlaybackHandle, PlaybackError>;
}
