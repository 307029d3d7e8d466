//! Typed command interface between the UI and the recorder subsystems

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::domain::error::EmptyTitleError;
use crate::domain::library::RecordingFileEntry;
use crate::domain::recording::{has_recording_extension, RecorderState, RecordingSession};
use crate::domain::telephony::TelephonyEvent;

use super::error::AppError;
use super::permission_gate::PermissionGate;
use super::playback::{PlaybackController, PlaybackToggle};
use super::ports::{
    AudioPlayer, LibraryError, PermissionProvider, PlatformRecorder, PreferenceStore,
    RecordingLibrary,
};
use super::recording::RecordingController;

/// User commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    StartVoice { title: String },
    StopVoice,
    SetAutoCall { enabled: bool },
    Play { path: PathBuf },
    TogglePlay { path: PathBuf },
    StopPlayback,
    Delete { path: PathBuf },
    List,
    Status,
    PhoneState { event: TelephonyEvent },
}

/// Snapshot of everything the UI renders besides the listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub state: RecorderState,
    pub session: Option<RecordingSession>,
    pub auto_call: bool,
    pub playing: Option<PathBuf>,
    pub recordings_dir: PathBuf,
}

/// Successful command results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    Started { session: RecordingSession },
    Stopped { session: Option<RecordingSession> },
    AutoCall { enabled: bool },
    Playing { path: PathBuf },
    PlaybackStopped { path: Option<PathBuf> },
    Deleted { path: PathBuf, stopped_playback: bool },
    Recordings { entries: Vec<RecordingFileEntry> },
    Status(StatusReport),
    PhoneStateQueued { accepted: bool },
}

/// Dispatches commands to the controllers
pub struct RecorderService<R: PlatformRecorder, A: AudioPlayer> {
    controller: Arc<RecordingController<R>>,
    playback: Arc<PlaybackController<A>>,
    gate: PermissionGate<dyn PermissionProvider>,
    preferences: Arc<dyn PreferenceStore>,
    library: Arc<dyn RecordingLibrary>,
    phone_events: Option<mpsc::Sender<TelephonyEvent>>,
}

impl<R: PlatformRecorder, A: AudioPlayer> RecorderService<R, A> {
    pub fn new(
        controller: Arc<RecordingController<R>>,
        playback: Arc<PlaybackController<A>>,
        gate: PermissionGate<dyn PermissionProvider>,
        preferences: Arc<dyn PreferenceStore>,
        library: Arc<dyn RecordingLibrary>,
    ) -> Self {
        Self {
            controller,
            playback,
            gate,
            preferences,
            library,
            phone_events: None,
        }
    }

    /// Forward phone state commands to a running listener
    pub fn with_phone_events(mut self, sender: mpsc::Sender<TelephonyEvent>) -> Self {
        self.phone_events = Some(sender);
        self
    }

    pub fn controller(&self) -> &Arc<RecordingController<R>> {
        &self.controller
    }

    pub fn playback(&self) -> &Arc<PlaybackController<A>> {
        &self.playback
    }

    /// Execute one command to completion
    pub async fn execute(&self, command: Command) -> Result<CommandOutcome, AppError> {
        match command {
            Command::StartVoice { title } => {
                if title.trim().is_empty() {
                    return Err(EmptyTitleError.into());
                }
                self.gate.authorize(&self.gate.for_recording()).await?;
                let session = self.controller.start_voice(&title).await?;
                Ok(CommandOutcome::Started { session })
            }
            Command::StopVoice => Ok(CommandOutcome::Stopped {
                session: self.controller.stop().await,
            }),
            Command::SetAutoCall { enabled } => {
                if enabled {
                    self.gate.authorize(&self.gate.for_auto_call()).await?;
                }
                self.preferences.set_auto_call_enabled(enabled).await?;
                info!(enabled, "Auto-call recording toggled");
                Ok(CommandOutcome::AutoCall { enabled })
            }
            Command::Play { path } => {
                let path = absolute(&path);
                self.playback.play(&path).await?;
                Ok(CommandOutcome::Playing { path })
            }
            Command::TogglePlay { path } => {
                let path = absolute(&path);
                match self.playback.toggle(&path).await? {
                    PlaybackToggle::Started => Ok(CommandOutcome::Playing { path }),
                    PlaybackToggle::Stopped => {
                        Ok(CommandOutcome::PlaybackStopped { path: Some(path) })
                    }
                }
            }
            Command::StopPlayback => Ok(CommandOutcome::PlaybackStopped {
                path: self.playback.stop().await,
            }),
            Command::Delete { path } => self.delete(&path).await,
            Command::List => Ok(CommandOutcome::Recordings {
                entries: self.library.list().await?,
            }),
            Command::Status => Ok(CommandOutcome::Status(self.status().await)),
            Command::PhoneState { event } => {
                let accepted = match &self.phone_events {
                    Some(sender) => sender.send(event).await.is_ok(),
                    None => false,
                };
                if !accepted {
                    warn!("No call-state listener is running");
                }
                Ok(CommandOutcome::PhoneStateQueued { accepted })
            }
        }
    }

    async fn delete(&self, path: &Path) -> Result<CommandOutcome, AppError> {
        let not_a_recording = || LibraryError::NotARecording(path.display().to_string());
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| has_recording_extension(n))
            .ok_or_else(not_a_recording)?;
        let directory = self.library.directory();
        let in_library = path
            .parent()
            .is_some_and(|parent| absolute(parent) == absolute(directory));
        if !in_library {
            return Err(not_a_recording().into());
        }
        let target = absolute(path);

        if let Some(session) = self.controller.active_session().await {
            if absolute(&session.output_path) == target {
                return Err(LibraryError::InUse(path.display().to_string()).into());
            }
        }

        let stopped_playback = self.playback.stop_if_playing(&target).await;
        self.library.delete(&directory.join(file_name)).await?;
        info!(path = %target.display(), "Recording deleted");
        Ok(CommandOutcome::Deleted {
            path: path.to_path_buf(),
            stopped_playback,
        })
    }

    /// Current recorder, preference and playback state
    pub async fn status(&self) -> StatusReport {
        let auto_call = match self.preferences.auto_call_enabled().await {
            Ok(enabled) => enabled,
            Err(e) => {
                warn!(error = %e, "Could not read auto-call preference");
                false
            }
        };
        StatusReport {
            state: self.controller.state().await,
            session: self.controller.active_session().await,
            auto_call,
            playing: self.playback.current().await,
            recordings_dir: self.library.directory().to_path_buf(),
        }
    }

    /// Forced teardown at process exit
    pub async fn shutdown(&self) {
        self.playback.stop().await;
        self.controller.shutdown().await;
    }
}

/// Resolve against the daemon's working directory so differently spelled
/// paths to the same file compare equal
fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
