//! Recording session controller
//!
//! Owns the single platform recorder handle and serialises every start,
//! stop and teardown behind one async mutex. Each transition holds the
//! lock until it has fully completed, so a UI command and a phone-state
//! event can never interleave half way through.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::error::EmptyTitleError;
use crate::domain::recording::{
    RecorderLifecycle, RecorderState, RecordingFormat, RecordingSession, SourceType,
};

use super::error::AppError;
use super::ports::{
    Clock, NotificationIcon, Notifier, PlatformRecorder, RecorderHandle, RecordingError,
};

/// A started session together with the recorder it owns
struct ActiveRecording {
    session: RecordingSession,
    handle: Box<dyn RecorderHandle>,
}

#[derive(Default)]
struct ControllerState {
    lifecycle: RecorderLifecycle,
    active: Option<ActiveRecording>,
}

/// Settings fixed for the lifetime of a controller
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Directory new recordings are written to
    pub directory: PathBuf,
    /// Encoder settings handed to the recorder
    pub format: RecordingFormat,
    /// Post a notification while a session is running
    pub notify: bool,
}

impl RecordingConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            format: RecordingFormat::default(),
            notify: false,
        }
    }
}

/// Recording session controller
pub struct RecordingController<R: PlatformRecorder> {
    recorder: R,
    clock: Arc<dyn Clock>,
    notifier: Option<Arc<dyn Notifier>>,
    config: RecordingConfig,
    state: Mutex<ControllerState>,
}

impl<R: PlatformRecorder> RecordingController<R> {
    /// Create an idle controller
    pub fn new(recorder: R, clock: Arc<dyn Clock>, config: RecordingConfig) -> Self {
        Self {
            recorder,
            clock,
            notifier: None,
            config,
            state: Mutex::new(ControllerState::default()),
        }
    }

    /// Attach a notifier used for the ongoing-recording notification
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn directory(&self) -> &Path {
        &self.config.directory
    }

    /// Get the current state
    pub async fn state(&self) -> RecorderState {
        self.state.lock().await.lifecycle.state()
    }

    /// The running session, if any
    pub async fn active_session(&self) -> Option<RecordingSession> {
        self.state
            .lock()
            .await
            .active
            .as_ref()
            .map(|active| active.session.clone())
    }

    /// Start a manual voice recording named `title`.
    ///
    /// A blank title is rejected before any lock or device is touched.
    pub async fn start_voice(&self, title: &str) -> Result<RecordingSession, AppError> {
        if title.trim().is_empty() {
            return Err(EmptyTitleError.into());
        }
        self.start(SourceType::Voice, title).await
    }

    /// Start a call recording attributed to `caller`
    pub async fn start_call(&self, caller: &str) -> Result<RecordingSession, AppError> {
        self.start(SourceType::Call, caller).await
    }

    async fn start(&self, source: SourceType, title: &str) -> Result<RecordingSession, AppError> {
        let session = {
            let mut state = self.state.lock().await;

            if let Some(previous) = self.release(&mut state).await {
                info!(
                    path = %previous.output_path.display(),
                    "Stopped previous {} recording before starting a new one",
                    previous.source
                );
            }

            let session = RecordingSession::allocate(
                source,
                title,
                self.clock.now(),
                &self.config.directory,
            );

            state.lifecycle.begin(source)?;
            match self.acquire(&session).await {
                Ok(handle) => {
                    state.active = Some(ActiveRecording {
                        session: session.clone(),
                        handle,
                    });
                }
                Err(e) => {
                    state.lifecycle.end();
                    warn!(error = %e, source = %source, "Recorder failed to start");
                    return Err(e.into());
                }
            }
            session
        };

        info!(
            path = %session.output_path.display(),
            source = %session.source,
            "Recording started"
        );
        self.announce(&session).await;
        Ok(session)
    }

    async fn acquire(
        &self,
        session: &RecordingSession,
    ) -> Result<Box<dyn RecorderHandle>, RecordingError> {
        tokio::fs::create_dir_all(&self.config.directory)
            .await
            .map_err(|e| {
                RecordingError::StorageFailed(format!(
                    "{}: {}",
                    self.config.directory.display(),
                    e
                ))
            })?;
        self.recorder
            .open(&session.output_path, self.config.format)
            .await
    }

    /// Stop the running session.
    ///
    /// Returns the finished session, or `None` when already idle.
    /// Never fails: a recorder that cannot be released cleanly is logged.
    pub async fn stop(&self) -> Option<RecordingSession> {
        let mut state = self.state.lock().await;
        let finished = self.release(&mut state).await;
        match &finished {
            Some(session) => info!(path = %session.output_path.display(), "Recording stopped"),
            None => debug!("Stop requested while idle"),
        }
        finished
    }

    /// Forced teardown at process exit
    pub async fn shutdown(&self) {
        let mut state = self.state.lock().await;
        if let Some(session) = self.release(&mut state).await {
            info!(
                path = %session.output_path.display(),
                "Recording finalized during shutdown"
            );
        }
    }

    async fn release(&self, state: &mut ControllerState) -> Option<RecordingSession> {
        state.lifecycle.end();
        let mut active = state.active.take()?;
        if let Err(e) = active.handle.finish().await {
            warn!(
                error = %e,
                path = %active.session.output_path.display(),
                "Recorder did not release cleanly"
            );
        }
        self.withdraw().await;
        Some(active.session)
    }

    async fn announce(&self, session: &RecordingSession) {
        if !self.config.notify {
            return;
        }
        let Some(notifier) = &self.notifier else {
            return;
        };
        let icon = match session.source {
            SourceType::Voice => NotificationIcon::Recording,
            SourceType::Call => NotificationIcon::Call,
        };
        if let Err(e) = notifier
            .show_ongoing("Recording in progress", &session.title, icon)
            .await
        {
            debug!(error = %e, "Recording notification failed");
        }
    }

    async fn withdraw(&self) {
        let Some(notifier) = self.notifier.as_ref().filter(|_| self.config.notify) else {
            return;
        };
        if let Err(e) = notifier.dismiss().await {
            debug!(error = %e, "Could not dismiss recording notification");
        }
    }
}
