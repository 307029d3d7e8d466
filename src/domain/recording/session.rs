//! Recording session state machine

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::file_name::RecordingFileName;
use super::source::SourceType;

/// Recorder states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "source", rename_all = "lowercase")]
pub enum RecorderState {
    #[default]
    Idle,
    Recording(SourceType),
}

impl RecorderState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording(SourceType::Voice) => "recording (voice)",
            Self::Recording(SourceType::Call) => "recording (call)",
        }
    }
}

impl fmt::Display for RecorderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: RecorderState,
    pub action: String,
}

/// Recorder lifecycle entity.
///
/// State machine:
///   IDLE -> RECORDING(source) (begin)
///   RECORDING(source) -> IDLE (end)
///
/// `end` on IDLE is allowed and reports that nothing was active.
#[derive(Debug, Default)]
pub struct RecorderLifecycle {
    state: RecorderState,
}

impl RecorderLifecycle {
    /// Get the current state
    pub fn state(&self) -> RecorderState {
        self.state
    }

    /// Transition from IDLE to RECORDING
    pub fn begin(&mut self, source: SourceType) -> Result<(), InvalidStateTransition> {
        if self.state != RecorderState::Idle {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: format!("start {} recording", source),
            });
        }
        self.state = RecorderState::Recording(source);
        Ok(())
    }

    /// Transition to IDLE, returning the source that was active
    pub fn end(&mut self) -> Option<SourceType> {
        match std::mem::take(&mut self.state) {
            RecorderState::Idle => None,
            RecorderState::Recording(source) => Some(source),
        }
    }
}

/// Description of one recording session.
/// The platform recorder resource lives beside it in the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingSession {
    pub source: SourceType,
    pub title: String,
    pub output_path: PathBuf,
    pub started_at: NaiveDateTime,
}

impl RecordingSession {
    /// Derive a session and its output path inside `dir`
    pub fn allocate(source: SourceType, title: &str, started_at: NaiveDateTime, dir: &Path) -> Self {
        let name = RecordingFileName::new(source, title, started_at);
        Self {
            source,
            title: name.title().unwrap_or_default().to_string(),
            output_path: dir.join(name.file_name()),
            started_at,
        }
    }

    /// File name component of the output path
    pub fn file_name(&self) -> String {
        self.output_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}
