//! Recording value objects and the session state machine

pub mod file_name;
pub mod format;
pub mod session;
pub mod source;

pub use file_name::{
    has_recording_extension, RecordingFileName, RECORDING_EXTENSION, TIMESTAMP_FORMAT,
    UNKNOWN_CALLER,
};
pub use format::RecordingFormat;
pub use session::{InvalidStateTransition, RecorderLifecycle, RecorderState, RecordingSession};
pub use source::SourceType;
