//! Recordings directory adapters

mod fs;

pub use self::fs::FsRecordingLibrary;
