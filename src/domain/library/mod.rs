//! Recording library entries

use std::path::PathBuf;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::domain::recording::RecordingFileName;

/// One completed recording as seen in a directory listing.
/// Rebuilt on every listing; the filesystem is the source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingFileEntry {
    pub name: String,
    pub path: PathBuf,
    pub modified_at: SystemTime,
}

impl RecordingFileEntry {
    /// Source, title and timestamp, when the name follows the recording format
    pub fn details(&self) -> Option<RecordingFileName> {
        RecordingFileName::parse(&self.name)
    }

    /// Modification time in local time, for display
    pub fn modified_local(&self) -> DateTime<Local> {
        DateTime::<Local>::from(self.modified_at)
    }
}

/// Order entries most recent first
pub fn sort_newest_first(entries: &mut [RecordingFileEntry]) {
    entries.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
}
