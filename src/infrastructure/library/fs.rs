//! Filesystem recording library adapter

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::application::ports::{LibraryError, RecordingLibrary};
use crate::domain::library::{sort_newest_first, RecordingFileEntry};
use crate::domain::recording::has_recording_extension;

/// Recordings directory on the local filesystem
pub struct FsRecordingLibrary {
    dir: PathBuf,
}

impl FsRecordingLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn list_error(&self, e: std::io::Error) -> LibraryError {
        LibraryError::ListFailed {
            path: self.dir.display().to_string(),
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl RecordingLibrary for FsRecordingLibrary {
    fn directory(&self) -> &Path {
        &self.dir
    }

    async fn ensure_directory(&self) -> Result<(), LibraryError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| LibraryError::CreateFailed {
                path: self.dir.display().to_string(),
                message: e.to_string(),
            })
    }

    async fn list(&self) -> Result<Vec<RecordingFileEntry>, LibraryError> {
        let mut reader = match fs::read_dir(&self.dir).await {
            Ok(reader) => reader,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.list_error(e)),
        };

        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await.map_err(|e| self.list_error(e))? {
            let name = entry.file_name().to_string_lossy().to_string();
            if !has_recording_extension(&name) {
                continue;
            }
            // Files removed between listing and stat are skipped
            let Ok(metadata) = entry.metadata().await else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            let modified_at = metadata.modified().map_err(|e| self.list_error(e))?;
            entries.push(RecordingFileEntry {
                name,
                path: entry.path(),
                modified_at,
            });
        }

        sort_newest_first(&mut entries);
        debug!(count = entries.len(), dir = %self.dir.display(), "Listed recordings");
        Ok(entries)
    }

    async fn delete(&self, path: &Path) -> Result<(), LibraryError> {
        fs::remove_file(path)
            .await
            .map_err(|e| LibraryError::DeleteFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })
    }
}
