//! Mock adapters shared by the application unit tests

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::oneshot;

use crate::domain::error::ConfigError;
use crate::domain::library::{sort_newest_first, RecordingFileEntry};
use crate::domain::permission::{Capability, PermissionStatus};
use crate::domain::recording::{has_recording_extension, RecordingFormat};

use super::ports::{
    AudioPlayer, Clock, LibraryError, NotificationError, NotificationIcon, Notifier,
    PermissionError, PermissionProvider, PlatformRecorder, PlaybackControl, PlaybackEnd,
    PlaybackError, PlaybackHandle, PreferenceStore, RecorderHandle, RecordingError,
    RecordingLibrary,
};

pub struct FixedClock(NaiveDateTime);

impl FixedClock {
    pub fn at(timestamp: &str) -> Self {
        Self(NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[derive(Default)]
struct RecorderCounters {
    opens: AtomicUsize,
    finishes: AtomicUsize,
    open_handles: AtomicUsize,
    max_open_handles: AtomicUsize,
    paths: Mutex<Vec<PathBuf>>,
}

/// Recorder that counts acquisitions and releases
#[derive(Clone, Default)]
pub struct MockRecorder {
    counters: Arc<RecorderCounters>,
    open_error: Option<RecordingError>,
    finish_error: bool,
    open_delay_ms: u64,
}

impl MockRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: RecordingError) -> Self {
        Self {
            open_error: Some(error),
            ..Self::default()
        }
    }

    pub fn with_finish_error(mut self) -> Self {
        self.finish_error = true;
        self
    }

    pub fn with_open_delay_ms(mut self, ms: u64) -> Self {
        self.open_delay_ms = ms;
        self
    }

    pub fn open_count(&self) -> usize {
        self.counters.opens.load(Ordering::SeqCst)
    }

    pub fn finish_count(&self) -> usize {
        self.counters.finishes.load(Ordering::SeqCst)
    }

    pub fn open_handles(&self) -> usize {
        self.counters.open_handles.load(Ordering::SeqCst)
    }

    pub fn max_open_handles(&self) -> usize {
        self.counters.max_open_handles.load(Ordering::SeqCst)
    }

    pub fn opened_paths(&self) -> Vec<PathBuf> {
        self.counters.paths.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlatformRecorder for MockRecorder {
    async fn open(
        &self,
        output: &Path,
        _format: RecordingFormat,
    ) -> Result<Box<dyn RecorderHandle>, RecordingError> {
        if self.open_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.open_delay_ms)).await;
        }
        if let Some(e) = &self.open_error {
            return Err(e.clone());
        }
        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        let open = self.counters.open_handles.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_open_handles.fetch_max(open, Ordering::SeqCst);
        self.counters.paths.lock().unwrap().push(output.to_path_buf());
        Ok(Box::new(MockHandle {
            counters: Arc::clone(&self.counters),
            fail: self.finish_error,
            released: false,
        }))
    }
}

struct MockHandle {
    counters: Arc<RecorderCounters>,
    fail: bool,
    released: bool,
}

#[async_trait]
impl RecorderHandle for MockHandle {
    async fn finish(&mut self) -> Result<(), RecordingError> {
        if !self.released {
            self.released = true;
            self.counters.finishes.fetch_add(1, Ordering::SeqCst);
            self.counters.open_handles.fetch_sub(1, Ordering::SeqCst);
        }
        if self.fail {
            return Err(RecordingError::FinalizeFailed("disk full".into()));
        }
        Ok(())
    }
}

/// Player whose playbacks finish only when told to
#[derive(Clone, Default)]
pub struct MockPlayer {
    active: Arc<Mutex<Vec<(PathBuf, Arc<AtomicBool>)>>>,
    completions: Arc<Mutex<HashMap<PathBuf, oneshot::Sender<PlaybackEnd>>>>,
    missing: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `open` fail for this path
    pub fn missing(&self, path: &Path) {
        self.missing.lock().unwrap().push(path.to_path_buf());
    }

    /// Paths whose playback has not been stopped
    pub fn playing(&self) -> Vec<PathBuf> {
        self.active
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, playing)| playing.load(Ordering::SeqCst))
            .map(|(path, _)| path.clone())
            .collect()
    }

    /// Simulate the file reaching its end
    pub fn complete(&self, path: &Path) {
        for (p, playing) in self.active.lock().unwrap().iter() {
            if p == path {
                playing.store(false, Ordering::SeqCst);
            }
        }
        if let Some(tx) = self.completions.lock().unwrap().remove(path) {
            let _ = tx.send(PlaybackEnd::Completed);
        }
    }
}

struct MockControl {
    playing: Arc<AtomicBool>,
}

impl PlaybackControl for MockControl {
    fn stop(&self) -> Result<(), PlaybackError> {
        self.playing.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioPlayer for MockPlayer {
    async fn open(&self, path: &Path) -> Result<PlaybackHandle, PlaybackError> {
        if self.missing.lock().unwrap().iter().any(|p| p == path) {
            return Err(PlaybackError::NotFound(path.display().to_string()));
        }
        let playing = Arc::new(AtomicBool::new(true));
        let (tx, rx) = oneshot::channel();
        self.active
            .lock()
            .unwrap()
            .push((path.to_path_buf(), Arc::clone(&playing)));
        self.completions
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), tx);
        Ok(PlaybackHandle::new(Box::new(MockControl { playing }), rx))
    }
}

/// In-memory preference
#[derive(Default)]
pub struct MockPreferences {
    enabled: AtomicBool,
    broken: bool,
    reads: AtomicUsize,
}

impl MockPreferences {
    pub fn enabled(value: bool) -> Self {
        Self {
            enabled: AtomicBool::new(value),
            ..Self::default()
        }
    }

    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PreferenceStore for MockPreferences {
    async fn auto_call_enabled(&self) -> Result<bool, ConfigError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.broken {
            return Err(ConfigError::ReadError("unreadable".into()));
        }
        Ok(self.enabled.load(Ordering::SeqCst))
    }

    async fn set_auto_call_enabled(&self, enabled: bool) -> Result<(), ConfigError> {
        if self.broken {
            return Err(ConfigError::WriteError("read-only".into()));
        }
        self.enabled.store(enabled, Ordering::SeqCst);
        Ok(())
    }
}

/// Permission provider with scripted answers
#[derive(Default)]
pub struct MockPermissions {
    checks: Mutex<HashMap<Capability, PermissionStatus>>,
    requests: Mutex<HashMap<Capability, PermissionStatus>>,
    prompted: Mutex<Vec<Capability>>,
    settings_opened: AtomicUsize,
}

impl MockPermissions {
    /// Every capability granted
    pub fn granted() -> Self {
        Self::default()
    }

    pub fn with_check(self, capability: Capability, status: PermissionStatus) -> Self {
        self.checks.lock().unwrap().insert(capability, status);
        self
    }

    pub fn with_request(self, capability: Capability, status: PermissionStatus) -> Self {
        self.requests.lock().unwrap().insert(capability, status);
        self
    }

    pub fn prompted(&self) -> Vec<Capability> {
        self.prompted.lock().unwrap().clone()
    }

    pub fn settings_opened(&self) -> usize {
        self.settings_opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PermissionProvider for MockPermissions {
    async fn check(&self, capability: Capability) -> PermissionStatus {
        self.checks
            .lock()
            .unwrap()
            .get(&capability)
            .copied()
            .unwrap_or(PermissionStatus::Granted)
    }

    async fn request(&self, capability: Capability) -> PermissionStatus {
        self.prompted.lock().unwrap().push(capability);
        self.requests
            .lock()
            .unwrap()
            .get(&capability)
            .copied()
            .unwrap_or(PermissionStatus::Denied)
    }

    fn open_settings(&self) -> Result<(), PermissionError> {
        self.settings_opened.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Records every notification shown and dismissed
#[derive(Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<(String, String, NotificationIcon)>>,
    showing: AtomicBool,
    dismissed: AtomicUsize,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(String, String, NotificationIcon)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn is_showing(&self) -> bool {
        self.showing.load(Ordering::SeqCst)
    }

    pub fn dismissed(&self) -> usize {
        self.dismissed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn show_ongoing(
        &self,
        title: &str,
        message: &str,
        icon: NotificationIcon,
    ) -> Result<(), NotificationError> {
        self.sent
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string(), icon));
        self.showing.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn dismiss(&self) -> Result<(), NotificationError> {
        if self.showing.swap(false, Ordering::SeqCst) {
            self.dismissed.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// Library backed by a list of names
pub struct MockLibrary {
    dir: PathBuf,
    files: Mutex<Vec<RecordingFileEntry>>,
}

impl MockLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            files: Mutex::new(Vec::new()),
        }
    }

    pub fn add(&self, name: &str, age_secs: u64) -> PathBuf {
        let path = self.dir.join(name);
        let modified_at = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 - age_secs);
        self.files.lock().unwrap().push(RecordingFileEntry {
            name: name.to_string(),
            path: path.clone(),
            modified_at,
        });
        path
    }

    pub fn names(&self) -> Vec<String> {
        self.files
            .lock()
            .unwrap()
            .iter()
            .map(|f| f.name.clone())
            .collect()
    }
}

#[async_trait]
impl RecordingLibrary for MockLibrary {
    fn directory(&self) -> &Path {
        &self.dir
    }

    async fn ensure_directory(&self) -> Result<(), LibraryError> {
        Ok(())
    }

    async fn list(&self) -> Result<Vec<RecordingFileEntry>, LibraryError> {
        let mut entries: Vec<_> = self
            .files
            .lock()
            .unwrap()
            .iter()
            .filter(|f| has_recording_extension(&f.name))
            .cloned()
            .collect();
        sort_newest_first(&mut entries);
        Ok(entries)
    }

    async fn delete(&self, path: &Path) -> Result<(), LibraryError> {
        let mut files = self.files.lock().unwrap();
        let before = files.len();
        files.retain(|f| f.path != path);
        if files.len() == before {
            return Err(LibraryError::DeleteFailed {
                path: path.display().to_string(),
                message: "No such file".into(),
            });
        }
        Ok(())
    }
}
