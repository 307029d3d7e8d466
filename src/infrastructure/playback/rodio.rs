//! Rodio-based audio player adapter
//!
//! `OutputStream` is not `Send`, so each playback gets a thread that owns
//! the stream and the decoder and reports back how it ended.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink};
use tokio::sync::oneshot;
use tracing::debug;

use crate::application::ports::{
    AudioPlayer, PlaybackControl, PlaybackEnd, PlaybackError, PlaybackHandle,
};

/// Audio player implementation using rodio
pub struct RodioPlayer;

impl RodioPlayer {
    /// Create a new rodio-based player
    pub fn new() -> Self {
        Self
    }
}

impl Default for RodioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioPlayer for RodioPlayer {
    async fn open(&self, path: &Path) -> Result<PlaybackHandle, PlaybackError> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(PlaybackError::NotFound(path.display().to_string()));
        }

        let (ready_tx, ready_rx) = oneshot::channel();
        let (done_tx, done_rx) = oneshot::channel();
        let path = path.to_path_buf();

        std::thread::Builder::new()
            .name("playback".to_string())
            .spawn(move || play_sync(path, ready_tx, done_tx))
            .map_err(|e| PlaybackError::PlaybackFailed(e.to_string()))?;

        let control = ready_rx
            .await
            .map_err(|_| PlaybackError::PlaybackFailed("Playback thread exited".to_string()))??;

        Ok(PlaybackHandle::new(Box::new(control), done_rx))
    }
}

/// Control side shared with the playback thread
struct RodioControl {
    sink: Arc<Sink>,
    stopped: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

impl PlaybackControl for RodioControl {
    fn stop(&self) -> Result<(), PlaybackError> {
        self.stopped.store(true, Ordering::SeqCst);
        self.sink.stop();
        Ok(())
    }

    fn is_playing(&self) -> bool {
        !self.stopped.load(Ordering::SeqCst) && !self.finished.load(Ordering::SeqCst)
    }
}

/// Open the device and file, hand back a control, then block until the end
fn play_sync(
    path: PathBuf,
    ready: oneshot::Sender<Result<RodioControl, PlaybackError>>,
    done: oneshot::Sender<PlaybackEnd>,
) {
    // Get output stream
    let (_stream, stream_handle) = match OutputStream::try_default() {
        Ok(pair) => pair,
        Err(e) => {
            let _ = ready.send(Err(PlaybackError::DeviceNotAvailable(e.to_string())));
            return;
        }
    };

    let source = match File::open(&path)
        .map_err(|e| PlaybackError::NotFound(format!("{}: {}", path.display(), e)))
        .and_then(|file| {
            Decoder::new(BufReader::new(file))
                .map_err(|e| PlaybackError::DecodeFailed(format!("{}: {}", path.display(), e)))
        }) {
        Ok(source) => source,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    let sink = match Sink::try_new(&stream_handle) {
        Ok(sink) => Arc::new(sink),
        Err(e) => {
            let _ = ready.send(Err(PlaybackError::PlaybackFailed(e.to_string())));
            return;
        }
    };
    sink.append(source);

    let stopped = Arc::new(AtomicBool::new(false));
    let finished = Arc::new(AtomicBool::new(false));
    let control = RodioControl {
        sink: Arc::clone(&sink),
        stopped: Arc::clone(&stopped),
        finished: Arc::clone(&finished),
    };
    if ready.send(Ok(control)).is_err() {
        return;
    }

    // Wait for playback to complete or be stopped
    sink.sleep_until_end();
    finished.store(true, Ordering::SeqCst);

    let end = if stopped.load(Ordering::SeqCst) {
        PlaybackEnd::Stopped
    } else {
        PlaybackEnd::Completed
    };
    debug!(path = %path.display(), ?end, "Playback thread finished");
    let _ = done.send(end);
}
