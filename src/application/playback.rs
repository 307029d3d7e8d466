//! Playback controller

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use super::ports::{AudioPlayer, PlaybackControl, PlaybackEnd, PlaybackError};

/// Notifications for playback consumers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// The file played to its end
    Completed { path: PathBuf },
}

/// Result of a toggle request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackToggle {
    Started,
    Stopped,
}

struct ActivePlayback {
    path: PathBuf,
    control: Box<dyn PlaybackControl>,
    generation: u64,
}

type Slot = Arc<Mutex<Option<ActivePlayback>>>;

/// Owns the single playback resource
pub struct PlaybackController<A: AudioPlayer> {
    player: A,
    active: Slot,
    generation: AtomicU64,
    events: broadcast::Sender<PlaybackEvent>,
}

impl<A: AudioPlayer> PlaybackController<A> {
    pub fn new(player: A) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            player,
            active: Arc::new(Mutex::new(None)),
            generation: AtomicU64::new(0),
            events,
        }
    }

    /// Receive completion events
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    /// Play `path`, stopping whatever was playing first
    pub async fn play(&self, path: &Path) -> Result<(), PlaybackError> {
        let mut active = self.active.lock().await;
        if let Some(previous) = active.take() {
            Self::halt(previous);
        }

        let (control, finished) = self.player.open(path).await?.into_parts();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *active = Some(ActivePlayback {
            path: path.to_path_buf(),
            control,
            generation,
        });
        info!(path = %path.display(), "Playback started");

        let slot = Arc::clone(&self.active);
        let events = self.events.clone();
        let path = path.to_path_buf();
        tokio::spawn(async move {
            let end = finished.await.unwrap_or(PlaybackEnd::Stopped);
            let mut active = slot.lock().await;
            // A newer playback may already own the slot
            if active.as_ref().map(|a| a.generation) != Some(generation) {
                return;
            }
            active.take();
            if end == PlaybackEnd::Completed {
                debug!(path = %path.display(), "Playback completed");
                let _ = events.send(PlaybackEvent::Completed { path });
            }
        });
        Ok(())
    }

    /// Stop playback. Returns the path that was playing, if any.
    pub async fn stop(&self) -> Option<PathBuf> {
        let previous = self.active.lock().await.take()?;
        let path = previous.path.clone();
        Self::halt(previous);
        Some(path)
    }

    /// Stop only if `path` is the file playing
    pub async fn stop_if_playing(&self, path: &Path) -> bool {
        let mut active = self.active.lock().await;
        if active.as_ref().is_some_and(|a| a.path == path) {
            if let Some(previous) = active.take() {
                Self::halt(previous);
            }
            return true;
        }
        false
    }

    /// Stop when `path` is playing, otherwise play it
    pub async fn toggle(&self, path: &Path) -> Result<PlaybackToggle, PlaybackError> {
        if self.stop_if_playing(path).await {
            return Ok(PlaybackToggle::Stopped);
        }
        self.play(path).await?;
        Ok(PlaybackToggle::Started)
    }

    pub async fn is_playing(&self) -> bool {
        self.active
            .lock()
            .await
            .as_ref()
            .is_some_and(|a| a.control.is_playing())
    }

    /// Path of the file playing now
    pub async fn current(&self) -> Option<PathBuf> {
        self.active.lock().await.as_ref().map(|a| a.path.clone())
    }

    fn halt(playback: ActivePlayback) {
        match playback.control.stop() {
            Ok(()) => info!(path = %playback.path.display(), "Playback stopped"),
            Err(e) => warn!(error = %e, path = %playback.path.display(), "Player did not stop cleanly"),
        }
    }
}
