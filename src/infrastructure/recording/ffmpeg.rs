//! FFmpeg-based audio recorder adapter
//!
//! Captures from the configured input device and encodes AAC into an
//! MPEG-4 container. SIGINT makes FFmpeg write the trailer and exit.

use std::path::{Path, PathBuf};
use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio::time::{sleep, timeout, Duration};
use tracing::{debug, warn};

use crate::application::ports::{PlatformRecorder, RecorderHandle, RecordingError};
use crate::domain::recording::RecordingFormat;

/// Time FFmpeg gets to fail on a bad device before we call it started
const STARTUP_GRACE: Duration = Duration::from_millis(300);

/// Time FFmpeg gets to finalize the container after SIGINT
const FINALIZE_TIMEOUT: Duration = Duration::from_secs(5);

/// FFmpeg recorder
#[derive(Debug, Clone)]
pub struct FfmpegRecorder {
    input_format: String,
    input_device: String,
}

impl FfmpegRecorder {
    /// Create a recorder for an FFmpeg input (`-f <format> -i <device>`)
    pub fn new(input_format: impl Into<String>, input_device: impl Into<String>) -> Self {
        Self {
            input_format: input_format.into(),
            input_device: input_device.into(),
        }
    }

    /// Build FFmpeg args for recording
    fn build_ffmpeg_args(&self, output_path: &Path, format: RecordingFormat) -> Vec<String> {
        vec![
            "-hide_banner".to_string(),
            "-nostdin".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-f".to_string(),
            self.input_format.clone(),
            "-i".to_string(),
            self.input_device.clone(),
            "-c:a".to_string(),
            "aac".to_string(),
            "-b:a".to_string(),
            format!("{}k", format.bitrate_kbps()),
            "-ar".to_string(),
            format.sample_rate_hz.to_string(),
            "-ac".to_string(),
            format.channels.to_string(),
            "-f".to_string(),
            "mp4".to_string(),
            "-y".to_string(), // Overwrite output
            output_path.to_string_lossy().to_string(),
        ]
    }

    /// Spawn FFmpeg process
    fn spawn_ffmpeg(args: Vec<String>) -> Result<Child, RecordingError> {
        Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RecordingError::FfmpegNotFound
                } else {
                    RecordingError::StartFailed(e.to_string())
                }
            })
    }

    /// Last line FFmpeg wrote to stderr
    async fn last_error_line(child: &mut Child) -> String {
        let mut buf = Vec::new();
        if let Some(mut stderr) = child.stderr.take() {
            let _ = stderr.read_to_end(&mut buf).await;
        }
        String::from_utf8_lossy(&buf)
            .lines()
            .last()
            .unwrap_or("unknown error")
            .to_string()
    }

    /// Map a startup failure message to an error kind
    fn classify_start_failure(message: String) -> RecordingError {
        let lower = message.to_lowercase();
        if lower.contains("busy") {
            RecordingError::DeviceBusy(message)
        } else if lower.contains("no space") || lower.contains("permission denied") {
            RecordingError::StorageFailed(message)
        } else {
            RecordingError::StartFailed(message)
        }
    }

    /// Send signal to FFmpeg process
    fn send_signal(child: &Child, sig: Signal) -> Result<(), RecordingError> {
        if let Some(id) = child.id() {
            signal::kill(Pid::from_raw(id as i32), sig)
                .map_err(|e| RecordingError::FinalizeFailed(format!("Signal failed: {}", e)))?;
        }
        Ok(())
    }
}

impl Default for FfmpegRecorder {
    fn default() -> Self {
        Self::new(
            crate::domain::config::DEFAULT_INPUT_FORMAT,
            crate::domain::config::DEFAULT_INPUT_DEVICE,
        )
    }
}

#[async_trait]
impl PlatformRecorder for FfmpegRecorder {
    async fn open(
        &self,
        output: &Path,
        format: RecordingFormat,
    ) -> Result<Box<dyn RecorderHandle>, RecordingError> {
        let args = self.build_ffmpeg_args(output, format);
        debug!(?args, "Spawning ffmpeg");
        let mut child = Self::spawn_ffmpeg(args)?;

        // A missing or busy device makes FFmpeg exit right away
        sleep(STARTUP_GRACE).await;
        if let Some(status) = child
            .try_wait()
            .map_err(|e| RecordingError::StartFailed(e.to_string()))?
        {
            let message = Self::last_error_line(&mut child).await;
            warn!(%status, %message, "ffmpeg exited during startup");
            let _ = tokio::fs::remove_file(output).await;
            return Err(Self::classify_start_failure(message));
        }

        Ok(Box::new(FfmpegHandle {
            child: Some(child),
            output: output.to_path_buf(),
        }))
    }
}

/// A running FFmpeg capture
struct FfmpegHandle {
    child: Option<Child>,
    output: PathBuf,
}

#[async_trait]
impl RecorderHandle for FfmpegHandle {
    async fn finish(&mut self) -> Result<(), RecordingError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        // Send SIGINT for graceful stop (FFmpeg will finalize the file)
        FfmpegRecorder::send_signal(&child, Signal::SIGINT)?;

        match timeout(FINALIZE_TIMEOUT, child.wait()).await {
            Ok(Ok(status)) if finalized_cleanly(status) => {
                debug!(path = %self.output.display(), "ffmpeg finalized recording");
                Ok(())
            }
            Ok(Ok(status)) => {
                let message = FfmpegRecorder::last_error_line(&mut child).await;
                Err(RecordingError::FinalizeFailed(format!(
                    "ffmpeg exited with {}: {}",
                    status, message
                )))
            }
            Ok(Err(e)) => Err(RecordingError::FinalizeFailed(e.to_string())),
            Err(_) => {
                let _ = child.kill().await;
                Err(RecordingError::FinalizeFailed(
                    "ffmpeg did not exit in time and was killed".to_string(),
                ))
            }
        }
    }
}

/// FFmpeg answers SIGINT by writing the trailer and exiting with 255
fn finalized_cleanly(status: ExitStatus) -> bool {
    status.success()
        || status.code() == Some(255)
        || status.signal() == Some(Signal::SIGINT as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupted_exit_counts_as_finalized() {
        assert!(finalized_cleanly(ExitStatus::from_raw(0)));
        assert!(finalized_cleanly(ExitStatus::from_raw(255 << 8)));
        assert!(finalized_cleanly(ExitStatus::from_raw(Signal::SIGINT as i32)));
    }

    #[test]
    fn error_exit_is_not_finalized() {
        assert!(!finalized_cleanly(ExitStatus::from_raw(1 << 8)));
        assert!(!finalized_cleanly(ExitStatus::from_raw(Signal::SIGKILL as i32)));
    }

    fn arg_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .map(String::as_str)
    }

    #[test]
    fn args_encode_aac_m4a() {
        let recorder = FfmpegRecorder::new("pulse", "default");
        let args = recorder.build_ffmpeg_args(
            Path::new("/rec/VOICE_a_20240101_000000.m4a"),
            RecordingFormat::AAC_M4A,
        );

        assert_eq!(arg_after(&args, "-c:a"), Some("aac"));
        assert_eq!(arg_after(&args, "-b:a"), Some("128k"));
        assert_eq!(arg_after(&args, "-ar"), Some("44100"));
        assert_eq!(arg_after(&args, "-ac"), Some("1"));
        assert_eq!(arg_after(&args, "-i"), Some("default"));
        assert_eq!(
            args.last().map(String::as_str),
            Some("/rec/VOICE_a_20240101_000000.m4a")
        );
    }

    #[test]
    fn args_use_configured_input() {
        let recorder = FfmpegRecorder::new("avfoundation", ":0");
        let args = recorder.build_ffmpeg_args(Path::new("/tmp/out.m4a"), RecordingFormat::default());

        assert_eq!(arg_after(&args, "-f"), Some("avfoundation"));
        assert_eq!(arg_after(&args, "-i"), Some(":0"));
    }

    #[test]
    fn busy_device_is_classified() {
        let err = FfmpegRecorder::classify_start_failure("Device or resource busy".into());
        assert!(matches!(err, RecordingError::DeviceBusy(_)));

        let err = FfmpegRecorder::classify_start_failure("No space left on device".into());
        assert!(matches!(err, RecordingError::StorageFailed(_)));

        let err = FfmpegRecorder::classify_start_failure("Unknown input format".into());
        assert!(matches!(err, RecordingError::StartFailed(_)));
    }

    #[tokio::test]
    #[ignore = "Requires audio hardware"]
    async fn records_a_short_clip() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("VOICE_test_20240101_000000.m4a");
        let recorder = FfmpegRecorder::default();

        let mut handle = recorder.open(&output, RecordingFormat::AAC_M4A).await.unwrap();
        sleep(Duration::from_secs(1)).await;
        handle.finish().await.unwrap();

        assert!(std::fs::metadata(&output).unwrap().len() > 0);
    }
}
