//! CLI presenter for output formatting

use colored::*;

use crate::application::{AppError, CommandOutcome, StatusReport};
use crate::domain::library::RecordingFileEntry;
use crate::domain::permission::{Capability, PermissionStatus};
use crate::domain::recording::RecordingSession;

/// Presenter for CLI output formatting
#[derive(Debug, Default)]
pub struct Presenter;

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print daemon status
    pub fn daemon_status(&self, state: &str) {
        eprintln!("{} Daemon: {}", "●".cyan(), state);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Report a command error, with the settings hint for blocked permissions
    pub fn app_error(&self, error: &AppError) {
        self.error(&error.to_string());
        if error.needs_settings() {
            self.info("Enable it again with: call-recorder permissions --open-settings");
        }
    }

    /// One listing line: modification time, then file name
    pub fn format_entry(entry: &RecordingFileEntry) -> String {
        let when = entry.modified_local().format("%Y-%m-%d %H:%M:%S");
        match entry.details() {
            Some(details) => format!(
                "{}  {:<5} {:<24} {}",
                when,
                details.source().prefix(),
                details.title().unwrap_or("-"),
                entry.name
            ),
            None => format!("{}  {}", when, entry.name),
        }
    }

    /// Print the recordings listing
    pub fn recordings(&self, entries: &[RecordingFileEntry]) {
        if entries.is_empty() {
            self.info("No recordings yet");
            return;
        }
        for entry in entries {
            self.output(&Self::format_entry(entry));
        }
    }

    fn session_line(session: &RecordingSession) -> String {
        format!(
            "{} recording \"{}\" since {} -> {}",
            session.source,
            session.title,
            session.started_at.format("%H:%M:%S"),
            session.output_path.display()
        )
    }

    /// Print a status report
    pub fn status(&self, report: &StatusReport) {
        self.key_value("state", report.state.as_str());
        if let Some(session) = &report.session {
            self.key_value("session", &Self::session_line(session));
        }
        self.key_value(
            "auto_call_recording",
            if report.auto_call { "on" } else { "off" },
        );
        self.key_value(
            "playing",
            &report
                .playing
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(none)".to_string()),
        );
        self.key_value("recordings_dir", &report.recordings_dir.display().to_string());
    }

    /// Print one permission line
    pub fn permission(&self, capability: Capability, status: PermissionStatus) {
        let status_text = match status {
            PermissionStatus::Granted => status.as_str().green(),
            PermissionStatus::Denied => status.as_str().yellow(),
            PermissionStatus::Blocked | PermissionStatus::Unavailable => status.as_str().red(),
        };
        println!("{}: {}", capability.as_str().cyan(), status_text);
    }

    /// Print the result of a daemon command
    pub fn outcome(&self, outcome: &CommandOutcome) {
        match outcome {
            CommandOutcome::Started { session } => {
                self.success(&format!("Recording to {}", session.output_path.display()));
            }
            CommandOutcome::Stopped { session: Some(session) } => {
                self.success(&format!("Saved {}", session.output_path.display()));
            }
            CommandOutcome::Stopped { session: None } => self.info("Not recording"),
            CommandOutcome::AutoCall { enabled } => self.success(&format!(
                "Auto call recording {}",
                if *enabled { "enabled" } else { "disabled" }
            )),
            CommandOutcome::Playing { path } => {
                self.success(&format!("Playing {}", path.display()));
            }
            CommandOutcome::PlaybackStopped { path: Some(path) } => {
                self.success(&format!("Stopped {}", path.display()));
            }
            CommandOutcome::PlaybackStopped { path: None } => self.info("Nothing playing"),
            CommandOutcome::Deleted { path, .. } => {
                self.success(&format!("Deleted {}", path.display()));
            }
            CommandOutcome::Recordings { entries } => self.recordings(entries),
            CommandOutcome::Status(report) => self.status(report),
            CommandOutcome::PhoneStateQueued { accepted: true } => self.info("Phone state sent"),
            CommandOutcome::PhoneStateQueued { accepted: false } => {
                self.warn("Daemon has no call-state listener running");
            }
        }
    }
}
