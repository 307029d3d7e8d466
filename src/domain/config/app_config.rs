//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::permission::Capability;

/// Default FFmpeg input format for the current platform
#[cfg(target_os = "macos")]
pub const DEFAULT_INPUT_FORMAT: &str = "avfoundation";
#[cfg(not(target_os = "macos"))]
pub const DEFAULT_INPUT_FORMAT: &str = "pulse";

/// Default FFmpeg input device for the current platform
#[cfg(target_os = "macos")]
pub const DEFAULT_INPUT_DEVICE: &str = ":0";
#[cfg(not(target_os = "macos"))]
pub const DEFAULT_INPUT_DEVICE: &str = "default";

/// Capture device configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioConfig {
    pub input_format: Option<String>,
    pub input_device: Option<String>,
}

/// Per-capability consent recorded by the user.
/// `false` marks a capability as blocked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionsConfig {
    pub microphone: Option<bool>,
    pub phone_state: Option<bool>,
    pub notifications: Option<bool>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub auto_call_recording: Option<bool>,
    pub recordings_dir: Option<String>,
    pub notify: Option<bool>,
    pub audio: Option<AudioConfig>,
    pub permissions: Option<PermissionsConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            auto_call_recording: Some(false),
            recordings_dir: Some(default_recordings_dir().to_string_lossy().to_string()),
            notify: Some(true),
            audio: Some(AudioConfig {
                input_format: Some(DEFAULT_INPUT_FORMAT.to_string()),
                input_device: Some(DEFAULT_INPUT_DEVICE.to_string()),
            }),
            permissions: None,
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            auto_call_recording: other.auto_call_recording.or(self.auto_call_recording),
            recordings_dir: other.recordings_dir.or(self.recordings_dir),
            notify: other.notify.or(self.notify),
            audio: Self::merge_audio_config(self.audio, other.audio),
            permissions: Self::merge_permissions_config(self.permissions, other.permissions),
        }
    }

    fn merge_audio_config(base: Option<AudioConfig>, other: Option<AudioConfig>) -> Option<AudioConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(AudioConfig {
                input_format: o.input_format.or(b.input_format),
                input_device: o.input_device.or(b.input_device),
            }),
        }
    }

    fn merge_permissions_config(
        base: Option<PermissionsConfig>,
        other: Option<PermissionsConfig>,
    ) -> Option<PermissionsConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(PermissionsConfig {
                microphone: o.microphone.or(b.microphone),
                phone_state: o.phone_state.or(b.phone_state),
                notifications: o.notifications.or(b.notifications),
            }),
        }
    }

    /// Get the auto-call-recording preference, or false if not set
    pub fn auto_call_recording_or_default(&self) -> bool {
        self.auto_call_recording.unwrap_or(false)
    }

    /// Get notify setting, or true if not set
    pub fn notify_or_default(&self) -> bool {
        self.notify.unwrap_or(true)
    }

    /// Get the recordings directory, or the platform default if not set.
    /// Relative paths are resolved against the working directory.
    pub fn recordings_dir_or_default(&self) -> PathBuf {
        let dir = self
            .recordings_dir
            .as_deref()
            .map(expand_home)
            .unwrap_or_else(default_recordings_dir);
        std::path::absolute(&dir).unwrap_or(dir)
    }

    /// Get the FFmpeg input format, or the platform default if not set
    pub fn input_format_or_default(&self) -> &str {
        self.audio
            .as_ref()
            .and_then(|a| a.input_format.as_deref())
            .unwrap_or(DEFAULT_INPUT_FORMAT)
    }

    /// Get the FFmpeg input device, or the platform default if not set
    pub fn input_device_or_default(&self) -> &str {
        self.audio
            .as_ref()
            .and_then(|a| a.input_device.as_deref())
            .unwrap_or(DEFAULT_INPUT_DEVICE)
    }

    /// Recorded consent for a capability, if the user set one
    pub fn permission_override(&self, capability: Capability) -> Option<bool> {
        let permissions = self.permissions.as_ref()?;
        match capability {
            Capability::Microphone => permissions.microphone,
            Capability::PhoneState => permissions.phone_state,
            Capability::PostNotifications => permissions.notifications,
        }
    }
}

/// `<audio dir>/Recordings`, falling back to the data dir
pub fn default_recordings_dir() -> PathBuf {
    dirs::audio_dir()
        .map(|d| d.join("Recordings"))
        .or_else(|| dirs::data_dir().map(|d| d.join("call-recorder").join("Recordings")))
        .unwrap_or_else(|| PathBuf::from("Recordings"))
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = AppConfig::empty();
        assert!(!config.auto_call_recording_or_default());
        assert!(config.notify_or_default());
        assert_eq!(config.input_format_or_default(), DEFAULT_INPUT_FORMAT);
        assert_eq!(config.input_device_or_default(), DEFAULT_INPUT_DEVICE);
        assert_eq!(config.permission_override(Capability::Microphone), None);
    }

    #[test]
    fn merge_prefers_other() {
        let base = AppConfig {
            auto_call_recording: Some(true),
            recordings_dir: Some("/a".to_string()),
            ..Default::default()
        };
        let other = AppConfig {
            recordings_dir: Some("/b".to_string()),
            notify: Some(false),
            ..Default::default()
        };

        let merged = base.merge(other);
        assert_eq!(merged.auto_call_recording, Some(true));
        assert_eq!(merged.recordings_dir, Some("/b".to_string()));
        assert_eq!(merged.notify, Some(false));
    }

    #[test]
    fn merge_nested_sections() {
        let base = AppConfig {
            audio: Some(AudioConfig {
                input_format: Some("alsa".to_string()),
                input_device: Some("hw:0".to_string()),
            }),
            permissions: Some(PermissionsConfig {
                microphone: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };
        let other = AppConfig {
            audio: Some(AudioConfig {
                input_device: Some("hw:1".to_string()),
                ..Default::default()
            }),
            permissions: Some(PermissionsConfig {
                notifications: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        };

        let merged = base.merge(other);
        assert_eq!(merged.input_format_or_default(), "alsa");
        assert_eq!(merged.input_device_or_default(), "hw:1");
        assert_eq!(merged.permission_override(Capability::Microphone), Some(true));
        assert_eq!(
            merged.permission_override(Capability::PostNotifications),
            Some(false)
        );
    }

    #[test]
    fn recordings_dir_from_config() {
        let config = AppConfig {
            recordings_dir: Some("/srv/rec".to_string()),
            ..Default::default()
        };
        assert_eq!(config.recordings_dir_or_default(), PathBuf::from("/srv/rec"));
    }

    #[test]
    fn relative_recordings_dir_is_made_absolute() {
        let config = AppConfig {
            recordings_dir: Some("rec".to_string()),
            ..Default::default()
        };
        let dir = config.recordings_dir_or_default();
        assert!(dir.is_absolute());
        assert_eq!(dir, std::env::current_dir().unwrap().join("rec"));
    }

    #[test]
    fn defaults_disable_auto_call() {
        let config = AppConfig::defaults();
        assert_eq!(config.auto_call_recording, Some(false));
        assert!(config.recordings_dir.is_some());
    }
}
