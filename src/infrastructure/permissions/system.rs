//! Desktop permission adapter
//!
//! Desktops have no consent prompt for these capabilities. The microphone
//! is available when the default host has an input device, and the user
//! can block any capability with `permissions.<name> = false` in the
//! config file, which is also the settings location opened for them.

use std::path::PathBuf;

use async_trait::async_trait;
use cpal::traits::HostTrait;
use tracing::debug;

use crate::application::ports::{PermissionError, PermissionProvider};
use crate::domain::config::AppConfig;
use crate::domain::permission::{Capability, PermissionStatus};

/// Reports whether a capture device exists
pub type DeviceCheck = fn() -> bool;

/// Permission provider backed by the config file and the audio host
pub struct SystemPermissions {
    config: AppConfig,
    settings_path: PathBuf,
    has_input_device: DeviceCheck,
}

impl SystemPermissions {
    pub fn new(config: AppConfig, settings_path: impl Into<PathBuf>) -> Self {
        Self {
            config,
            settings_path: settings_path.into(),
            has_input_device: default_input_present,
        }
    }

    /// Replace the microphone presence check
    pub fn with_device_check(mut self, check: DeviceCheck) -> Self {
        self.has_input_device = check;
        self
    }

    async fn microphone_present(&self) -> bool {
        let check = self.has_input_device;
        // cpal enumerates devices synchronously
        tokio::task::spawn_blocking(check).await.unwrap_or(false)
    }
}

fn default_input_present() -> bool {
    cpal::default_host().default_input_device().is_some()
}

#[async_trait]
impl PermissionProvider for SystemPermissions {
    async fn check(&self, capability: Capability) -> PermissionStatus {
        if self.config.permission_override(capability) == Some(false) {
            return PermissionStatus::Blocked;
        }
        let status = match capability {
            Capability::Microphone if !self.microphone_present().await => {
                PermissionStatus::Unavailable
            }
            _ => PermissionStatus::Granted,
        };
        debug!(capability = %capability, status = %status, "Permission checked");
        status
    }

    async fn request(&self, capability: Capability) -> PermissionStatus {
        self.check(capability).await
    }

    fn open_settings(&self) -> Result<(), PermissionError> {
        open::that(&self.settings_path).map_err(|e| {
            PermissionError::SettingsUnavailable(format!(
                "{}: {}",
                self.settings_path.display(),
                e
            ))
        })
    }
}
