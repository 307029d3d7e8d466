//! Local command runners and config merging

use std::sync::Arc;

use crate::application::ports::{ConfigStore, RecordingLibrary};
use crate::application::PermissionGate;
use crate::domain::config::AppConfig;
use crate::domain::permission::Capability;
use crate::infrastructure::{FsRecordingLibrary, SystemPermissions};

use super::args::DaemonOptions;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Capabilities reported by `permissions`
const REPORTED_CAPABILITIES: [Capability; 3] = [
    Capability::Microphone,
    Capability::PhoneState,
    Capability::PostNotifications,
];

/// Load and merge configuration from file and CLI
pub async fn load_merged_config<S: ConfigStore + ?Sized>(
    store: &S,
    cli_config: AppConfig,
) -> AppConfig {
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, path = %store.path().display(), "Ignoring unreadable config");
            AppConfig::empty()
        }
    };

    // Merge: defaults < file < cli
    AppConfig::defaults().merge(file_config).merge(cli_config)
}

/// Resolve daemon options from the merged config
pub fn daemon_options(config: &AppConfig) -> DaemonOptions {
    DaemonOptions {
        recordings_dir: config.recordings_dir_or_default(),
        notify: config.notify_or_default(),
        input_format: config.input_format_or_default().to_string(),
        input_device: config.input_device_or_default().to_string(),
    }
}

/// List recordings straight from the directory; no daemon needed
pub async fn run_list(config: &AppConfig, presenter: &Presenter) -> Result<(), String> {
    let library = FsRecordingLibrary::new(config.recordings_dir_or_default());
    let entries = library.list().await.map_err(|e| e.to_string())?;
    presenter.recordings(&entries);
    Ok(())
}

/// Print permission status, optionally opening the settings location
pub async fn run_permissions<S: ConfigStore + ?Sized>(
    config: &AppConfig,
    store: &S,
    open_settings: bool,
    presenter: &Presenter,
) -> Result<(), String> {
    let provider = Arc::new(SystemPermissions::new(config.clone(), store.path()));
    let gate = PermissionGate::new(provider, config.notify_or_default());

    for capability in REPORTED_CAPABILITIES {
        presenter.permission(capability, gate.query_status(capability).await);
    }

    if open_settings {
        gate.open_settings().map_err(|e| e.to_string())?;
        presenter.info(&format!("Opened {}", store.path().display()));
    }

    Ok(())
}
