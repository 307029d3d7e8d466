//! Configuration and preference port interfaces

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Port for configuration storage
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load configuration from storage.
    ///
    /// # Returns
    /// The loaded config (may have None fields if file doesn't exist)
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Save configuration to storage, replacing the previous file in one step.
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    /// Get the configuration file path.
    fn path(&self) -> PathBuf;

    /// Check if configuration file exists.
    fn exists(&self) -> bool;

    /// Initialize configuration file with defaults.
    /// Fails if file already exists.
    async fn init(&self) -> Result<(), ConfigError>;
}

/// Port for the durable auto-call-recording flag.
///
/// Read by the call-state listener on every event and written only by the
/// explicit toggle.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn auto_call_enabled(&self) -> Result<bool, ConfigError>;

    async fn set_auto_call_enabled(&self, enabled: bool) -> Result<(), ConfigError>;
}
