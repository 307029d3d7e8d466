//! Permission port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::permission::{Capability, PermissionStatus};

/// Permission subsystem errors
#[derive(Debug, Clone, Error)]
pub enum PermissionError {
    #[error("Failed to open settings: {0}")]
    SettingsUnavailable(String),
}

/// Port for the operating system consent subsystem
#[async_trait]
pub trait PermissionProvider: Send + Sync {
    /// Current status without prompting
    async fn check(&self, capability: Capability) -> PermissionStatus;

    /// Ask for the capability. Only meaningful when `check` returned `Denied`.
    async fn request(&self, capability: Capability) -> PermissionStatus;

    /// Open the place where a blocked capability can be re-enabled
    fn open_settings(&self) -> Result<(), PermissionError>;
}
