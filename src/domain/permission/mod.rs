//! Capabilities and consent status

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operating system capability the recorder needs consent for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Microphone,
    PhoneState,
    PostNotifications,
}

impl Capability {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Microphone => "microphone",
            Self::PhoneState => "phone_state",
            Self::PostNotifications => "notifications",
        }
    }

    /// Human readable name for messages
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Microphone => "Microphone",
            Self::PhoneState => "Phone state",
            Self::PostNotifications => "Notifications",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Consent status for one capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    /// Access allowed
    Granted,
    /// Not granted yet; a request may still succeed
    Denied,
    /// Permanently denied; only the settings screen can change it
    Blocked,
    /// The capability does not exist on this device
    Unavailable,
}

impl PermissionStatus {
    pub const fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }

    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
            Self::Blocked => "blocked",
            Self::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
