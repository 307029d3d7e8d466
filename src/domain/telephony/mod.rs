//! Telephony state events

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::InvalidCallStateError;
use crate::domain::recording::UNKNOWN_CALLER;

/// Phone state reported by the telephony subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallState {
    /// Incoming call is ringing
    Ringing,
    /// A call is active (answered or dialed)
    Offhook,
    /// No call, or the call ended
    Idle,
}

impl CallState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ringing => "ringing",
            Self::Offhook => "offhook",
            Self::Idle => "idle",
        }
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CallState {
    type Err = InvalidCallStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "ringing" => Ok(Self::Ringing),
            "offhook" => Ok(Self::Offhook),
            "idle" => Ok(Self::Idle),
            _ => Err(InvalidCallStateError {
                input: s.to_string(),
            }),
        }
    }
}

/// One phone state transition with the optional caller number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelephonyEvent {
    pub state: CallState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

impl TelephonyEvent {
    /// Create an event
    pub fn new(state: CallState, number: Option<String>) -> Self {
        Self { state, number }
    }

    pub fn ringing() -> Self {
        Self::new(CallState::Ringing, None)
    }

    pub fn offhook(number: Option<&str>) -> Self {
        Self::new(CallState::Offhook, number.map(str::to_string))
    }

    pub fn idle() -> Self {
        Self::new(CallState::Idle, None)
    }

    /// Caller number, or `Unknown` when missing or blank
    pub fn caller(&self) -> &str {
        self.number
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(UNKNOWN_CALLER)
    }
}
