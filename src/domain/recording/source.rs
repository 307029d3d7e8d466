//! Recording source attribution

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a recording session captures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Manual microphone recording started by the user
    Voice,
    /// Recording started automatically when a call became active
    Call,
}

impl SourceType {
    /// File name prefix for this source
    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::Voice => "VOICE",
            Self::Call => "CALL",
        }
    }

    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Voice => "voice",
            Self::Call => "call",
        }
    }

    /// Look up the source for a file name prefix
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "VOICE" => Some(Self::Voice),
            "CALL" => Some(Self::Call),
            _ => None,
        }
    }

    /// All sources, in prefix-matching order
    pub const fn all() -> &'static [SourceType] {
        &[Self::Voice, Self::Call]
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes() {
        assert_eq!(SourceType::Voice.prefix(), "VOICE");
        assert_eq!(SourceType::Call.prefix(), "CALL");
    }

    #[test]
    fn from_prefix_is_exact() {
        assert_eq!(SourceType::from_prefix("VOICE"), Some(SourceType::Voice));
        assert_eq!(SourceType::from_prefix("CALL"), Some(SourceType::Call));
        assert_eq!(SourceType::from_prefix("voice"), None);
        assert_eq!(SourceType::from_prefix("MEMO"), None);
    }

    #[test]
    fn serde_uses_lowercase() {
        let json = serde_json::to_string(&SourceType::Call).unwrap();
        assert_eq!(json, "\"call\"");
    }
}
