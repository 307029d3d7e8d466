//! Domain error types

use thiserror::Error;

/// Error when a voice recording is started without a usable title
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Recording title must not be empty")]
pub struct EmptyTitleError;

/// Error when parsing a telephony state string
#[derive(Debug, Clone, Error)]
#[error("Invalid call state: \"{input}\". Expected one of: ringing, offhook, idle")]
pub struct InvalidCallStateError {
    pub input: String,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_state_error_names_input() {
        let err = InvalidCallStateError {
            input: "dialing".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("dialing"));
        assert!(msg.contains("offhook"));
    }

    #[test]
    fn config_validation_error_display() {
        let err = ConfigError::ValidationError {
            key: "notify".to_string(),
            message: "Value must be 'true' or 'false'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid config value for 'notify': Value must be 'true' or 'false'"
        );
    }
}
