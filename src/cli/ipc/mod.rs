//! IPC (Inter-Process Communication) module for daemon control
//!
//! Unix Domain Sockets carrying one JSON request line and one JSON
//! response line per connection.

mod unix_socket;

pub use unix_socket::{SocketPath, UnixSocketClient, UnixSocketServer};

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::application::{AppError, Command, CommandOutcome};

/// Per-user runtime directory shared by the socket and the daemon lock:
/// `$XDG_RUNTIME_DIR`, else the temp dir
pub fn runtime_dir() -> PathBuf {
    std::env::var_os("XDG_RUNTIME_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
}

/// Request sent by a client
pub type Request = Command;

/// Reply sent by the daemon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Ok {
        #[serde(flatten)]
        outcome: CommandOutcome,
    },
    Error {
        message: String,
        /// The user can fix this in the settings location
        #[serde(default)]
        settings_hint: bool,
    },
}

impl Response {
    pub fn from_result(result: Result<CommandOutcome, AppError>) -> Self {
        match result {
            Ok(outcome) => Self::Ok { outcome },
            Err(e) => Self::Error {
                message: e.to_string(),
                settings_hint: e.needs_settings(),
            },
        }
    }

    /// Encode as one line
    pub fn to_line(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => format!("{}\n", json),
            Err(e) => format!(
                "{{\"status\":\"error\",\"message\":\"Failed to encode response: {}\"}}\n",
                e
            ),
        }
    }
}

/// Parse a request line
pub fn parse_request(line: &str) -> io::Result<Request> {
    serde_json::from_str(line.trim()).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Parse a response line
pub fn parse_response(line: &str) -> io::Result<Response> {
    serde_json::from_str(line.trim()).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Create the IPC client for the current platform
pub fn create_ipc_client() -> UnixSocketClient {
    UnixSocketClient::new(SocketPath::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::permission::{Capability, PermissionStatus};
    use crate::domain::telephony::TelephonyEvent;

    #[test]
    fn request_round_trips_through_line() {
        let line = serde_json::to_string(&Command::PhoneState {
            event: TelephonyEvent::offhook(Some("+1")),
        })
        .unwrap();
        assert_eq!(
            parse_request(&line).unwrap(),
            Command::PhoneState {
                event: TelephonyEvent::offhook(Some("+1"))
            }
        );
    }

    #[test]
    fn garbage_request_is_invalid_data() {
        let err = parse_request("toggle").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn error_response_carries_settings_hint() {
        let response = Response::from_result(Err(AppError::PermissionDenied {
            capability: Capability::Microphone,
            status: PermissionStatus::Blocked,
        }));
        let line = response.to_line();
        assert!(line.ends_with('\n'));
        assert_eq!(parse_response(&line).unwrap(), response);
        assert!(matches!(
            response,
            Response::Error {
                settings_hint: true,
                ..
            }
        ));
    }

    #[test]
    fn ok_response_flattens_outcome() {
        let response = Response::from_result(Ok(CommandOutcome::AutoCall { enabled: true }));
        let line = response.to_line();
        assert!(line.contains("\"status\":\"ok\""));
        assert!(line.contains("\"outcome\":\"auto_call\""));
        assert_eq!(parse_response(&line).unwrap(), response);
    }
}
