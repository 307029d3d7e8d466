//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, signal handling,
//! the daemon runner and its IPC client.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod daemon_app;
pub mod daemon_cmd;
pub mod ipc;
pub mod pid_file;
pub mod presenter;
pub mod signals;

// Re-export commonly used types
pub use app::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, DaemonOptions, RecordAction};
pub use daemon_app::run_daemon;
pub use daemon_cmd::handle_client_command;
pub use presenter::Presenter;
