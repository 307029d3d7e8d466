//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::telephony::CallState;

/// Call Recorder - voice memos and automatic phone-call recording
#[derive(Parser, Debug)]
#[command(name = "call-recorder")]
#[command(version)]
#[command(about = "Record voice memos and phone calls, then browse and play them back")]
#[command(long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Run as daemon (control via the other subcommands)
    #[arg(long)]
    pub daemon: bool,

    /// Directory recordings are written to and listed from
    #[arg(long, value_name = "DIR", global = true)]
    pub recordings_dir: Option<String>,

    /// Config file to use instead of the XDG location
    #[arg(long, value_name = "FILE", env = "CALL_RECORDER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Do not post desktop notifications while recording
    #[arg(long, requires = "daemon")]
    pub no_notify: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start or stop a voice recording
    Record {
        #[command(subcommand)]
        action: RecordAction,
    },
    /// Turn automatic call recording on or off
    AutoCall {
        #[arg(value_enum)]
        state: Switch,
    },
    /// Play a recording (stops any other playback)
    Play {
        /// Recording file
        path: PathBuf,
        /// Stop instead if this file is already playing
        #[arg(long)]
        toggle: bool,
    },
    /// Stop playback
    StopPlayback,
    /// Delete a recording
    Delete {
        /// Recording file
        path: PathBuf,
    },
    /// List recordings, newest first
    List,
    /// Show recorder status
    Status,
    /// Report a phone state change to the daemon
    PhoneState {
        #[arg(value_enum)]
        state: CallStateArg,
        /// Caller number
        #[arg(long, value_name = "NUMBER")]
        number: Option<String>,
    },
    /// Show permission status
    Permissions {
        /// Open the settings location for blocked permissions
        #[arg(long)]
        open_settings: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Voice recording actions
#[derive(Subcommand, Debug)]
pub enum RecordAction {
    /// Start recording
    Start {
        /// Title used in the file name
        #[arg(short, long)]
        title: String,
    },
    /// Stop recording
    Stop,
}

/// On/off argument
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub fn enabled(self) -> bool {
        self == Switch::On
    }
}

/// Phone state argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CallStateArg {
    Ringing,
    Offhook,
    Idle,
}

impl From<CallStateArg> for CallState {
    fn from(arg: CallStateArg) -> Self {
        match arg {
            CallStateArg::Ringing => CallState::Ringing,
            CallStateArg::Offhook => CallState::Offhook,
            CallStateArg::Idle => CallState::Idle,
        }
    }
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Parsed daemon options
#[derive(Debug, Clone)]
pub struct DaemonOptions {
    pub recordings_dir: PathBuf,
    pub notify: bool,
    pub input_format: String,
    pub input_device: String,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "auto_call_recording",
    "recordings_dir",
    "notify",
    "audio.input_format",
    "audio.input_device",
    "permissions.microphone",
    "permissions.phone_state",
    "permissions.notifications",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
