//! Configuration value objects

mod app_config;

pub use app_config::{
    default_recordings_dir, AppConfig, AudioConfig, PermissionsConfig, DEFAULT_INPUT_DEVICE,
    DEFAULT_INPUT_FORMAT,
};
