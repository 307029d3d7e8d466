//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Keys owned by the daemon; they can be read here but only changed through
/// their permission-checked command
const READ_ONLY_KEYS: &[(&str, &str)] =
    &[("auto_call_recording", "call-recorder auto-call on|off")];

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore + ?Sized>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore + ?Sized>(
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore + ?Sized>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    validate_key(key)?;

    let mut config = store.load().await?;
    set_value(&mut config, key, value)?;

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore + ?Sized>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    validate_key(key)?;

    let config = store.load().await?;
    match get_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output(NOT_SET),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore + ?Sized>(
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = get_value(&config, key);
        presenter.key_value(key, value.as_deref().unwrap_or(NOT_SET));
    }

    Ok(())
}

fn handle_path<S: ConfigStore + ?Sized>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn validate_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        })
    }
}

/// Read one key as display text
fn get_value(config: &AppConfig, key: &str) -> Option<String> {
    let audio = config.audio.as_ref();
    let permissions = config.permissions.as_ref();
    match key {
        "auto_call_recording" => config.auto_call_recording.map(|b| b.to_string()),
        "recordings_dir" => config.recordings_dir.clone(),
        "notify" => config.notify.map(|b| b.to_string()),
        "audio.input_format" => audio.and_then(|a| a.input_format.clone()),
        "audio.input_device" => audio.and_then(|a| a.input_device.clone()),
        "permissions.microphone" => permissions.and_then(|p| p.microphone).map(|b| b.to_string()),
        "permissions.phone_state" => permissions.and_then(|p| p.phone_state).map(|b| b.to_string()),
        "permissions.notifications" => permissions
            .and_then(|p| p.notifications)
            .map(|b| b.to_string()),
        _ => None,
    }
}

/// Validate and store one key
fn set_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    if let Some((_, command)) = READ_ONLY_KEYS.iter().find(|(k, _)| *k == key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Read-only here. Use '{}' instead", command),
        });
    }
    match key {
        "recordings_dir" => {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    key: key.to_string(),
                    message: "Directory must not be empty".to_string(),
                });
            }
            config.recordings_dir = Some(value.to_string());
        }
        "notify" => config.notify = Some(bool_value(key, value)?),
        "audio.input_format" => {
            config.audio.get_or_insert_with(Default::default).input_format = Some(value.to_string())
        }
        "audio.input_device" => {
            config.audio.get_or_insert_with(Default::default).input_device = Some(value.to_string())
        }
        "permissions.microphone" => {
            let parsed = bool_value(key, value)?;
            config.permissions.get_or_insert_with(Default::default).microphone = Some(parsed);
        }
        "permissions.phone_state" => {
            let parsed = bool_value(key, value)?;
            config.permissions.get_or_insert_with(Default::default).phone_state = Some(parsed);
        }
        "permissions.notifications" => {
            let parsed = bool_value(key, value)?;
            config.permissions.get_or_insert_with(Default::default).notifications = Some(parsed);
        }
        _ => return validate_key(key),
    }
    Ok(())
}

fn bool_value(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value).map_err(|_| ConfigError::ValidationError {
        key: key.to_string(),
        message: "Value must be 'true' or 'false'".to_string(),
    })
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::XdgConfigStore;

    #[test]
    fn parse_bool_values() {
        assert_eq!(parse_bool("true"), Ok(true));
        assert_eq!(parse_bool("false"), Ok(false));
        assert_eq!(parse_bool("yes"), Ok(true));
        assert_eq!(parse_bool("no"), Ok(false));
        assert_eq!(parse_bool("1"), Ok(true));
        assert_eq!(parse_bool("0"), Ok(false));
        assert_eq!(parse_bool("On"), Ok(true));
        assert!(parse_bool("invalid").is_err());
    }

    #[test]
    fn set_nested_keys_creates_sections() {
        let mut config = AppConfig::empty();
        set_value(&mut config, "audio.input_device", "hw:1").unwrap();
        set_value(&mut config, "permissions.phone_state", "false").unwrap();

        assert_eq!(get_value(&config, "audio.input_device").as_deref(), Some("hw:1"));
        assert_eq!(get_value(&config, "audio.input_format"), None);
        assert_eq!(
            get_value(&config, "permissions.phone_state").as_deref(),
            Some("false")
        );
    }

    #[test]
    fn set_rejects_non_bool() {
        let mut config = AppConfig::empty();
        let err = set_value(&mut config, "notify", "maybe").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
        assert_eq!(config.notify, None);
    }

    #[test]
    fn set_rejects_blank_directory() {
        let mut config = AppConfig::empty();
        assert!(set_value(&mut config, "recordings_dir", "  ").is_err());
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(validate_key("api_key").is_err());
        assert!(validate_key("notify").is_ok());
    }

    #[test]
    fn every_listed_key_is_settable() {
        let mut config = AppConfig::empty();
        let writable = VALID_CONFIG_KEYS
            .iter()
            .filter(|key| !READ_ONLY_KEYS.iter().any(|(k, _)| k == *key));
        for key in writable {
            let value = if key.starts_with("audio.") || *key == "recordings_dir" {
                "x"
            } else {
                "true"
            };
            set_value(&mut config, key, value).unwrap();
            assert!(get_value(&config, key).is_some(), "{key} not readable");
        }
    }

    #[tokio::test]
    async fn set_persists_through_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));
        let presenter = Presenter::new();

        handle_config_command(
            ConfigAction::Set {
                key: "notify".to_string(),
                value: "no".to_string(),
            },
            &store,
            &presenter,
        )
        .await
        .unwrap();

        assert_eq!(store.load().await.unwrap().notify, Some(false));
    }

    #[tokio::test]
    async fn auto_call_cannot_be_set_directly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let store = XdgConfigStore::with_path(path.clone());
        let presenter = Presenter::new();

        let err = handle_config_command(
            ConfigAction::Set {
                key: "auto_call_recording".to_string(),
                value: "true".to_string(),
            },
            &store,
            &presenter,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("auto-call on|off"));
        assert!(!path.exists());
        assert!(validate_key("auto_call_recording").is_ok());
    }
}
