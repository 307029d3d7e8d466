//! Call Recorder CLI entry point

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use call_recorder::application::Command;
use call_recorder::cli::{
    app::{daemon_options, load_merged_config, run_list, run_permissions, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands, RecordAction},
    config_cmd::handle_config_command,
    daemon_app::run_daemon,
    daemon_cmd::handle_client_command,
    presenter::Presenter,
};
use call_recorder::domain::config::AppConfig;
use call_recorder::domain::telephony::TelephonyEvent;
use call_recorder::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.daemon);
    let presenter = Presenter::new();

    let store = match cli.config.clone() {
        Some(path) => XdgConfigStore::with_path(path),
        None => XdgConfigStore::new(),
    };

    // Config management works on the raw file
    if let Some(Commands::Config { action }) = cli.command {
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    // Build CLI config from args
    let cli_config = AppConfig {
        recordings_dir: cli.recordings_dir.clone(),
        notify: if cli.no_notify { Some(false) } else { None },
        ..Default::default()
    };
    let config = load_merged_config(&store, cli_config).await;
    let recordings_dir = config.recordings_dir_or_default();

    let command = match cli.command {
        Some(Commands::Config { .. }) => return ExitCode::SUCCESS,
        Some(Commands::List) => return finish(run_list(&config, &presenter).await, &presenter),
        Some(Commands::Permissions { open_settings }) => {
            return finish(
                run_permissions(&config, &store, open_settings, &presenter).await,
                &presenter,
            )
        }
        Some(Commands::Record { action }) => match action {
            RecordAction::Start { title } => {
                if title.trim().is_empty() {
                    presenter.error("Recording title must not be empty");
                    return ExitCode::from(EXIT_USAGE_ERROR);
                }
                Command::StartVoice { title }
            }
            RecordAction::Stop => Command::StopVoice,
        },
        Some(Commands::AutoCall { state }) => Command::SetAutoCall {
            enabled: state.enabled(),
        },
        Some(Commands::Play { path, toggle }) => {
            let path = resolve_recording_path(&path, &recordings_dir);
            if toggle {
                Command::TogglePlay { path }
            } else {
                Command::Play { path }
            }
        }
        Some(Commands::StopPlayback) => Command::StopPlayback,
        Some(Commands::Delete { path }) => Command::Delete {
            path: resolve_recording_path(&path, &recordings_dir),
        },
        Some(Commands::Status) => Command::Status,
        Some(Commands::PhoneState { state, number }) => Command::PhoneState {
            event: TelephonyEvent::new(state.into(), number),
        },
        None if cli.daemon => {
            return run_daemon(daemon_options(&config), config, cli.config).await;
        }
        None => {
            presenter.error("Nothing to do. Run with --daemon or a subcommand");
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    finish(handle_client_command(command, &presenter).await, &presenter)
}

/// Log to stderr; the daemon defaults to info, client commands to warn
fn init_tracing(daemon: bool) {
    let default_level = if daemon { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Bare file names refer to the recordings directory; other relative
/// paths are taken from the working directory, since the daemon has its own.
fn resolve_recording_path(path: &Path, recordings_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let bare_name = path.parent().map_or(true, |p| p.as_os_str().is_empty());
    if bare_name && !path.exists() {
        return recordings_dir.join(path);
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn finish(result: Result<(), String>, presenter: &Presenter) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            presenter.error(&e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
