//! Daemon app runner

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};

use crate::application::ports::{
    AudioPlayer, ConfigStore, PermissionProvider, PlatformRecorder, PreferenceStore,
    RecordingLibrary, SystemClock,
};
use crate::application::{
    CallStateListener, PermissionGate, PlaybackController, PlaybackEvent, RecorderService,
    RecordingConfig, RecordingController,
};
use crate::domain::config::AppConfig;
use crate::infrastructure::{
    create_notifier, FfmpegRecorder, FsRecordingLibrary, RodioPlayer, SystemPermissions,
    XdgConfigStore,
};

use super::app::{EXIT_ERROR, EXIT_SUCCESS};
use super::args::DaemonOptions;
use super::ipc::{Response, SocketPath, UnixSocketServer};
use super::pid_file::DaemonLock;
use super::presenter::Presenter;
use super::signals::{DaemonSignal, DaemonSignalHandler};

/// Queue depth for phone state events waiting on the listener
const PHONE_EVENT_QUEUE: usize = 16;

/// Run daemon mode
pub async fn run_daemon(
    options: DaemonOptions,
    config: AppConfig,
    config_path: Option<PathBuf>,
) -> ExitCode {
    let presenter = Presenter::new();

    let _lock = match DaemonLock::acquire(DaemonLock::default_path()) {
        Ok(lock) => lock,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    // Recordings directory
    let library = Arc::new(FsRecordingLibrary::new(&options.recordings_dir));
    if let Err(e) = library.ensure_directory().await {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    let store = Arc::new(match config_path {
        Some(path) => XdgConfigStore::with_path(path),
        None => XdgConfigStore::new(),
    });

    // Create adapters
    let recorder = FfmpegRecorder::new(&options.input_format, &options.input_device);
    let recording_config = RecordingConfig {
        notify: options.notify,
        ..RecordingConfig::new(&options.recordings_dir)
    };
    let mut controller = RecordingController::new(recorder, Arc::new(SystemClock), recording_config);
    if options.notify {
        controller = controller.with_notifier(create_notifier());
    }
    let controller = Arc::new(controller);
    let playback = Arc::new(PlaybackController::new(RodioPlayer::new()));

    let permissions: Arc<dyn PermissionProvider> =
        Arc::new(SystemPermissions::new(config, store.path()));
    let gate = PermissionGate::new(permissions, options.notify);

    // Call-state listener
    let (phone_tx, phone_rx) = mpsc::channel(PHONE_EVENT_QUEUE);
    let listener = CallStateListener::new(Arc::clone(&store), Arc::clone(&controller));
    tokio::spawn(listener.run(phone_rx));

    let preferences: Arc<dyn PreferenceStore> = store;
    let library: Arc<dyn RecordingLibrary> = library;
    let service = RecorderService::new(
        Arc::clone(&controller),
        Arc::clone(&playback),
        gate,
        preferences,
        library,
    )
    .with_phone_events(phone_tx);

    // Setup signal handler (returns handler + sender for socket server)
    let (mut signals, signal_tx) = match DaemonSignalHandler::new().await {
        Ok(s) => s,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    // Setup socket server
    let socket_path = SocketPath::new();
    let mut socket_server = UnixSocketServer::new(socket_path.clone());

    if let Err(e) = socket_server.bind() {
        presenter.error(&format!("Failed to bind socket: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }

    tokio::spawn(async move {
        if let Err(e) = socket_server.run(signal_tx).await {
            warn!(error = %e, "Socket server stopped");
        }
    });

    tokio::spawn(report_playback(playback.subscribe()));

    presenter.daemon_status("Started, waiting for commands...");
    presenter.info(&format!(
        "PID: {} | Socket: {} | Recordings: {} | SIGINT: exit",
        std::process::id(),
        socket_path.path().display(),
        options.recordings_dir.display()
    ));

    let result = daemon_loop(&service, &mut signals, &presenter).await;

    // Socket server and daemon lock clean up their files on drop

    if result {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}

async fn daemon_loop<R, A>(
    service: &RecorderService<R, A>,
    signals: &mut DaemonSignalHandler,
    presenter: &Presenter,
) -> bool
where
    R: PlatformRecorder,
    A: AudioPlayer,
{
    loop {
        match signals.recv().await {
            Some(DaemonSignal::Command { request, reply }) => {
                info!(?request, "Executing command");
                let before = service.controller().state().await;
                let result = service.execute(request).await;
                if let Err(e) = &result {
                    warn!(error = %e, "Command failed");
                }

                let after = service.controller().state().await;
                if before != after {
                    presenter.daemon_status(after.as_str());
                }

                // Client may have hung up
                let _ = reply.send(Response::from_result(result));
            }
            Some(DaemonSignal::Shutdown) => {
                presenter.info("Processing shutdown");
                service.shutdown().await;
                presenter.daemon_status("Shutting down...");
                return true;
            }
            None => {
                // Channel closed
                return false;
            }
        }
    }
}

async fn report_playback(mut events: broadcast::Receiver<PlaybackEvent>) {
    loop {
        match events.recv().await {
            Ok(PlaybackEvent::Completed { path }) => {
                info!(path = %path.display(), "Playback completed");
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "Playback events dropped");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
