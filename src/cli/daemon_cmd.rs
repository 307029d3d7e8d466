//! Client side of daemon commands - sends requests to the running daemon via IPC

use crate::application::Command;

use super::ipc::{create_ipc_client, Response};
use super::presenter::Presenter;

/// Send one command to the daemon and print its outcome
pub async fn handle_client_command(command: Command, presenter: &Presenter) -> Result<(), String> {
    let client = create_ipc_client();

    // Check if daemon is running
    if !client.is_daemon_running() {
        return Err("No daemon running. Start with: call-recorder --daemon".to_string());
    }

    let response = client
        .send(&command)
        .await
        .map_err(|e| format!("Failed to communicate with daemon: {}", e))?;

    match response {
        Response::Ok { outcome } => {
            presenter.outcome(&outcome);
            Ok(())
        }
        Response::Error {
            message,
            settings_hint,
        } => {
            if settings_hint {
                presenter.info("Enable it again with: call-recorder permissions --open-settings");
            }
            Err(message)
        }
    }
}
