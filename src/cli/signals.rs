//! Signal handling for daemon mode

use colored::Colorize;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::{mpsc, oneshot};

use super::ipc::{Request, Response};

/// Daemon signals
#[derive(Debug)]
pub enum DaemonSignal {
    /// Client request, answered through `reply`
    Command {
        request: Request,
        reply: oneshot::Sender<Response>,
    },
    /// Shutdown daemon (SIGINT/SIGTERM)
    Shutdown,
}

impl DaemonSignal {
    pub fn is_shutdown(&self) -> bool {
        matches!(self, DaemonSignal::Shutdown)
    }
}

/// Daemon signal handler
///
/// Handles OS shutdown signals (SIGINT/SIGTERM) and provides a channel
/// for receiving daemon commands from other sources (e.g., socket server).
pub struct DaemonSignalHandler {
    receiver: mpsc::Receiver<DaemonSignal>,
}

impl DaemonSignalHandler {
    /// Create a new daemon signal handler and start listening for shutdown signals.
    ///
    /// Returns the handler and a sender the socket server uses to forward requests.
    pub async fn new() -> Result<(Self, mpsc::Sender<DaemonSignal>), std::io::Error> {
        let (tx, rx) = mpsc::channel(10);

        let tx_int = tx.clone();
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::spawn(async move {
            sigint.recv().await;
            eprintln!("{} Received SIGINT (shutdown)", "↓".cyan());
            let _ = tx_int.send(DaemonSignal::Shutdown).await;
        });

        let tx_term = tx.clone();
        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::spawn(async move {
            sigterm.recv().await;
            eprintln!("{} Received SIGTERM (shutdown)", "↓".cyan());
            let _ = tx_term.send(DaemonSignal::Shutdown).await;
        });

        Ok((Self { receiver: rx }, tx))
    }

    /// Wait for the next signal
    pub async fn recv(&mut self) -> Option<DaemonSignal> {
        self.receiver.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Command;

    #[test]
    fn only_shutdown_is_shutdown() {
        let (reply, _rx) = oneshot::channel();
        let command = DaemonSignal::Command {
            request: Command::Status,
            reply,
        };
        assert!(!command.is_shutdown());
        assert!(DaemonSignal::Shutdown.is_shutdown());
    }
}
