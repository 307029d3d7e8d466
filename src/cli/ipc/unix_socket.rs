//! Unix Domain Socket communication for daemon control
//!
//! Used on Linux and macOS.

use std::io;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::{parse_request, parse_response, runtime_dir, Request, Response};
use crate::cli::signals::DaemonSignal;

const SOCKET_NAME: &str = "call-recorder.sock";

/// Longest request line the daemon reads
const MAX_REQUEST_BYTES: u64 = 64 * 1024;

/// Socket path resolver
#[derive(Debug, Clone)]
pub struct SocketPath {
    path: PathBuf,
}

impl SocketPath {
    /// Create socket path, preferring XDG_RUNTIME_DIR
    pub fn new() -> Self {
        Self {
            path: runtime_dir().join(SOCKET_NAME),
        }
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the socket path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if socket file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Remove socket file if it exists
    pub fn cleanup(&self) -> io::Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

impl Default for SocketPath {
    fn default() -> Self {
        Self::new()
    }
}

/// Unix Domain Socket server for daemon commands
pub struct UnixSocketServer {
    socket_path: SocketPath,
    listener: Option<UnixListener>,
}

impl UnixSocketServer {
    /// Create a new socket server
    pub fn new(socket_path: SocketPath) -> Self {
        Self {
            socket_path,
            listener: None,
        }
    }

    /// Bind to the socket
    pub fn bind(&mut self) -> io::Result<()> {
        // Remove stale socket file if it exists
        self.socket_path.cleanup()?;

        let listener = UnixListener::bind(self.socket_path.path())?;
        self.listener = Some(listener);
        Ok(())
    }

    /// Get the socket path
    pub fn path(&self) -> &Path {
        self.socket_path.path()
    }

    /// Accept connections and hand each request to the daemon loop.
    ///
    /// Requests are answered in the order the loop executes them.
    pub async fn run(&self, tx: mpsc::Sender<DaemonSignal>) -> io::Result<()> {
        let listener = self
            .listener
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "Socket not bound"))?;

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, tx).await {
                            warn!(error = %e, "Socket connection error");
                        }
                    });
                }
                Err(e) => {
                    warn!(error = %e, "Socket accept error");
                }
            }
        }
    }

    /// Cleanup socket file
    pub fn cleanup(&self) {
        let _ = self.socket_path.cleanup();
    }
}

impl Drop for UnixSocketServer {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Handle a single client connection
async fn handle_connection(stream: UnixStream, tx: mpsc::Sender<DaemonSignal>) -> io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader).take(MAX_REQUEST_BYTES);
    let mut line = String::new();

    let read = reader.read_line(&mut line).await?;
    let truncated = read as u64 >= MAX_REQUEST_BYTES && !line.ends_with('\n');

    let response = if truncated {
        warn!(bytes = read, "Oversized request rejected");
        Response::Error {
            message: format!("Request exceeds {} bytes", MAX_REQUEST_BYTES),
            settings_hint: false,
        }
    } else {
        match parse_request(&line) {
            Ok(request) => {
                debug!(?request, "Request received");
                dispatch(request, &tx).await
            }
            Err(e) => Response::Error {
                message: format!("Invalid request: {}", e),
                settings_hint: false,
            },
        }
    };

    writer.write_all(response.to_line().as_bytes()).await?;
    writer.flush().await?;

    Ok(())
}

async fn dispatch(request: Request, tx: &mpsc::Sender<DaemonSignal>) -> Response {
    let (reply_tx, reply_rx) = oneshot::channel();
    let signal = DaemonSignal::Command {
        request,
        reply: reply_tx,
    };
    if tx.send(signal).await.is_err() {
        return Response::Error {
            message: "Daemon is shutting down".to_string(),
            settings_hint: false,
        };
    }
    reply_rx.await.unwrap_or_else(|_| Response::Error {
        message: "Daemon dropped the request".to_string(),
        settings_hint: false,
    })
}

/// Unix Domain Socket client for sending commands to daemon
pub struct UnixSocketClient {
    socket_path: SocketPath,
}

impl UnixSocketClient {
    /// Create a new socket client
    pub fn new(socket_path: SocketPath) -> Self {
        Self { socket_path }
    }

    /// Check if daemon appears to be running (socket exists)
    pub fn is_daemon_running(&self) -> bool {
        self.socket_path.exists()
    }

    /// Send a request and wait for the response
    pub async fn send(&self, request: &Request) -> io::Result<Response> {
        let stream = UnixStream::connect(self.socket_path.path()).await?;
        let (reader, mut writer) = stream.into_split();

        let json = serde_json::to_string(request)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        writer.write_all(format!("{}\n", json).as_bytes()).await?;
        writer.flush().await?;

        let mut reader = BufReader::new(reader);
        let mut line = String::new();
        reader.read_line(&mut line).await?;

        parse_response(&line)
    }
}
