//! Single-daemon lock
//!
//! The daemon writes its PID to `call-recorder.pid` in the runtime directory,
//! next to the IPC socket. A file whose PID no longer names a live process
//! is stale and gets replaced.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tracing::{debug, warn};

use super::ipc::runtime_dir;

const PID_FILE_NAME: &str = "call-recorder.pid";

/// Held by the running daemon; the PID file is removed on drop
#[derive(Debug)]
pub struct DaemonLock {
    path: PathBuf,
}

impl DaemonLock {
    /// Lock file location shared with the socket
    pub fn default_path() -> PathBuf {
        runtime_dir().join(PID_FILE_NAME)
    }

    /// Claim the lock at `path`
    pub fn acquire(path: impl Into<PathBuf>) -> Result<Self, DaemonLockError> {
        let path = path.into();
        if let Some(pid) = live_owner(&path) {
            return Err(DaemonLockError::AlreadyRunning(pid));
        }
        match fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "Removed stale PID file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(DaemonLockError::Io(path.display().to_string(), e)),
        }

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(DaemonLockError::Contended(path.display().to_string()));
            }
            Err(e) => return Err(DaemonLockError::Io(path.display().to_string(), e)),
        };
        writeln!(file, "{}", process::id())
            .map_err(|e| DaemonLockError::Io(path.display().to_string(), e))?;

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DaemonLock {
    fn drop(&mut self) {
        if recorded_pid(&self.path) != Some(process::id()) {
            return;
        }
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(error = %e, path = %self.path.display(), "Could not remove PID file");
        }
    }
}

/// PID written in the file at `path`, if it parses
fn recorded_pid(path: &Path) -> Option<u32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

/// PID of the live daemon holding `path`, if any
pub fn live_owner(path: &Path) -> Option<u32> {
    let pid = recorded_pid(path)?;
    let raw = i32::try_from(pid).ok()?;
    match kill(Pid::from_raw(raw), None::<Signal>) {
        // EPERM: alive but owned by another user
        Ok(()) | Err(Errno::EPERM) => Some(pid),
        Err(_) => None,
    }
}

/// Daemon lock errors
#[derive(Debug, thiserror::Error)]
pub enum DaemonLockError {
    #[error("Another daemon is already running (PID: {0})")]
    AlreadyRunning(u32),

    #[error("Another daemon claimed {0} while starting")]
    Contended(String),

    #[error("PID file {0}: {1}")]
    Io(String, #[source] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_sits_beside_the_socket() {
        assert_eq!(DaemonLock::default_path(), runtime_dir().join("call-recorder.pid"));
    }

    #[test]
    fn missing_file_has_no_owner() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(live_owner(&dir.path().join("daemon.pid")), None);
    }

    #[test]
    fn acquire_writes_own_pid_and_drop_removes_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon.pid");

        let lock = DaemonLock::acquire(&path).unwrap();
        assert_eq!(recorded_pid(lock.path()), Some(process::id()));
        assert_eq!(live_owner(&path), Some(process::id()));

        drop(lock);
        assert!(!path.exists());
    }

    #[test]
    fn refused_second_lock_leaves_holder_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon.pid");
        let _lock = DaemonLock::acquire(&path).unwrap();

        let err = DaemonLock::acquire(&path).unwrap_err();

        assert!(matches!(err, DaemonLockError::AlreadyRunning(pid) if pid == process::id()));
        assert_eq!(recorded_pid(&path), Some(process::id()));
    }

    #[test]
    fn garbage_pid_file_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon.pid");
        fs::write(&path, "not-a-pid").unwrap();

        assert_eq!(live_owner(&path), None);
        let _lock = DaemonLock::acquire(&path).unwrap();
        assert_eq!(recorded_pid(&path), Some(process::id()));
    }

    #[test]
    fn drop_keeps_a_file_rewritten_by_someone_else() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon.pid");
        let lock = DaemonLock::acquire(&path).unwrap();
        fs::write(&path, "1").unwrap();

        drop(lock);
        assert!(path.exists());
    }
}
