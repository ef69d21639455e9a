// crates/core/src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while launching, inspecting, or stopping a copy job.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Copy already running with PID: {pid}")]
    AlreadyRunning { pid: u32 },

    #[error("Copy process not running")]
    NotRunning,

    #[error("Process {pid} not found")]
    ProcessNotFound { pid: u32 },

    #[error("Invalid PID file {path}: {content:?}")]
    InvalidPidFile { path: PathBuf, content: String },

    #[error("Could not create log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write PID {pid} to {path}: {source}")]
    PidWrite {
        pid: u32,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Progress log not found: {path}")]
    ProgressLogMissing { path: PathBuf },

    #[error("IO error reading progress log {path}: {source}")]
    ProgressRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to stop process {pid}: {message}")]
    KillFailed { pid: u32, message: String },

    #[error("Timed out waiting for process {pid} to exit")]
    StopTimedOut { pid: u32 },

    #[error("IO error on state file {path}: {source}")]
    StateIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl JobError {
    pub fn state_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StateIo {
            path: path.into(),
            source,
        }
    }

    pub fn progress_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::ProgressLogMissing { path },
            _ => Self::ProgressRead { path, source },
        }
    }
}
