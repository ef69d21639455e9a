// crates/core/src/backend/mod.rs
//! Copy backends: how a job request becomes an external tool invocation.
//!
//! - `UnixSync` runs `rsync` and captures its output into the log file
//! - `WindowsMirror` runs `robocopy`, which writes the log itself

pub mod robocopy;
pub mod rsync;

use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;

pub use robocopy::WindowsMirror;
pub use rsync::UnixSync;

/// Where the tool's output ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputCapture {
    /// The server creates the log file and points stdout and stderr at it.
    RedirectToLog,
    /// The tool is told where the log is and writes it on its own.
    ToolWritesLog,
}

/// A concrete command line, passed as an argument vector (no shell).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyCommand {
    pub program: OsString,
    pub args: Vec<OsString>,
    pub capture: OutputCapture,
}

impl CopyCommand {
    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

/// Source and destination of one copy job, as given by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyRequest {
    pub source: String,
    pub destination: String,
}

impl CopyRequest {
    /// Both fields must be non-empty. Paths are otherwise not checked.
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Option<Self> {
        let source = source.into();
        let destination = destination.into();
        if source.is_empty() || destination.is_empty() {
            return None;
        }
        Some(Self {
            source,
            destination,
        })
    }
}

/// Maps a copy request to the command that performs it.
pub trait CopyBackend: Send + Sync {
    /// Build the command for `request`, logging to `log_path`.
    fn command(&self, request: &CopyRequest, log_path: &Path) -> CopyCommand;

    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Executable name the tool runs under, used to tell a recorded PID
    /// that still belongs to the copy from one the OS handed to another
    /// program.
    fn process_name(&self) -> &str {
        self.name()
    }
}

/// The backend for the host this binary was built for.
pub fn host_backend() -> Arc<dyn CopyBackend> {
    if cfg!(windows) {
        Arc::new(WindowsMirror)
    } else {
        Arc::new(UnixSync)
    }
}
