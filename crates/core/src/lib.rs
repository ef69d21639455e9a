// crates/core/src/lib.rs
pub mod backend;
pub mod error;
pub mod job;
pub mod paths;
pub mod pid_file;
pub mod process;
pub mod registry;
pub mod tail;

pub use backend::{host_backend, CopyBackend, CopyCommand, CopyRequest, OutputCapture};
pub use error::*;
pub use job::*;
pub use paths::StatePaths;
pub use registry::JobRegistry;
pub use tail::{last_lines, render_progress, PROGRESS_WINDOW};
