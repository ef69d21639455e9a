// crates/core/src/backend/rsync.rs
//! `rsync` in archive mode with whole-transfer progress lines.

use std::ffi::OsString;
use std::path::Path;

use super::{CopyBackend, CopyCommand, CopyRequest, OutputCapture};

#[derive(Debug, Clone, Copy, Default)]
pub struct UnixSync;

impl CopyBackend for UnixSync {
    fn command(&self, request: &CopyRequest, _log_path: &Path) -> CopyCommand {
        CopyCommand {
            program: "rsync".into(),
            args: vec![
                "-a".into(),
                "--info=progress2".into(),
                "--".into(),
                OsString::from(&request.source),
                OsString::from(&request.destination),
            ],
            capture: OutputCapture::RedirectToLog,
        }
    }

    fn name(&self) -> &str {
        "rsync"
    }
}
