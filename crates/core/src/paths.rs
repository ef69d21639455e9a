// crates/core/src/paths.rs
//! Locations of the on-disk job state.
//!
//! Both files live in one state directory under fixed names, so a restarted
//! server finds the PID file left behind by the previous one. The PID file
//! can be moved elsewhere (e.g. `/run`) with `with_pid_file`.

use std::path::{Path, PathBuf};

/// File name of the persisted process identifier.
pub const PID_FILE_NAME: &str = "copy_pid";

/// File name of the copy tool's log.
pub const LOG_FILE_NAME: &str = "progress.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePaths {
    dir: PathBuf,
    pid_file: Option<PathBuf>,
}

impl StatePaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            pid_file: None,
        }
    }

    /// Keep the PID file at `path` instead of `<dir>/copy_pid`.
    pub fn with_pid_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.pid_file = Some(path.into());
        self
    }

    /// State paths under the OS temp dir (`/tmp` on most Unix hosts).
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/copy_pid` unless overridden.
    pub fn pid_file(&self) -> PathBuf {
        self.pid_file
            .clone()
            .unwrap_or_else(|| self.dir.join(PID_FILE_NAME))
    }

    /// `<dir>/progress.log`
    pub fn log_file(&self) -> PathBuf {
        self.dir.join(LOG_FILE_NAME)
    }

    /// Create the state directory if it does not exist yet.
    pub fn ensure_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_fixed() {
        let paths = StatePaths::new("/var/lib/copy-drive");
        assert_eq!(paths.pid_file(), PathBuf::from("/var/lib/copy-drive/copy_pid"));
        assert_eq!(
            paths.log_file(),
            PathBuf::from("/var/lib/copy-drive/progress.log")
        );
    }

    #[test]
    fn pid_file_override() {
        let paths = StatePaths::new("/var/lib/copy-drive").with_pid_file("/run/copy-drive.pid");
        assert_eq!(paths.pid_file(), PathBuf::from("/run/copy-drive.pid"));
        assert_eq!(
            paths.log_file(),
            PathBuf::from("/var/lib/copy-drive/progress.log")
        );
    }

    #[test]
    fn ensure_dir_creates_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = StatePaths::new(tmp.path().join("a").join("b"));
        paths.ensure_dir().unwrap();
        assert!(paths.dir().is_dir());
    }
}
