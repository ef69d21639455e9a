// crates/core/src/pid_file.rs
//! The PID file: plain decimal text of the running copy's process ID.

use std::io::ErrorKind;
use std::path::Path;

use crate::error::JobError;

/// Write `pid` as decimal text, replacing any previous content.
pub async fn write_pid(path: &Path, pid: u32) -> Result<(), JobError> {
    tokio::fs::write(path, pid.to_string())
        .await
        .map_err(|source| JobError::PidWrite {
            pid,
            path: path.to_path_buf(),
            source,
        })
}

/// Read the recorded PID.
///
/// Returns `Ok(None)` when the file does not exist. Surrounding whitespace is
/// ignored; anything else that is not a decimal integer is `InvalidPidFile`.
pub async fn read_pid(path: &Path) -> Result<Option<u32>, JobError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(JobError::state_io(path, e)),
    };

    content
        .trim()
        .parse::<u32>()
        .map(Some)
        .map_err(|_| JobError::InvalidPidFile {
            path: path.to_path_buf(),
            content,
        })
}

/// Delete the PID file. A missing file is not an error.
pub async fn remove_pid(path: &Path) -> Result<(), JobError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(JobError::state_io(path, e)),
    }
}

/// Delete the PID file only if it still names `pid`.
///
/// Used when a job exits on its own, so it never clobbers a file written for
/// a newer job.
pub async fn remove_pid_if_matches(path: &Path, pid: u32) -> Result<bool, JobError> {
    match read_pid(path).await {
        Ok(Some(recorded)) if recorded == pid => {
            remove_pid(path).await?;
            Ok(true)
        }
        Ok(_) | Err(JobError::InvalidPidFile { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_then_read() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("copy_pid");

        write_pid(&path, 4821).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "4821");
        assert_eq!(read_pid(&path).await.unwrap(), Some(4821));
    }

    #[tokio::test]
    async fn write_into_missing_dir_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("absent").join("copy_pid");

        let err = write_pid(&path, 55).await.unwrap_err();
        assert!(matches!(err, JobError::PidWrite { pid: 55, .. }));
    }

    #[tokio::test]
    async fn read_missing_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(read_pid(&tmp.path().join("copy_pid")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn read_tolerates_trailing_newline() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("copy_pid");
        std::fs::write(&path, "123\n").unwrap();
        assert_eq!(read_pid(&path).await.unwrap(), Some(123));
    }

    #[tokio::test]
    async fn read_garbage_is_invalid() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("copy_pid");
        std::fs::write(&path, "not-a-pid").unwrap();

        let err = read_pid(&path).await.unwrap_err();
        assert!(matches!(err, JobError::InvalidPidFile { ref content, .. } if content == "not-a-pid"));
    }

    #[tokio::test]
    async fn remove_missing_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        remove_pid(&tmp.path().join("copy_pid")).await.unwrap();
    }

    #[tokio::test]
    async fn remove_if_matches_keeps_newer_pid() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("copy_pid");
        write_pid(&path, 200).await.unwrap();

        assert!(!remove_pid_if_matches(&path, 100).await.unwrap());
        assert!(path.exists());

        assert!(remove_pid_if_matches(&path, 200).await.unwrap());
        assert!(!path.exists());
    }
}
