// crates/core/src/job.rs
//! Types describing the single copy job.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

/// What the server knows about a job it launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobInfo {
    pub pid: u32,
    pub source: String,
    pub destination: String,
    pub started_at: DateTime<Utc>,
}

/// How a supervised job ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobExit {
    /// The tool exited on its own. `code` is `None` when it died by signal.
    Exited { code: Option<i32> },
    /// Killed on request.
    Killed,
    /// Waiting on the child failed; its fate is unknown.
    WaitFailed { message: String },
    /// A stop was requested but the kill signal could not be delivered.
    KillFailed { message: String },
}

impl fmt::Display for JobExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobExit::Exited { code: Some(code) } => write!(f, "exited with code {code}"),
            JobExit::Exited { code: None } => write!(f, "terminated by signal"),
            JobExit::Killed => write!(f, "stopped"),
            JobExit::WaitFailed { message } => write!(f, "lost track of process: {message}"),
            JobExit::KillFailed { message } => write!(f, "could not be stopped: {message}"),
        }
    }
}

/// Current job state, as reported by the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Launched by this server and still running.
    Running(JobInfo),
    /// Launched by this server and already over.
    Finished { info: JobInfo, exit: JobExit },
    /// Not supervised here, but the PID file names a live process
    /// (left behind by a previous server instance).
    Detached { pid: u32 },
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Running(info) => write!(
                f,
                "Copy is in progress on PID {} since {}",
                info.pid,
                info.started_at.to_rfc3339_opts(SecondsFormat::Secs, true)
            ),
            JobStatus::Detached { pid } => write!(f, "Copy is in progress on PID {pid}"),
            JobStatus::Finished { info, exit } => {
                write!(f, "Copy finished (PID {} {exit})", info.pid)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    fn info(pid: u32) -> JobInfo {
        JobInfo {
            pid,
            source: "/a".into(),
            destination: "/b".into(),
            started_at: Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap(),
        }
    }

    #[test]
    fn status_text() {
        assert_eq!(
            JobStatus::Running(info(4821)).to_string(),
            "Copy is in progress on PID 4821 since 2026-10-19T08:30:00Z"
        );
        assert_eq!(
            JobStatus::Detached { pid: 9 }.to_string(),
            "Copy is in progress on PID 9"
        );
        assert_eq!(
            JobStatus::Finished {
                info: info(12),
                exit: JobExit::Exited { code: Some(23) },
            }
            .to_string(),
            "Copy finished (PID 12 exited with code 23)"
        );
    }

    #[test]
    fn exit_text() {
        assert_eq!(JobExit::Killed.to_string(), "stopped");
        assert_eq!(JobExit::Exited { code: None }.to_string(), "terminated by signal");
    }
}
