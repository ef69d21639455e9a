// crates/core/src/process.rs
//! OS process lookup by PID, for jobs this server instance does not supervise.
//!
//! A recorded PID only counts as the copy when the live process behind it
//! runs the backend's tool; any other process is a reused number.
//!
//! These do synchronous system calls and should be called from
//! `tokio::task::spawn_blocking`.

use std::ffi::OsStr;
use std::path::Path;

use sysinfo::{Pid, Process, ProcessStatus, ProcessesToUpdate, System};

use crate::error::JobError;

/// What a recorded PID currently refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    /// A live process running the expected tool.
    Tool,
    /// A live process running something else.
    Unrelated,
    /// No live process.
    Gone,
}

/// Outcome of signalling a recorded PID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillOutcome {
    Killed,
    NotFound,
    Failed,
}

fn refreshed(pid: Pid) -> System {
    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
    sys
}

/// Matches `rsync`, `/usr/bin/rsync` and `ROBOCOPY.EXE` alike.
fn stem_is(name: &OsStr, tool: &str) -> bool {
    Path::new(name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.eq_ignore_ascii_case(tool))
}

fn runs_tool(process: &Process, tool: &str) -> bool {
    stem_is(process.name(), tool)
        || process
            .exe()
            .and_then(|exe| exe.file_name())
            .is_some_and(|exe| stem_is(exe, tool))
}

fn classify(process: Option<&Process>, tool: &str) -> Liveness {
    match process {
        None => Liveness::Gone,
        Some(p) if p.status() == ProcessStatus::Zombie => Liveness::Gone,
        Some(p) if runs_tool(p, tool) => Liveness::Tool,
        Some(_) => Liveness::Unrelated,
    }
}

/// Look up `pid` and check whether it is running `tool`.
pub fn inspect(pid: u32, tool: &str) -> Liveness {
    let pid = Pid::from_u32(pid);
    let sys = refreshed(pid);
    classify(sys.process(pid), tool)
}

/// Send a kill signal to `pid`, but only if it is running `tool`.
pub fn kill(pid: u32, tool: &str) -> KillOutcome {
    let sys_pid = Pid::from_u32(pid);
    let sys = refreshed(sys_pid);
    let process = sys.process(sys_pid);

    match (classify(process, tool), process) {
        (Liveness::Tool, Some(p)) => {
            if p.kill() {
                tracing::info!(pid, tool, "sent kill signal to recorded process");
                KillOutcome::Killed
            } else {
                tracing::warn!(pid, tool, "kill signal not delivered");
                KillOutcome::Failed
            }
        }
        (Liveness::Unrelated, _) => {
            tracing::warn!(pid, tool, "recorded PID now belongs to another program, not signalling");
            KillOutcome::NotFound
        }
        _ => KillOutcome::NotFound,
    }
}

/// `kill` as a `Result`, mapping outcomes onto job errors.
pub fn kill_recorded(pid: u32, tool: &str) -> Result<(), JobError> {
    match kill(pid, tool) {
        KillOutcome::Killed => Ok(()),
        KillOutcome::NotFound => Err(JobError::ProcessNotFound { pid }),
        KillOutcome::Failed => Err(JobError::KillFailed {
            pid,
            message: "signal not delivered".to_string(),
        }),
    }
}
