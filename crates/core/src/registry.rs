// crates/core/src/registry.rs
//! Single-slot registry owning the one copy job.
//!
//! Start, stop and status serialize on one async mutex, so two starts can
//! never both spawn a tool and a stop always targets the job it saw.
//! The child process is owned by a supervisor task which waits for it to
//! exit or for the job's cancellation token, and publishes the outcome on a
//! `watch` channel.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::process::{Child, Command};
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;

use crate::backend::{CopyBackend, CopyRequest, OutputCapture};
use crate::error::JobError;
use crate::job::{JobExit, JobInfo, JobStatus};
use crate::paths::StatePaths;
use crate::pid_file;
use crate::process::{self, Liveness};

/// Default bound on how long a stop waits for the tool to be reaped.
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(10);

struct ActiveJob {
    info: JobInfo,
    cancel: CancellationToken,
    exit_rx: watch::Receiver<Option<JobExit>>,
}

impl ActiveJob {
    fn exit(&self) -> Option<JobExit> {
        self.exit_rx.borrow().clone()
    }

    fn is_running(&self) -> bool {
        self.exit_rx.borrow().is_none()
    }
}

pub struct JobRegistry {
    backend: Arc<dyn CopyBackend>,
    paths: StatePaths,
    stop_timeout: Duration,
    slot: Mutex<Option<ActiveJob>>,
}

impl JobRegistry {
    pub fn new(backend: Arc<dyn CopyBackend>, paths: StatePaths) -> Self {
        Self {
            backend,
            paths,
            stop_timeout: DEFAULT_STOP_TIMEOUT,
            slot: Mutex::new(None),
        }
    }

    pub fn with_stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = timeout;
        self
    }

    pub fn paths(&self) -> &StatePaths {
        &self.paths
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Launch the copy tool for `request`.
    ///
    /// Rejected with `AlreadyRunning` while a supervised job is running, or
    /// while the PID file names a live process of the backend's tool from an
    /// earlier server run. A PID file naming any other process is stale and
    /// gets replaced.
    /// Returns once the process exists; the copy itself is not awaited.
    pub async fn start(&self, request: CopyRequest) -> Result<JobInfo, JobError> {
        let mut slot = self.slot.lock().await;

        if let Some(job) = slot.as_ref().filter(|job| job.is_running()) {
            return Err(JobError::AlreadyRunning { pid: job.info.pid });
        }
        self.ensure_no_detached_job().await?;

        let pid_path = self.paths.pid_file();
        let log_path = self.paths.log_file();
        let mut child = self.spawn(&request, &log_path).await?;

        let Some(pid) = child.id() else {
            return Err(JobError::Spawn {
                program: self.backend.name().to_string(),
                source: std::io::Error::other("process exited before its PID was read"),
            });
        };

        if let Err(e) = pid_file::write_pid(&pid_path, pid).await {
            tracing::error!(pid, error = %e, "could not record PID, killing copy");
            if let Err(kill_err) = child.kill().await {
                tracing::warn!(pid, error = %kill_err, "kill after PID write failure failed");
            }
            return Err(e);
        }

        let info = JobInfo {
            pid,
            source: request.source,
            destination: request.destination,
            started_at: Utc::now(),
        };
        tracing::info!(
            pid,
            backend = self.backend.name(),
            source = %info.source,
            destination = %info.destination,
            started_at = %info.started_at,
            "copy started"
        );

        let cancel = CancellationToken::new();
        let (exit_tx, exit_rx) = watch::channel(None);
        tokio::spawn(supervise(child, pid, pid_path, cancel.clone(), exit_tx));

        *slot = Some(ActiveJob {
            info: info.clone(),
            cancel,
            exit_rx,
        });
        Ok(info)
    }

    /// Stop the running copy and wait for it to be reaped.
    ///
    /// Without a supervised job, falls back to the PID file, and kills the
    /// recorded process only if it still runs the backend's tool. Returns
    /// the PID that was stopped.
    pub async fn stop(&self) -> Result<u32, JobError> {
        let mut slot = self.slot.lock().await;
        let pid_path = self.paths.pid_file();

        let Some(job) = slot.as_ref() else {
            return self.stop_recorded(&pid_path).await;
        };

        let pid = job.info.pid;
        if let Some(exit) = job.exit() {
            *slot = None;
            // Waiting failed, so the child may still be alive; the PID file
            // is the only way left to reach it.
            if let JobExit::WaitFailed { .. } = exit {
                tracing::warn!(pid, "stopping untracked copy through the PID file");
                return self.stop_recorded(&pid_path).await;
            }
            tracing::debug!(pid, "stop requested for finished copy");
            pid_file::remove_pid(&pid_path).await?;
            return Err(JobError::NotRunning);
        }

        job.cancel.cancel();
        let mut exit_rx = job.exit_rx.clone();
        let exit = match tokio::time::timeout(self.stop_timeout, exit_rx.wait_for(|e| e.is_some()))
            .await
        {
            Ok(Ok(exit)) => exit.clone(),
            // Supervisor gone without reporting: the child handle was dropped.
            Ok(Err(_)) => None,
            Err(_) => {
                tracing::error!(pid, timeout = ?self.stop_timeout, "copy did not exit in time");
                return Err(JobError::StopTimedOut { pid });
            }
        };

        // The supervisor is done either way; the PID file stays on kill
        // failure so a later stop can retry through it.
        *slot = None;
        if let Some(JobExit::KillFailed { message }) = exit {
            return Err(JobError::KillFailed { pid, message });
        }

        pid_file::remove_pid(&pid_path).await?;
        tracing::info!(pid, "copy stopped");
        Ok(pid)
    }

    /// Report the current job.
    pub async fn status(&self) -> Result<JobStatus, JobError> {
        let slot = self.slot.lock().await;
        if let Some(job) = slot.as_ref() {
            return Ok(match job.exit() {
                None => JobStatus::Running(job.info.clone()),
                Some(exit) => JobStatus::Finished {
                    info: job.info.clone(),
                    exit,
                },
            });
        }

        let pid = pid_file::read_pid(&self.paths.pid_file())
            .await?
            .ok_or(JobError::NotRunning)?;
        match self.inspect(pid).await {
            Liveness::Tool => Ok(JobStatus::Detached { pid }),
            Liveness::Unrelated | Liveness::Gone => Err(JobError::ProcessNotFound { pid }),
        }
    }

    async fn ensure_no_detached_job(&self) -> Result<(), JobError> {
        let pid_path = self.paths.pid_file();
        match pid_file::read_pid(&pid_path).await {
            Ok(Some(pid)) => match self.inspect(pid).await {
                Liveness::Tool => Err(JobError::AlreadyRunning { pid }),
                Liveness::Unrelated => {
                    tracing::warn!(pid, "PID file names an unrelated process, discarding it");
                    pid_file::remove_pid(&pid_path).await
                }
                Liveness::Gone => Ok(()),
            },
            Ok(None) => Ok(()),
            Err(JobError::InvalidPidFile { path, .. }) => {
                tracing::warn!(path = %path.display(), "overwriting unreadable PID file");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn spawn(&self, request: &CopyRequest, log_path: &Path) -> Result<Child, JobError> {
        let command = self.backend.command(request, log_path);
        let program = command.program_name();

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args).stdin(Stdio::null());

        match command.capture {
            OutputCapture::RedirectToLog => {
                let log_err = |source| JobError::LogFile {
                    path: log_path.to_path_buf(),
                    source,
                };
                let stdout = tokio::fs::File::create(log_path)
                    .await
                    .map_err(log_err)?
                    .into_std()
                    .await;
                let stderr = stdout.try_clone().map_err(log_err)?;
                cmd.stdout(Stdio::from(stdout)).stderr(Stdio::from(stderr));
            }
            OutputCapture::ToolWritesLog => {
                cmd.stdout(Stdio::null()).stderr(Stdio::null());
            }
        }

        cmd.spawn().map_err(|source| {
            tracing::error!(program = %program, error = %source, "failed to spawn copy tool");
            JobError::Spawn { program, source }
        })
    }

    async fn inspect(&self, pid: u32) -> Liveness {
        let tool = self.backend.process_name().to_string();
        tokio::task::spawn_blocking(move || process::inspect(pid, &tool))
            .await
            .unwrap_or(Liveness::Gone)
    }

    /// Stop the process the PID file names, if it still runs the tool.
    async fn stop_recorded(&self, pid_path: &Path) -> Result<u32, JobError> {
        let pid = pid_file::read_pid(pid_path)
            .await?
            .ok_or(JobError::NotRunning)?;

        let tool = self.backend.process_name().to_string();
        tokio::task::spawn_blocking(move || process::kill_recorded(pid, &tool))
            .await
            .map_err(|e| JobError::KillFailed {
                pid,
                message: e.to_string(),
            })??;

        pid_file::remove_pid(pid_path).await?;
        tracing::info!(pid, "recorded copy process stopped");
        Ok(pid)
    }
}

async fn supervise(
    mut child: Child,
    pid: u32,
    pid_path: PathBuf,
    cancel: CancellationToken,
    exit_tx: watch::Sender<Option<JobExit>>,
) {
    let waited = tokio::select! {
        status = child.wait() => Some(status),
        _ = cancel.cancelled() => None,
    };

    let exit = match waited {
        Some(Ok(status)) => {
            tracing::info!(pid, code = ?status.code(), "copy exited");
            if let Err(e) = pid_file::remove_pid_if_matches(&pid_path, pid).await {
                tracing::warn!(pid, error = %e, "could not clear PID file after exit");
            }
            JobExit::Exited {
                code: status.code(),
            }
        }
        Some(Err(e)) => {
            tracing::error!(pid, error = %e, "waiting on copy failed");
            JobExit::WaitFailed {
                message: e.to_string(),
            }
        }
        None => match child.kill().await {
            Ok(()) => JobExit::Killed,
            Err(e) => {
                tracing::error!(pid, error = %e, "failed to kill copy");
                JobExit::KillFailed {
                    message: e.to_string(),
                }
            }
        },
    };

    exit_tx.send_replace(Some(exit));
}
