// crates/server/src/error.rs
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use copy_drive_core::JobError;
use thiserror::Error;

/// API error types that map to HTTP status codes.
///
/// Bodies are the public message as plain text. Underlying OS errors are
/// logged, never returned.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Job error: {0}")]
    Job(#[from] JobError),
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Job(err) => job_status_and_message(err),
        }
    }
}

fn job_status_and_message(err: &JobError) -> (StatusCode, String) {
    let (status, msg) = match err {
        JobError::AlreadyRunning { .. } => return (StatusCode::CONFLICT, err.to_string()),
        JobError::NotRunning => (StatusCode::NOT_FOUND, "Copy process not running"),
        JobError::ProcessNotFound { .. } => (StatusCode::NOT_FOUND, "Process not found"),
        JobError::ProgressLogMissing { .. } => (StatusCode::NOT_FOUND, "No progress log found"),
        JobError::InvalidPidFile { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "Invalid PID file"),
        JobError::LogFile { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "Could not create log file"),
        JobError::Spawn { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to start copy process"),
        JobError::PidWrite { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "Could not save PID"),
        JobError::ProgressRead { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Error reading progress log")
        }
        JobError::KillFailed { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to stop process"),
        JobError::StopTimedOut { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Timed out waiting for copy process to exit",
        ),
        JobError::StateIo { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "Could not access job state"),
    };
    (status, msg.to_string())
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "request failed");
        } else {
            tracing::warn!(status = %status, error = %self, "request rejected");
        }

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("{message}\n"),
        )
            .into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
