// crates/server/src/routes/copy.rs
//! Copy job control routes.
//!
//! - GET /start?source=..&destination=.. — launch the copy tool
//! - GET /progress — last lines of the tool's log
//! - GET /stop — kill the running copy and wait for it
//! - GET /status — whether a copy is running

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::Router;
use copy_drive_core::{last_lines, render_progress, CopyRequest, PROGRESS_WINDOW};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StartParams {
    pub source: String,
    pub destination: String,
}

/// GET /api/start — launch a copy; returns as soon as the tool is running.
async fn start_copy(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StartParams>,
) -> ApiResult<String> {
    let request = CopyRequest::new(params.source, params.destination)
        .ok_or_else(|| ApiError::BadRequest("Source and destination are required".into()))?;

    let info = state.jobs.start(request).await?;
    Ok(format!("Copy started with PID: {}\n", info.pid))
}

/// GET /api/progress — re-scan the log and return its tail.
async fn get_progress(State(state): State<Arc<AppState>>) -> ApiResult<String> {
    let log_path = state.jobs.paths().log_file();
    let lines = last_lines(&log_path, PROGRESS_WINDOW).await?;
    Ok(render_progress(&lines))
}

/// GET /api/stop
async fn stop_copy(State(state): State<Arc<AppState>>) -> ApiResult<&'static str> {
    state.jobs.stop().await?;
    Ok("Copy process stopped\n")
}

/// GET /api/status
async fn copy_status(State(state): State<Arc<AppState>>) -> ApiResult<String> {
    let status = state.jobs.status().await?;
    Ok(format!("{status}\n"))
}

/// Build the copy router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/start", get(start_copy))
        .route("/progress", get(get_progress))
        .route("/stop", get(stop_copy))
        .route("/status", get(copy_status))
}
