// crates/server/src/routes/mod.rs
//! API route handlers for the copy-drive server.

pub mod copy;
pub mod health;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Create the combined API router with all routes under /api prefix.
///
/// Routes:
/// - GET /api/health - Health check
/// - GET /api/start - Launch a copy (`source`, `destination` query params)
/// - GET /api/progress - Last lines of the copy log
/// - GET /api/stop - Stop the running copy
/// - GET /api/status - Whether a copy is running
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", health::router().merge(copy::router()))
        .with_state(state)
}
