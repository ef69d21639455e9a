// crates/server/src/lib.rs
//! copy-drive server library.
//!
//! Axum HTTP server that launches, monitors, and stops one background copy
//! job run by rsync (Unix) or robocopy (Windows).

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::*;
pub use routes::api_routes;
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use copy_drive_core::{host_backend, JobRegistry};
use tower_http::trace::TraceLayer;

/// Create the Axum application around an existing state.
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(api_routes(state))
        .layer(TraceLayer::new_for_http())
}

/// Build the job registry for this host from configuration.
pub fn registry_from_config(config: &Config) -> JobRegistry {
    JobRegistry::new(host_backend(), config.state_paths()).with_stop_timeout(config.stop_timeout())
}
