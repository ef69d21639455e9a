// crates/server/src/main.rs
//! copy-drive server binary.

use anyhow::{Context, Result};
use clap::Parser;
use copy_drive_server::{create_app, registry_from_config, AppState, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,copy_drive_server=info,copy_drive_core=info,tower_http=debug".into()),
        )
        .init();

    let config = Config::parse();
    let paths = config.state_paths();
    paths
        .ensure_dir()
        .with_context(|| format!("creating state dir {}", paths.dir().display()))?;

    let state = AppState::new(registry_from_config(&config));
    let app = create_app(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(
        %addr,
        state_dir = %paths.dir().display(),
        "copy-drive listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // A running copy is left alone; its PID file lets the next run stop it.
    tracing::info!("copy-drive stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
