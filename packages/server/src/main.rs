use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use common::storage::filesystem::FilesystemBlobStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use nopaste_server::assets::EmbeddedAssets;
use nopaste_server::build_router;
use nopaste_server::config::{AppConfig, Cli};
use nopaste_server::state::AppState;

/// Wait for SIGTERM or Ctrl+C.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::load(Cli::parse()).context("Failed to load config")?;
    let addr = config.socket_addr().context("Invalid listen address")?;

    let store = FilesystemBlobStore::new(config.data_dir.clone())
        .await
        .with_context(|| {
            format!(
                "Failed to prepare data directory {}",
                config.data_dir.display()
            )
        })?;
    info!(data_dir = %config.data_dir.display(), "Data directory ready");

    let app = build_router(AppState::new(Arc::new(store), Arc::new(EmbeddedAssets)));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("nopaste listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
