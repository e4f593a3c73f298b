//! attendance-ledger HTTP service.
//!
//! Loads reference data from `LEDGER_CONFIG_DIR` and serves the ledger API on
//! `LEDGER_ADDR`. Log output is controlled with `RUST_LOG`.

use attendance_ledger::api::{AppState, create_router};
use attendance_ledger::config::{ConfigLoader, ServerConfig};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let server = ServerConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attendance_ledger=info".into()),
        )
        .init();

    let config = ConfigLoader::load(&server.config_dir)?;
    let app = create_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(server.addr).await?;
    tracing::info!(
        addr = %server.addr,
        config_dir = %server.config_dir.display(),
        "attendance-ledger listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("attendance-ledger stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
