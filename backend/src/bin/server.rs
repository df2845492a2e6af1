//! Parcel Insight HTTP Server Binary
//!
//! Loads the configuration, builds the repository and analysis service, and
//! serves the REST API.
//!
//! # Usage
//!
//! ```bash
//! # In-memory repository (default)
//! cargo run --bin parcel-server
//!
//! # Persist document metadata and training samples under ./data
//! PARCEL_DATA_DIR=./data cargo run --bin parcel-server
//! ```
//!
//! # Environment Variables
//!
//! - `PARCEL_CONFIG`: Path to a `parcel.toml` file
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `REPOSITORY_TYPE`: `local` or `file`
//! - `PARCEL_DATA_DIR`: Data directory for the file repository
//! - `RUST_LOG`: Log filter (default: info)

use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use parcel_insight::config::AppConfig;
use parcel_insight::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Parcel Insight HTTP Server");

    let config = AppConfig::from_env_or_default()?;
    let service = config
        .build_service()
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    info!(
        "Repository '{}' initialized, model {}",
        config.repository.repository.repo_type,
        service.model_version()
    );

    let app = create_router(AppState::new(service));

    let addr = config.socket_addr()?;
    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
