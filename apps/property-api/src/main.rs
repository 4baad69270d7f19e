//! Portfolio API server entry point

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use property_api::{build_router, AppState};
use property_store::PortfolioConfig;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("property_api=info".parse()?)
                .add_directive("property_store=info".parse()?)
                .add_directive("property_ingest=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    // Initialize application state
    info!("Initializing portfolio API...");
    let config = PortfolioConfig::from_env().context("Invalid configuration")?;
    let port = config.port;
    let state = AppState::new(config)
        .await
        .context("Failed to open data source")?;
    let app = build_router(Arc::new(state));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting portfolio API on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
