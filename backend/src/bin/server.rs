//! Cartographer HTTP server.
//!
//! # Usage
//!
//! ```bash
//! SWISS_EPHEMERIS_PATH=/usr/share/ephe cargo run --bin cartographer-server
//! ```
//!
//! # Environment Variables
//!
//! - `CARTOGRAPHER_CONFIG`: path to a TOML configuration file
//! - `HOST`: server host (default: 0.0.0.0)
//! - `PORT`: server port (default: 8000)
//! - `HD_API_TOKEN`: shared token required in `x-api-token` (default: none)
//! - `SWISS_EPHEMERIS_PATH`: directory with the Swiss Ephemeris data files
//! - `HD_DIGNITY_TABLE`: JSON line-dignity table (required unless
//!   `humandesign.dignity_table` is configured)
//! - `RUST_LOG`: log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use cartographer::config::AppConfig;
use cartographer::ephemeris::SwissEphemeris;
use cartographer::http::{create_router, AppState};
use cartographer::humandesign::DignityTable;
use cartographer::render::{BodygraphLayout, Rasterizer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Cartographer {}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load().context("Failed to load configuration")?;

    let ephemeris = SwissEphemeris::new(config.ephemeris.path.clone());

    let dignity_path = config.dignity_table_path()?;
    let dignities = DignityTable::from_file(dignity_path)
        .with_context(|| format!("Failed to load dignity table {}", dignity_path.display()))?;
    let missing = dignities.missing_lines();
    if !missing.is_empty() {
        warn!(
            "Dignity table {} has no entry for {} gate lines (first: {}.{})",
            dignity_path.display(),
            missing.len(),
            missing[0].0,
            missing[0].1
        );
    }

    let layout = match &config.render.layout_file {
        Some(path) => BodygraphLayout::from_file(path)?,
        None => BodygraphLayout::standard(),
    };

    let rasterizer = Rasterizer::new(&config.rasterizer_options());

    if config.server.api_token.is_some() {
        info!("API token authentication enabled");
    }

    let state = AppState::new(
        Arc::new(ephemeris),
        Arc::new(dignities),
        Arc::new(layout),
        Arc::new(rasterizer),
    )
    .with_api_token(config.server.api_token.clone())
    .with_body_limit(config.server.body_limit_bytes);

    let app = create_router(state);

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind_address()))?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
