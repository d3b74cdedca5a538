//! pricecast server - price forecasting over HTTP
//!
//! Fetches recent Binance candles for a token and answers with a model
//! forecast or a simple volatility figure.
//!
//! # Usage
//! ```sh
//! MODEL_PATH=models/chronos-t5-small.onnx cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `BIND_ADDRESS` / `PORT` - Listener (default: 0.0.0.0:8000)
//! - `BINANCE_BASE_URL` - Market data endpoint (default: https://api.binance.com)
//! - `BINANCE_KLINE_INTERVAL` - `1m` or `5m` (default: 1m)
//! - `BINANCE_KLINE_LIMIT` - Candles per request, 2..=1000 (default: 1000)
//! - `BINANCE_TIMEOUT_MS` - Upstream request timeout (default: 5000)
//! - `MODEL_PATH` - Exported ONNX forecasting model
//! - `MODEL_MAX_HORIZON` - Largest accepted horizon (default: 64)

use anyhow::{Context, Result};
use pricecast::application::bootstrap::ServicesBootstrap;
use pricecast::config::Config;
use pricecast::infrastructure::observability::Metrics;
use pricecast::interfaces::http::{AppState, router};
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("pricecast server {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    let metrics = Metrics::new()?;

    let service = ServicesBootstrap::init(&config, Some(metrics.clone()))?;
    if !service.model_ready() {
        warn!("Forecasting engine unavailable: only volatility requests will succeed.");
    }

    let app = router(AppState::new(service, metrics));

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received. Exiting...");
}
