//! HTTP surface.
//!
//! Every route answers JSON. Failures use [`ErrorBody`] with status 400 for
//! caller mistakes and 500 for upstream or model failures.

pub mod error;
pub mod handlers;
pub mod state;

pub use error::{ApiError, ErrorBody};
pub use state::AppState;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Assemble the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .route("/inference/symbols", get(handlers::symbols))
        .route("/inference/value/{token}", get(handlers::forecast_value))
        .route(
            "/inference/value/{token}/{horizon}",
            get(handlers::forecast_path),
        )
        .route("/inference/volatility/{token}", get(handlers::volatility))
        // Path served by the first release of the service
        .route("/inference/{token}", get(handlers::forecast_value))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
