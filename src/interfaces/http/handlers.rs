use super::error::ApiError;
use super::state::AppState;
use crate::domain::errors::ForecastError;
use crate::domain::forecast::ForecastResult;
use crate::domain::market::TradingPair;
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Optional query string on inference routes
#[derive(Debug, Default, Deserialize)]
pub struct InferenceQuery {
    /// Kline interval override ("1m" or "5m")
    pub interval: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ForecastBody {
    Value { forecast: f64 },
    Cast { cast: Vec<f64> },
}

impl From<ForecastResult> for ForecastBody {
    fn from(result: ForecastResult) -> Self {
        match result {
            ForecastResult::Point(forecast) => ForecastBody::Value { forecast },
            ForecastResult::Path(cast) => ForecastBody::Cast { cast },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VolatilityBody {
    pub volatility: f64,
}

#[derive(Debug, Serialize)]
pub struct SymbolEntry {
    pub token: &'static str,
    pub pair: &'static str,
}

/// Count the outcome and turn it into a JSON response
fn respond<T: Serialize>(
    state: &AppState,
    route: &str,
    result: Result<T, ForecastError>,
) -> Response {
    match result {
        Ok(body) => {
            state.metrics.inc_requests(route, StatusCode::OK.as_u16());
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            let error = ApiError(e);
            state.metrics.inc_requests(route, error.status().as_u16());
            state.metrics.inc_errors(error.0.kind());
            error.into_response()
        }
    }
}

/// Unwrap path and query extractors, turning axum rejections into domain errors
/// so they share the JSON error body and metrics of every other failure.
fn extract<T>(
    path: Result<Path<T>, PathRejection>,
    query: Result<Query<InferenceQuery>, QueryRejection>,
) -> Result<(T, InferenceQuery), ForecastError> {
    let Path(params) = path.map_err(|rejection| {
        warn!("Rejected request path: {}", rejection.body_text());
        ForecastError::InvalidPath {
            reason: rejection.body_text(),
        }
    })?;
    let Query(query) = query.map_err(|rejection| {
        warn!("Rejected query string: {}", rejection.body_text());
        ForecastError::InvalidInterval {
            value: rejection.body_text(),
        }
    })?;
    Ok((params, query))
}

/// GET /inference/value/{token} - single forecast value (horizon 1)
pub async fn forecast_value(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<InferenceQuery>, QueryRejection>,
) -> Response {
    let result = match extract(path, query) {
        Ok((token, query)) => state
            .service
            .forecast_value(&token, query.interval.as_deref())
            .await
            .map(ForecastBody::from),
        Err(e) => Err(e),
    };
    respond(&state, "value", result)
}

/// GET /inference/value/{token}/{horizon} - one mean per forecast step
pub async fn forecast_path(
    State(state): State<Arc<AppState>>,
    path: Result<Path<(String, String)>, PathRejection>,
    query: Result<Query<InferenceQuery>, QueryRejection>,
) -> Response {
    let result = match extract(path, query) {
        Ok(((token, horizon), query)) => state
            .service
            .forecast_path(&token, &horizon, query.interval.as_deref())
            .await
            .map(ForecastBody::from),
        Err(e) => Err(e),
    };
    respond(&state, "cast", result)
}

/// GET /inference/volatility/{token}
pub async fn volatility(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<InferenceQuery>, QueryRejection>,
) -> Response {
    let result = match extract(path, query) {
        Ok((token, query)) => state
            .service
            .volatility(&token, query.interval.as_deref())
            .await
            .map(|volatility| VolatilityBody { volatility }),
        Err(e) => Err(e),
    };
    respond(&state, "volatility", result)
}

/// GET /inference/symbols - the token allow-list
pub async fn symbols(State(state): State<Arc<AppState>>) -> Response {
    let symbols: Vec<SymbolEntry> = TradingPair::supported()
        .into_iter()
        .map(|p| SymbolEntry {
            token: p.token(),
            pair: p.as_str(),
        })
        .collect();
    respond(&state, "symbols", Ok(serde_json::json!({ "symbols": symbols })))
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let model = if state.service.model_ready() {
        "ready"
    } else {
        "unavailable"
    };
    Json(serde_json::json!({ "status": "ok", "model": model }))
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
