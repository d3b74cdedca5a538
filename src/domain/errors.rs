use thiserror::Error;

/// Longest slice of an upstream body kept in errors and logs
pub const UPSTREAM_BODY_PREVIEW_CHARS: usize = 512;

/// Errors raised while turning a token into a forecast or volatility figure
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ForecastError {
    #[error("Unsupported symbol: {token}")]
    UnsupportedSymbol { token: String },

    #[error("Invalid horizon: {reason}")]
    InvalidHorizon { reason: String },

    #[error("Invalid interval: {value} (expected 1m or 5m)")]
    InvalidInterval { value: String },

    #[error("Invalid request path: {reason}")]
    InvalidPath { reason: String },

    #[error("Upstream market data request failed with status {status}: {body}")]
    UpstreamError { status: u16, body: String },

    #[error("Upstream market data request timed out after {timeout_ms}ms")]
    UpstreamTimeout { timeout_ms: u64 },

    #[error("Upstream returned no candles for {pair}")]
    EmptyUpstreamData { pair: String },

    #[error("Malformed upstream data: {reason}")]
    MalformedUpstreamData { reason: String },

    #[error("Price series is empty after trimming ({candles} candles received)")]
    EmptySeries { candles: usize },

    #[error("Cannot compute volatility: base price is {base_price}")]
    DivisionByZero { base_price: f64 },

    #[error("Forecasting model unavailable: {reason}")]
    ModelUnavailable { reason: String },

    #[error("Prediction failed: {reason}")]
    PredictionError { reason: String },
}

impl ForecastError {
    /// Stable snake_case identifier used in error bodies, logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            ForecastError::UnsupportedSymbol { .. } => "unsupported_symbol",
            ForecastError::InvalidHorizon { .. } => "invalid_horizon",
            ForecastError::InvalidInterval { .. } => "invalid_interval",
            ForecastError::InvalidPath { .. } => "invalid_path",
            ForecastError::UpstreamError { .. } => "upstream_error",
            ForecastError::UpstreamTimeout { .. } => "upstream_timeout",
            ForecastError::EmptyUpstreamData { .. } => "empty_upstream_data",
            ForecastError::MalformedUpstreamData { .. } => "malformed_upstream_data",
            ForecastError::EmptySeries { .. } => "empty_series",
            ForecastError::DivisionByZero { .. } => "division_by_zero",
            ForecastError::ModelUnavailable { .. } => "model_unavailable",
            ForecastError::PredictionError { .. } => "prediction_error",
        }
    }

    /// True for errors caused by the caller's input rather than upstream or model failures
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ForecastError::UnsupportedSymbol { .. }
                | ForecastError::InvalidHorizon { .. }
                | ForecastError::InvalidInterval { .. }
                | ForecastError::InvalidPath { .. }
        )
    }

    /// Build an `UpstreamError`, cutting the body down to a loggable preview
    pub fn upstream(status: u16, body: &str) -> Self {
        ForecastError::UpstreamError {
            status,
            body: preview(body),
        }
    }
}

fn preview(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= UPSTREAM_BODY_PREVIEW_CHARS {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed.chars().take(UPSTREAM_BODY_PREVIEW_CHARS).collect();
    cut.push_str("...");
    cut
}
