use crate::domain::errors::ForecastError;
use crate::domain::forecast::Horizon;
use crate::domain::market::PriceSeries;
use crate::domain::ports::ForecastEngine;
use ndarray::{Array2, ArrayD, Axis, Ix3};
use std::sync::Arc;
use tracing::debug;

/// Forecasting engine as loaded at startup.
///
/// Built once and never mutated; a failed load is remembered as
/// `Unavailable` so forecast requests fail fast instead of retrying the load.
#[derive(Clone)]
pub enum EngineHandle {
    Ready(Arc<dyn ForecastEngine>),
    Unavailable(String),
}

impl EngineHandle {
    pub fn ready(engine: impl ForecastEngine + 'static) -> Self {
        EngineHandle::Ready(Arc::new(engine))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, EngineHandle::Ready(_))
    }
}

impl std::fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineHandle::Ready(engine) => write!(f, "Ready({})", engine.name()),
            EngineHandle::Unavailable(reason) => write!(f, "Unavailable({reason})"),
        }
    }
}

/// Builds model input from a price series and reduces the engine's
/// distribution output to one mean per forecast step.
#[derive(Debug, Clone)]
pub struct Forecaster {
    engine: EngineHandle,
}

impl Forecaster {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    /// One mean per step, `horizon.steps()` values long
    pub fn forecast(
        &self,
        series: &PriceSeries,
        horizon: Horizon,
    ) -> Result<Vec<f64>, ForecastError> {
        let engine = match &self.engine {
            EngineHandle::Ready(engine) => engine,
            EngineHandle::Unavailable(reason) => {
                return Err(ForecastError::ModelUnavailable {
                    reason: reason.clone(),
                });
            }
        };

        let input = build_input(series)?;
        debug!(
            "Forecaster: running {} on {} prices, horizon {}",
            engine.name(),
            series.len(),
            horizon
        );

        let output = engine
            .predict(&input, horizon.steps())
            .map_err(|reason| ForecastError::PredictionError { reason })?;

        reduce_distribution(&output, horizon.steps())
    }

    /// Legacy single-value forecast.
    ///
    /// Always requests exactly one step and unwraps that step, so a longer
    /// path can never be mistaken for a scalar.
    pub fn forecast_point(&self, series: &PriceSeries) -> Result<f64, ForecastError> {
        match self.forecast(series, Horizon::ONE)?.as_slice() {
            [value] => Ok(*value),
            other => Err(ForecastError::PredictionError {
                reason: format!("expected 1 forecast step, got {}", other.len()),
            }),
        }
    }
}

/// Single-batch `[1, len]` tensor of prices; timestamps are dropped here
pub fn build_input(series: &PriceSeries) -> Result<Array2<f32>, ForecastError> {
    let prices: Vec<f32> = series.points().iter().map(|p| p.price as f32).collect();
    Array2::from_shape_vec((1, prices.len()), prices).map_err(|e| {
        ForecastError::PredictionError {
            reason: format!("cannot build model input: {e}"),
        }
    })
}

/// Collapse a `[1, samples, horizon]` distribution to per-step means.
///
/// Any other rank or shape is rejected rather than reshaped.
pub fn reduce_distribution(
    output: &ArrayD<f32>,
    horizon: usize,
) -> Result<Vec<f64>, ForecastError> {
    let shape = output.shape().to_vec();
    let view = output
        .view()
        .into_dimensionality::<Ix3>()
        .map_err(|_| ForecastError::PredictionError {
            reason: format!(
                "expected output of rank 3 [batch, samples, horizon], got shape {shape:?}"
            ),
        })?;

    let (batch, samples, steps) = view.dim();
    if batch != 1 || samples == 0 || steps != horizon {
        return Err(ForecastError::PredictionError {
            reason: format!("expected output shape [1, >=1, {horizon}], got {shape:?}"),
        });
    }

    let means = view
        .index_axis(Axis(0), 0)
        .mapv(f64::from)
        .mean_axis(Axis(0))
        .ok_or_else(|| ForecastError::PredictionError {
            reason: "model returned no samples".to_string(),
        })?;

    if means.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::PredictionError {
            reason: "model returned non-finite values".to_string(),
        });
    }

    Ok(means.to_vec())
}
