use crate::domain::errors::ForecastError;
use serde::Serialize;
use std::fmt;

/// Largest horizon accepted when no configuration overrides it
pub const DEFAULT_MAX_HORIZON: usize = 64;

/// Number of forecast steps, validated to `1..=max`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Horizon(usize);

impl Horizon {
    /// Horizon of the legacy single-value route
    pub const ONE: Horizon = Horizon(1);

    pub fn new(steps: i64, max: usize) -> Result<Self, ForecastError> {
        if steps < 1 {
            return Err(ForecastError::InvalidHorizon {
                reason: format!("horizon must be at least 1, got {steps}"),
            });
        }
        let steps = usize::try_from(steps).map_err(|_| ForecastError::InvalidHorizon {
            reason: format!("horizon {steps} does not fit this platform"),
        })?;
        if steps > max {
            return Err(ForecastError::InvalidHorizon {
                reason: format!("horizon must be at most {max}, got {steps}"),
            });
        }
        Ok(Horizon(steps))
    }

    /// Parse a raw path segment such as "12"
    pub fn parse(raw: &str, max: usize) -> Result<Self, ForecastError> {
        let steps = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ForecastError::InvalidHorizon {
                reason: format!("'{raw}' is not an integer"),
            })?;
        Self::new(steps, max)
    }

    pub fn steps(&self) -> usize {
        self.0
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reduced model output, shaped for the route that asked for it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ForecastResult {
    /// Legacy single-value response (horizon 1)
    Point(f64),
    /// One mean per forecast step
    Path(Vec<f64>),
}

impl ForecastResult {
    pub fn values(&self) -> &[f64] {
        match self {
            ForecastResult::Point(v) => std::slice::from_ref(v),
            ForecastResult::Path(values) => values,
        }
    }
}
