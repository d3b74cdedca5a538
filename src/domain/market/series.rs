//! Candle to price series normalization.
//!
//! The exchange returns candles in ascending time order and the newest one
//! usually covers an interval that is still open. The normalizer keeps the
//! order as received, drops that trailing candle and parses the remaining
//! close times and close prices.

use super::candle::Candle;
use crate::domain::errors::ForecastError;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

/// Number of candles removed from the end of every window.
/// The newest candle may still be forming and is never used.
pub const TRAILING_CANDLES_DROPPED: usize = 1;

/// Minimum candles needed to keep at least one price after trimming
pub const MIN_CANDLES: usize = TRAILING_CANDLES_DROPPED + 1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// Ordered, non-empty sequence of close prices
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Wrap already-ordered points. Fails when `points` is empty.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, ForecastError> {
        if points.is_empty() {
            return Err(ForecastError::EmptySeries { candles: 0 });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> &PricePoint {
        &self.points[0]
    }

    pub fn last(&self) -> &PricePoint {
        &self.points[self.points.len() - 1]
    }

    /// Prices only, in series order (the model input)
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }
}

/// Remove the possibly in-progress candles from the end of the window
pub fn trim_in_progress(candles: &[Candle]) -> &[Candle] {
    let keep = candles.len().saturating_sub(TRAILING_CANDLES_DROPPED);
    &candles[..keep]
}

/// Turn raw candles into a price series.
///
/// Input order is preserved; nothing is re-sorted.
pub fn normalize(candles: &[Candle]) -> Result<PriceSeries, ForecastError> {
    if candles.len() < MIN_CANDLES {
        return Err(ForecastError::EmptySeries {
            candles: candles.len(),
        });
    }

    let points = trim_in_progress(candles)
        .iter()
        .map(to_point)
        .collect::<Result<Vec<_>, _>>()?;

    if points.is_empty() {
        return Err(ForecastError::EmptySeries {
            candles: candles.len(),
        });
    }

    Ok(PriceSeries { points })
}

fn to_point(candle: &Candle) -> Result<PricePoint, ForecastError> {
    let timestamp = DateTime::<Utc>::from_timestamp_millis(candle.close_time).ok_or_else(|| {
        ForecastError::MalformedUpstreamData {
            reason: format!("close time {} is out of range", candle.close_time),
        }
    })?;

    let price = candle
        .close
        .to_f64()
        .filter(|p| p.is_finite())
        .ok_or_else(|| ForecastError::MalformedUpstreamData {
            reason: format!("close price {} is not representable", candle.close),
        })?;

    Ok(PricePoint { timestamp, price })
}
