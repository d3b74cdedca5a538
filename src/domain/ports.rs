use crate::domain::errors::ForecastError;
use crate::domain::market::{Candle, Interval, TradingPair};
use async_trait::async_trait;
use ndarray::{Array2, ArrayD};

#[async_trait]
pub trait MarketDataService: Send + Sync {
    /// Fetch the most recent `limit` candles for `pair`, oldest first.
    /// A single attempt; no retries.
    async fn fetch_candles(
        &self,
        pair: TradingPair,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, ForecastError>;
}

/// Interface for the external forecasting model
pub trait ForecastEngine: Send + Sync {
    /// Forecast `horizon` steps from a `[batch, context]` price tensor.
    /// Returns a distribution of shape `[batch, samples_or_quantiles, horizon]`.
    fn predict(&self, context: &Array2<f32>, horizon: usize) -> Result<ArrayD<f32>, String>;

    /// Get model name/type
    fn name(&self) -> &str;
}
