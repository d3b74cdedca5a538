//! Inference Service
//!
//! Runs one request end to end: resolve the token, validate the horizon and
//! interval, fetch candles, normalize them, then either forecast or compute
//! volatility. Input is validated in a fixed order (symbol, horizon,
//! interval, model availability) before any market data is requested.
//!
//! Every failure is logged here with the request context and returned as a
//! `ForecastError`; callers only need to shape the response.

use crate::application::forecasting::{EngineHandle, Forecaster};
use crate::application::volatility::volatility;
use crate::domain::errors::ForecastError;
use crate::domain::forecast::{DEFAULT_MAX_HORIZON, ForecastResult, Horizon};
use crate::domain::market::series::normalize;
use crate::domain::market::symbol::resolve;
use crate::domain::market::{Interval, PriceSeries, TradingPair};
use crate::domain::ports::MarketDataService;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Binance's maximum klines page size
pub const MAX_CANDLE_LIMIT: usize = 1000;

/// Request defaults applied when the caller does not override them
#[derive(Debug, Clone)]
pub struct InferenceSettings {
    pub interval: Interval,
    pub limit: usize,
    pub max_horizon: usize,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            interval: Interval::OneMin,
            limit: MAX_CANDLE_LIMIT,
            max_horizon: DEFAULT_MAX_HORIZON,
        }
    }
}

/// Context attached to every log line of a request
#[derive(Debug, Default)]
struct RequestContext<'a> {
    operation: &'static str,
    token: &'a str,
    pair: Option<TradingPair>,
    interval: Option<Interval>,
    horizon: Option<Horizon>,
}

pub struct InferenceService {
    market_data: Arc<dyn MarketDataService>,
    forecaster: Arc<Forecaster>,
    settings: InferenceSettings,
}

impl InferenceService {
    pub fn new(
        market_data: Arc<dyn MarketDataService>,
        engine: EngineHandle,
        settings: InferenceSettings,
    ) -> Self {
        Self {
            market_data,
            forecaster: Arc::new(Forecaster::new(engine)),
            settings,
        }
    }

    pub fn settings(&self) -> &InferenceSettings {
        &self.settings
    }

    pub fn model_ready(&self) -> bool {
        self.forecaster.engine().is_ready()
    }

    /// Legacy single-step forecast for `token`
    pub async fn forecast_value(
        &self,
        token: &str,
        interval: Option<&str>,
    ) -> Result<ForecastResult, ForecastError> {
        let mut ctx = RequestContext {
            operation: "forecast_value",
            token,
            horizon: Some(Horizon::ONE),
            ..Default::default()
        };
        let result = self.forecast_value_inner(&mut ctx, interval).await;
        self.report(&ctx, result)
    }

    /// Multi-step forecast; `horizon` is the raw path segment
    pub async fn forecast_path(
        &self,
        token: &str,
        horizon: &str,
        interval: Option<&str>,
    ) -> Result<ForecastResult, ForecastError> {
        let mut ctx = RequestContext {
            operation: "forecast_path",
            token,
            ..Default::default()
        };
        let result = self.forecast_path_inner(&mut ctx, horizon, interval).await;
        self.report(&ctx, result)
    }

    /// Percentage change across the trimmed window; works without the model
    pub async fn volatility(
        &self,
        token: &str,
        interval: Option<&str>,
    ) -> Result<f64, ForecastError> {
        let mut ctx = RequestContext {
            operation: "volatility",
            token,
            ..Default::default()
        };
        let result = self.volatility_inner(&mut ctx, interval).await;
        self.report(&ctx, result)
    }

    async fn forecast_value_inner(
        &self,
        ctx: &mut RequestContext<'_>,
        interval: Option<&str>,
    ) -> Result<ForecastResult, ForecastError> {
        let pair = resolve(ctx.token)?;
        ctx.pair = Some(pair);
        let interval = self.interval(interval)?;
        ctx.interval = Some(interval);
        self.ensure_model_ready()?;

        let series = self.load_series(pair, interval).await?;
        let forecaster = Arc::clone(&self.forecaster);
        let value = run_blocking(move || forecaster.forecast_point(&series)).await?;
        Ok(ForecastResult::Point(value))
    }

    async fn forecast_path_inner(
        &self,
        ctx: &mut RequestContext<'_>,
        horizon: &str,
        interval: Option<&str>,
    ) -> Result<ForecastResult, ForecastError> {
        let pair = resolve(ctx.token)?;
        ctx.pair = Some(pair);
        let horizon = Horizon::parse(horizon, self.settings.max_horizon)?;
        ctx.horizon = Some(horizon);
        let interval = self.interval(interval)?;
        ctx.interval = Some(interval);
        self.ensure_model_ready()?;

        let series = self.load_series(pair, interval).await?;
        let forecaster = Arc::clone(&self.forecaster);
        let values = run_blocking(move || forecaster.forecast(&series, horizon)).await?;
        Ok(ForecastResult::Path(values))
    }

    async fn volatility_inner(
        &self,
        ctx: &mut RequestContext<'_>,
        interval: Option<&str>,
    ) -> Result<f64, ForecastError> {
        let pair = resolve(ctx.token)?;
        ctx.pair = Some(pair);
        let interval = self.interval(interval)?;
        ctx.interval = Some(interval);

        let series = self.load_series(pair, interval).await?;
        volatility(&series)
    }

    fn interval(&self, requested: Option<&str>) -> Result<Interval, ForecastError> {
        match requested {
            Some(raw) => raw.parse(),
            None => Ok(self.settings.interval),
        }
    }

    fn ensure_model_ready(&self) -> Result<(), ForecastError> {
        match self.forecaster.engine() {
            EngineHandle::Ready(_) => Ok(()),
            EngineHandle::Unavailable(reason) => Err(ForecastError::ModelUnavailable {
                reason: reason.clone(),
            }),
        }
    }

    async fn load_series(
        &self,
        pair: TradingPair,
        interval: Interval,
    ) -> Result<PriceSeries, ForecastError> {
        let candles = self
            .market_data
            .fetch_candles(pair, interval, self.settings.limit)
            .await?;
        normalize(&candles)
    }

    fn report<T>(
        &self,
        ctx: &RequestContext<'_>,
        result: Result<T, ForecastError>,
    ) -> Result<T, ForecastError> {
        let pair = ctx.pair.map(|p| p.as_str()).unwrap_or("-");
        let interval = ctx.interval.map(|i| i.to_binance_string()).unwrap_or("-");
        let horizon = ctx.horizon.map(|h| h.steps()).unwrap_or(0);

        match &result {
            Ok(_) => info!(
                operation = ctx.operation,
                token = ctx.token,
                pair,
                interval,
                limit = self.settings.limit,
                horizon,
                "InferenceService: request completed"
            ),
            Err(e) if e.is_client_error() => warn!(
                operation = ctx.operation,
                token = ctx.token,
                pair,
                interval,
                limit = self.settings.limit,
                horizon,
                kind = e.kind(),
                "InferenceService: rejected request: {}",
                e
            ),
            Err(e) => error!(
                operation = ctx.operation,
                token = ctx.token,
                pair,
                interval,
                limit = self.settings.limit,
                horizon,
                kind = e.kind(),
                "InferenceService: request failed: {}",
                e
            ),
        }
        result
    }
}

/// Run synchronous model inference off the async workers
async fn run_blocking<T, F>(f: F) -> Result<T, ForecastError>
where
    F: FnOnce() -> Result<T, ForecastError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ForecastError::PredictionError {
            reason: format!("inference task failed: {e}"),
        })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mock::{MockForecastEngine, MockMarketDataService};
    use rust_decimal::Decimal;
    use std::io;
    use std::sync::Mutex;

    /// In-memory sink for the fmt subscriber
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn service(market: &MockMarketDataService, engine: EngineHandle) -> InferenceService {
        InferenceService::new(
            Arc::new(market.clone()),
            engine,
            InferenceSettings::default(),
        )
    }

    fn scenario_market() -> MockMarketDataService {
        MockMarketDataService::with_closes(&[
            Decimal::from(100),
            Decimal::from(102),
            Decimal::from(99),
            Decimal::from(101),
        ])
    }

    #[tokio::test]
    async fn test_unknown_symbol_makes_no_upstream_call() {
        let market = scenario_market();
        let engine = MockForecastEngine::constant(1.0);
        let svc = service(&market, EngineHandle::ready(engine.clone()));

        for token in ["DOGE", "xrp", ""] {
            assert!(matches!(
                svc.forecast_value(token, None).await,
                Err(ForecastError::UnsupportedSymbol { .. })
            ));
            assert!(matches!(
                svc.volatility(token, None).await,
                Err(ForecastError::UnsupportedSymbol { .. })
            ));
            assert!(matches!(
                svc.forecast_path(token, "3", None).await,
                Err(ForecastError::UnsupportedSymbol { .. })
            ));
        }

        assert_eq!(market.calls(), 0);
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_horizon_rejected_before_io() {
        let market = scenario_market();
        let svc = service(&market, EngineHandle::ready(MockForecastEngine::constant(1.0)));

        for horizon in ["0", "-4", "abc", "65"] {
            assert!(matches!(
                svc.forecast_path("ETH", horizon, None).await,
                Err(ForecastError::InvalidHorizon { .. })
            ));
        }
        assert_eq!(market.calls(), 0);
    }

    #[tokio::test]
    async fn test_symbol_checked_before_horizon() {
        let market = scenario_market();
        let svc = service(&market, EngineHandle::ready(MockForecastEngine::constant(1.0)));
        assert!(matches!(
            svc.forecast_path("DOGE", "0", None).await,
            Err(ForecastError::UnsupportedSymbol { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_interval_rejected_before_io() {
        let market = scenario_market();
        let svc = service(&market, EngineHandle::ready(MockForecastEngine::constant(1.0)));
        assert!(matches!(
            svc.volatility("ETH", Some("1h")).await,
            Err(ForecastError::InvalidInterval { .. })
        ));
        assert_eq!(market.calls(), 0);
    }

    #[tokio::test]
    async fn test_volatility_scenario() {
        let market = scenario_market();
        let svc = service(&market, EngineHandle::ready(MockForecastEngine::constant(1.0)));
        let vol = svc.volatility("eth", None).await.unwrap();
        assert!((vol - 1.0).abs() < 1e-12);

        let request = market.last_request().unwrap();
        assert_eq!(request.0.as_str(), "ETHUSDT");
        assert_eq!(request.1, Interval::OneMin);
        assert_eq!(request.2, MAX_CANDLE_LIMIT);
    }

    #[tokio::test]
    async fn test_volatility_works_without_model() {
        let market = scenario_market();
        let svc = service(&market, EngineHandle::Unavailable("load failed".to_string()));
        assert!(svc.volatility("BTC", Some("5m")).await.is_ok());
        assert_eq!(market.last_request().unwrap().1, Interval::FiveMin);
    }

    #[tokio::test]
    async fn test_forecast_fails_fast_without_model() {
        let market = scenario_market();
        let svc = service(&market, EngineHandle::Unavailable("load failed".to_string()));
        assert!(matches!(
            svc.forecast_value("BTC", None).await,
            Err(ForecastError::ModelUnavailable { .. })
        ));
        assert!(matches!(
            svc.forecast_path("BTC", "4", None).await,
            Err(ForecastError::ModelUnavailable { .. })
        ));
        assert_eq!(market.calls(), 0);
    }

    #[tokio::test]
    async fn test_forecast_shapes() {
        let market = scenario_market();
        let engine = MockForecastEngine::constant(100.5);
        let svc = service(&market, EngineHandle::ready(engine.clone()));

        let value = svc.forecast_value("SOL", None).await.unwrap();
        assert_eq!(value, ForecastResult::Point(100.5));

        let path = svc.forecast_path("SOL", "6", None).await.unwrap();
        assert_eq!(path, ForecastResult::Path(vec![100.5; 6]));

        // Trailing candle never reaches the model
        assert_eq!(engine.last_context_len(), Some(3));
        assert_eq!(engine.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_upstream_never_reaches_engine() {
        let market = MockMarketDataService::failing(ForecastError::EmptyUpstreamData {
            pair: "ETHUSDT".to_string(),
        });
        let engine = MockForecastEngine::constant(1.0);
        let svc = service(&market, EngineHandle::ready(engine.clone()));

        assert!(matches!(
            svc.forecast_value("ETH", None).await,
            Err(ForecastError::EmptyUpstreamData { .. })
        ));
        assert_eq!(market.calls(), 1);
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn test_single_candle_is_empty_series() {
        let market = MockMarketDataService::with_closes(&[Decimal::from(5)]);
        let svc = service(&market, EngineHandle::ready(MockForecastEngine::constant(1.0)));
        assert!(matches!(
            svc.volatility("ETH", None).await,
            Err(ForecastError::EmptySeries { candles: 1 })
        ));
    }

    #[tokio::test]
    async fn test_rejected_request_logs_resolved_context() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let market = scenario_market();
        let svc = service(&market, EngineHandle::ready(MockForecastEngine::constant(1.0)));

        // Horizon resolved, interval rejected
        assert!(svc.forecast_path("eth", "4", Some("1h")).await.is_err());

        let output = logs.contents();
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("ETHUSDT"), "{output}");
        assert!(output.contains("limit=1000"), "{output}");
        assert!(output.contains("horizon=4"), "{output}");
        assert!(output.contains("invalid_interval"), "{output}");
    }
}
