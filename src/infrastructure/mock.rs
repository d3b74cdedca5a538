//! In-memory collaborators for tests and offline runs.
//!
//! Both mocks count their calls so tests can assert that validation
//! happens before any market data request or model invocation.

use crate::domain::errors::ForecastError;
use crate::domain::market::{Candle, Interval, TradingPair};
use crate::domain::ports::{ForecastEngine, MarketDataService};
use async_trait::async_trait;
use ndarray::{Array2, ArrayD, IxDyn};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Close time of the first mock candle (ms)
const MOCK_START_MS: i64 = 1_700_000_059_999;

type CandleRequest = (TradingPair, Interval, usize);

#[derive(Clone)]
pub struct MockMarketDataService {
    response: Result<Vec<Decimal>, ForecastError>,
    calls: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<CandleRequest>>>,
}

impl MockMarketDataService {
    /// Serve one candle per close price, oldest first
    pub fn with_closes(closes: &[Decimal]) -> Self {
        Self::from_response(Ok(closes.to_vec()))
    }

    /// Fail every fetch with `error`
    pub fn failing(error: ForecastError) -> Self {
        Self::from_response(Err(error))
    }

    fn from_response(response: Result<Vec<Decimal>, ForecastError>) -> Self {
        Self {
            response,
            calls: Arc::new(AtomicUsize::new(0)),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<CandleRequest> {
        self.last_request.lock().ok().and_then(|guard| *guard)
    }
}

#[async_trait]
impl MarketDataService for MockMarketDataService {
    async fn fetch_candles(
        &self,
        pair: TradingPair,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, ForecastError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_request.lock() {
            *guard = Some((pair, interval, limit));
        }

        let closes = self.response.clone()?;
        let step = interval.to_millis();
        let skip = closes.len().saturating_sub(limit);
        Ok(closes
            .into_iter()
            .skip(skip)
            .enumerate()
            .map(|(i, close)| Candle::flat(MOCK_START_MS + step * i as i64, step, close))
            .collect())
    }
}

#[derive(Clone)]
enum EngineBehavior {
    Constant(f32),
    Shape(Vec<usize>),
    Fail(String),
}

/// Fake forecasting engine with a scripted output
#[derive(Clone)]
pub struct MockForecastEngine {
    behavior: EngineBehavior,
    samples: usize,
    calls: Arc<AtomicUsize>,
    last_context_len: Arc<Mutex<Option<usize>>>,
}

impl MockForecastEngine {
    /// Every sample of every step equals `value`
    pub fn constant(value: f32) -> Self {
        Self::new(EngineBehavior::Constant(value))
    }

    /// Zeros of a fixed shape, whatever horizon is requested
    pub fn with_shape(shape: Vec<usize>) -> Self {
        Self::new(EngineBehavior::Shape(shape))
    }

    /// Every prediction fails with `reason`
    pub fn failing(reason: &str) -> Self {
        Self::new(EngineBehavior::Fail(reason.to_string()))
    }

    fn new(behavior: EngineBehavior) -> Self {
        Self {
            behavior,
            samples: 20,
            calls: Arc::new(AtomicUsize::new(0)),
            last_context_len: Arc::new(Mutex::new(None)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_context_len(&self) -> Option<usize> {
        self.last_context_len.lock().ok().and_then(|guard| *guard)
    }
}

impl ForecastEngine for MockForecastEngine {
    fn predict(&self, context: &Array2<f32>, horizon: usize) -> Result<ArrayD<f32>, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_context_len.lock() {
            *guard = Some(context.ncols());
        }

        match &self.behavior {
            EngineBehavior::Constant(value) => Ok(ArrayD::from_elem(
                IxDyn(&[context.nrows(), self.samples, horizon]),
                *value,
            )),
            EngineBehavior::Shape(shape) => Ok(ArrayD::zeros(IxDyn(shape))),
            EngineBehavior::Fail(reason) => Err(reason.clone()),
        }
    }

    fn name(&self) -> &str {
        "Mock Forecast Engine"
    }
}
