//! Binance Market Data Service
//!
//! Fetches historical candles (klines) for a trading pair with a single
//! bounded GET per request:
//! `GET {base_url}/api/v3/klines?symbol=ETHUSDT&interval=1m&limit=1000`

use crate::domain::errors::ForecastError;
use crate::domain::market::{Candle, Interval, TradingPair};
use crate::domain::ports::MarketDataService;
use crate::infrastructure::core::http_client_factory::HttpClientFactory;
use crate::infrastructure::observability::{LatencyGuard, Metrics};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Binance klines row:
/// [openTime, open, high, low, close, volume, closeTime, quoteVolume,
///  trades, takerBuyBase, takerBuyQuote, ignore]
type KlineRow = (
    i64,
    String,
    String,
    String,
    String,
    String,
    i64,
    String,
    u64,
    String,
    String,
    serde_json::Value,
);

pub struct BinanceMarketDataService {
    client: Client,
    base_url: String,
    timeout: Duration,
    metrics: Option<Metrics>,
}

impl BinanceMarketDataService {
    pub fn builder() -> BinanceMarketDataServiceBuilder {
        BinanceMarketDataServiceBuilder::default()
    }

    fn transport_error(&self, e: reqwest::Error) -> ForecastError {
        if e.is_timeout() {
            ForecastError::UpstreamTimeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            ForecastError::upstream(0, &e.to_string())
        }
    }
}

#[derive(Default)]
pub struct BinanceMarketDataServiceBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    metrics: Option<Metrics>,
}

impl BinanceMarketDataServiceBuilder {
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = Some(connect_timeout);
        self
    }

    pub fn metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> Result<BinanceMarketDataService> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let connect_timeout = self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT);

        let client = HttpClientFactory::create_client(timeout, connect_timeout)?;

        Ok(BinanceMarketDataService {
            client,
            base_url,
            timeout,
            metrics: self.metrics,
        })
    }
}

#[async_trait]
impl MarketDataService for BinanceMarketDataService {
    async fn fetch_candles(
        &self,
        pair: TradingPair,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, ForecastError> {
        let url = format!("{}/api/v3/klines", self.base_url);
        let limit_str = limit.to_string();

        debug!(
            "BinanceMarketDataService: GET {} symbol={} interval={} limit={}",
            url, pair, interval, limit
        );

        let _latency = self.metrics.as_ref().map(|m| {
            LatencyGuard::new(m.upstream_latency_seconds.with_label_values(&["klines"]))
        });

        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", pair.as_str()),
                ("interval", interval.to_binance_string()),
                ("limit", limit_str.as_str()),
            ])
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if status != StatusCode::OK {
            warn!(
                "BinanceMarketDataService: klines for {} returned {}",
                pair, status
            );
            return Err(ForecastError::upstream(status.as_u16(), &body));
        }

        let candles = parse_klines(&body)?;
        if candles.is_empty() {
            return Err(ForecastError::EmptyUpstreamData {
                pair: pair.to_string(),
            });
        }

        info!(
            "BinanceMarketDataService: Fetched {} bars for {}",
            candles.len(),
            pair
        );

        Ok(candles)
    }
}

/// Decode a klines response body. An empty body decodes to no candles.
pub fn parse_klines(body: &str) -> Result<Vec<Candle>, ForecastError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<KlineRow> =
        serde_json::from_str(body).map_err(|e| ForecastError::MalformedUpstreamData {
            reason: format!("klines response is not an array of kline rows: {e}"),
        })?;

    rows.into_iter().map(row_to_candle).collect()
}

fn row_to_candle(row: KlineRow) -> Result<Candle, ForecastError> {
    let (
        open_time,
        open,
        high,
        low,
        close,
        volume,
        close_time,
        quote_asset_volume,
        number_of_trades,
        taker_buy_base_asset_volume,
        taker_buy_quote_asset_volume,
        _ignore,
    ) = row;

    Ok(Candle {
        open_time,
        open: decimal("open", &open)?,
        high: decimal("high", &high)?,
        low: decimal("low", &low)?,
        close: decimal("close", &close)?,
        volume: decimal("volume", &volume)?,
        close_time,
        quote_asset_volume: decimal("quote_asset_volume", &quote_asset_volume)?,
        number_of_trades,
        taker_buy_base_asset_volume: decimal(
            "taker_buy_base_asset_volume",
            &taker_buy_base_asset_volume,
        )?,
        taker_buy_quote_asset_volume: decimal(
            "taker_buy_quote_asset_volume",
            &taker_buy_quote_asset_volume,
        )?,
    })
}

fn decimal(field: &str, raw: &str) -> Result<Decimal, ForecastError> {
    Decimal::from_str(raw).map_err(|e| ForecastError::MalformedUpstreamData {
        reason: format!("{field} '{raw}' is not a decimal: {e}"),
    })
}
