//! Binance market data configuration.

use super::{Lookup, parse_or};
use crate::application::inference_service::MAX_CANDLE_LIMIT;
use crate::domain::market::Interval;
use anyhow::{Context, Result};
use std::time::Duration;

/// Smallest window that still leaves one price after trimming
const MIN_CANDLE_LIMIT: usize = 2;

/// Upper bound for both upstream timeouts (ms)
const MAX_TIMEOUT_MS: u64 = 10_000;

/// Binance API configuration
#[derive(Debug, Clone)]
pub struct BinanceConfig {
    pub base_url: String,
    pub interval: Interval,
    pub kline_limit: usize,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.binance.com".to_string(),
            interval: Interval::OneMin,
            kline_limit: MAX_CANDLE_LIMIT,
            timeout: Duration::from_millis(5000),
            connect_timeout: Duration::from_millis(2000),
        }
    }
}

impl BinanceConfig {
    pub fn from_lookup(lookup: &Lookup) -> Result<Self> {
        let defaults = Self::default();

        let interval = match lookup("BINANCE_KLINE_INTERVAL") {
            Some(raw) => raw
                .parse::<Interval>()
                .with_context(|| format!("Invalid BINANCE_KLINE_INTERVAL: {}", raw))?,
            None => defaults.interval,
        };

        let kline_limit = parse_or(lookup, "BINANCE_KLINE_LIMIT", defaults.kline_limit)?
            .clamp(MIN_CANDLE_LIMIT, MAX_CANDLE_LIMIT);

        let timeout_ms =
            parse_or(lookup, "BINANCE_TIMEOUT_MS", 5000u64)?.clamp(1, MAX_TIMEOUT_MS);
        let connect_timeout_ms =
            parse_or(lookup, "BINANCE_CONNECT_TIMEOUT_MS", 2000u64)?.clamp(1, timeout_ms);

        Ok(Self {
            base_url: lookup("BINANCE_BASE_URL").unwrap_or(defaults.base_url),
            interval,
            kline_limit,
            timeout: Duration::from_millis(timeout_ms),
            connect_timeout: Duration::from_millis(connect_timeout_ms),
        })
    }
}
