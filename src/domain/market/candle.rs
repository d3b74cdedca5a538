use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One kline record as returned by the exchange.
///
/// Times are epoch milliseconds. Only `close_time` and `close` are consumed by
/// the series normalizer; the other fields are kept so the record stays a
/// faithful copy of the upstream row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candle {
    pub open_time: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    pub close_time: i64,
    pub quote_asset_volume: Decimal,
    pub number_of_trades: u64,
    pub taker_buy_base_asset_volume: Decimal,
    pub taker_buy_quote_asset_volume: Decimal,
}

impl Candle {
    /// Flat candle at `close` spanning `[close_time - interval_ms + 1, close_time]`.
    /// Used by fixtures and the mock market data service.
    pub fn flat(close_time: i64, interval_ms: i64, close: Decimal) -> Self {
        Self {
            open_time: close_time - interval_ms + 1,
            open: close,
            high: close,
            low: close,
            close,
            volume: Decimal::ZERO,
            close_time,
            quote_asset_volume: Decimal::ZERO,
            number_of_trades: 0,
            taker_buy_base_asset_volume: Decimal::ZERO,
            taker_buy_quote_asset_volume: Decimal::ZERO,
        }
    }
}
