use crate::domain::errors::ForecastError;
use serde::Serialize;
use std::fmt;

/// Binance trading pairs the service accepts, keyed by the user-facing token
const SYMBOL_TABLE: &[(&str, &str)] = &[
    ("ETH", "ETHUSDT"),
    ("SOL", "SOLUSDT"),
    ("BTC", "BTCUSDT"),
    ("BNB", "BNBUSDT"),
    ("ARB", "ARBUSDT"),
];

/// Exchange identifier for a resolved token (e.g. "ETHUSDT")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TradingPair {
    token: &'static str,
    pair: &'static str,
}

impl TradingPair {
    /// Token as listed in the allow-list ("ETH")
    pub fn token(&self) -> &'static str {
        self.token
    }

    /// Exchange symbol sent upstream ("ETHUSDT")
    pub fn as_str(&self) -> &'static str {
        self.pair
    }

    /// Every supported pair, in allow-list order
    pub fn supported() -> Vec<TradingPair> {
        SYMBOL_TABLE
            .iter()
            .map(|&(token, pair)| TradingPair { token, pair })
            .collect()
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pair)
    }
}

/// Map a case-insensitive token onto its trading pair.
///
/// # Examples
/// ```
/// use pricecast::domain::market::symbol::resolve;
///
/// assert_eq!(resolve("eth").unwrap().as_str(), "ETHUSDT");
/// assert!(resolve("DOGE").is_err());
/// ```
pub fn resolve(token: &str) -> Result<TradingPair, ForecastError> {
    let normalized = token.trim().to_uppercase();
    SYMBOL_TABLE
        .iter()
        .find(|(known, _)| *known == normalized)
        .map(|&(token, pair)| TradingPair { token, pair })
        .ok_or_else(|| ForecastError::UnsupportedSymbol {
            token: token.to_string(),
        })
}
