use crate::domain::errors::ForecastError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kline intervals the service requests from the exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Interval {
    #[default]
    OneMin,
    FiveMin,
}

impl Interval {
    /// Converts to Binance API interval string
    pub fn to_binance_string(&self) -> &'static str {
        match self {
            Interval::OneMin => "1m",
            Interval::FiveMin => "5m",
        }
    }

    /// Returns the duration of one candle in milliseconds
    pub fn to_millis(&self) -> i64 {
        match self {
            Interval::OneMin => 60_000,
            Interval::FiveMin => 300_000,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_binance_string())
    }
}

impl FromStr for Interval {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1m" => Ok(Interval::OneMin),
            "5m" => Ok(Interval::FiveMin),
            other => Err(ForecastError::InvalidInterval {
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_binance_strings() {
        assert_eq!("1m".parse::<Interval>().unwrap(), Interval::OneMin);
        assert_eq!("5m".parse::<Interval>().unwrap(), Interval::FiveMin);
        assert_eq!(Interval::FiveMin.to_string(), "5m");
        assert_eq!(Interval::default(), Interval::OneMin);
    }

    #[test]
    fn test_parse_rejects_other_intervals() {
        for raw in ["1h", "1M", "", "15m"] {
            assert!(matches!(
                raw.parse::<Interval>(),
                Err(ForecastError::InvalidInterval { .. })
            ));
        }
    }
}
