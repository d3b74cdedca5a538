use crate::domain::errors::ForecastError;
use crate::domain::market::PriceSeries;

/// Percentage move between the oldest and newest retained prices
///
/// `|last - first| / first * 100`. Upstream prices are untrusted, so a zero
/// (or non-finite) base price is reported instead of producing inf/NaN.
pub fn volatility(series: &PriceSeries) -> Result<f64, ForecastError> {
    let first = series.first().price;
    let last = series.last().price;

    if first == 0.0 || !first.is_finite() {
        return Err(ForecastError::DivisionByZero { base_price: first });
    }

    Ok((last - first).abs() / first * 100.0)
}
