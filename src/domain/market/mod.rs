// Exchange-facing market types
pub mod candle;
pub mod interval;
pub mod series;
pub mod symbol;

pub use candle::Candle;
pub use interval::Interval;
pub use series::{PricePoint, PriceSeries};
pub use symbol::TradingPair;
