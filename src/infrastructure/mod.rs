pub mod binance;
pub mod core;
pub mod mock;
pub mod observability;

pub use binance::BinanceMarketDataService;
pub use mock::{MockForecastEngine, MockMarketDataService};
