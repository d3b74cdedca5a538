use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::application::inference_service::InferenceService;
use crate::application::ml::load_engine;
use crate::config::Config;
use crate::domain::ports::MarketDataService;
use crate::infrastructure::binance::BinanceMarketDataService;
use crate::infrastructure::observability::Metrics;

pub struct ServicesBootstrap;

impl ServicesBootstrap {
    /// Wire the Binance client and the forecasting engine into one service.
    ///
    /// The engine is loaded here, exactly once per process.
    pub fn init(config: &Config, metrics: Option<Metrics>) -> Result<Arc<InferenceService>> {
        let mut builder = BinanceMarketDataService::builder()
            .base_url(config.binance.base_url.clone())
            .timeout(config.binance.timeout)
            .connect_timeout(config.binance.connect_timeout);
        if let Some(metrics) = metrics {
            builder = builder.metrics(metrics);
        }
        let market_data: Arc<dyn MarketDataService> = Arc::new(builder.build()?);

        info!(
            "Market data: {} (interval={}, limit={}, timeout={}ms)",
            config.binance.base_url,
            config.binance.interval,
            config.binance.kline_limit,
            config.binance.timeout.as_millis()
        );

        let engine = load_engine(&config.model);

        Ok(Arc::new(InferenceService::new(
            market_data,
            engine,
            config.inference_settings(),
        )))
    }
}
