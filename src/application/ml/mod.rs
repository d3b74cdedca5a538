pub mod onnx_engine;

use crate::application::forecasting::EngineHandle;
use crate::config::ModelEnvConfig;
use onnx_engine::OnnxForecastEngine;
use std::sync::Arc;
use tracing::{error, info};

/// Load the forecasting engine configured for this process.
///
/// Never fails: a load error is recorded in the handle so the service can
/// still start and serve volatility requests.
pub fn load_engine(config: &ModelEnvConfig) -> EngineHandle {
    let Some(path) = &config.model_path else {
        error!("MODEL_PATH is not set. Forecast routes will return model_unavailable.");
        return EngineHandle::Unavailable("no model path configured".to_string());
    };

    match OnnxForecastEngine::load(path, &config.model_name, config.context_length) {
        Ok(engine) => {
            info!("Forecasting engine ready: {}", config.model_name);
            EngineHandle::Ready(Arc::new(engine))
        }
        Err(e) => {
            error!("Failed to load forecasting engine: {:#}", e);
            EngineHandle::Unavailable(format!("{:#}", e))
        }
    }
}
