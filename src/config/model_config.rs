//! Forecasting model configuration.

use super::{Lookup, parse_or};
use crate::application::ml::onnx_engine::DEFAULT_CONTEXT_LENGTH;
use crate::domain::forecast::DEFAULT_MAX_HORIZON;
use anyhow::Result;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ModelEnvConfig {
    /// Exported ONNX model; unset means forecasts are unavailable
    pub model_path: Option<PathBuf>,
    pub model_name: String,
    pub max_horizon: usize,
    pub context_length: usize,
}

impl Default for ModelEnvConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            model_name: "amazon/chronos-t5-small".to_string(),
            max_horizon: DEFAULT_MAX_HORIZON,
            context_length: DEFAULT_CONTEXT_LENGTH,
        }
    }
}

impl ModelEnvConfig {
    pub fn from_lookup(lookup: &Lookup) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            model_path: lookup("MODEL_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            model_name: lookup("MODEL_NAME").unwrap_or(defaults.model_name),
            max_horizon: parse_or(lookup, "MODEL_MAX_HORIZON", defaults.max_horizon)?.max(1),
            context_length: parse_or(lookup, "MODEL_CONTEXT_LENGTH", defaults.context_length)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_config_defaults() {
        let config = ModelEnvConfig::from_lookup(&|_| None).unwrap();
        assert!(config.model_path.is_none());
        assert_eq!(config.max_horizon, 64);
        assert_eq!(config.context_length, 512);
    }

    #[test]
    fn test_model_config_ignores_blank_path() {
        let config =
            ModelEnvConfig::from_lookup(&|key| (key == "MODEL_PATH").then(|| "  ".to_string()))
                .unwrap();
        assert!(config.model_path.is_none());
    }
}
