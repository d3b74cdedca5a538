//! Configuration module for pricecast.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Server, Binance and Model.

mod binance_config;
mod model_config;
mod server_config;

pub use binance_config::BinanceConfig;
pub use model_config::ModelEnvConfig;
pub use server_config::ServerEnvConfig;

use crate::application::inference_service::InferenceSettings;
use anyhow::{Result, anyhow};
use std::env;
use std::str::FromStr;

/// Source of configuration values, keyed by environment variable name
pub type Lookup = dyn Fn(&str) -> Option<String>;

/// Parse `key` if present, otherwise fall back to `default`
pub(crate) fn parse_or<T>(lookup: &Lookup, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("Invalid {}: {} ({})", key, raw, e)),
        None => Ok(default),
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerEnvConfig,
    pub binance: BinanceConfig,
    pub model: ModelEnvConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: &Lookup) -> Result<Self> {
        Ok(Self {
            server: ServerEnvConfig::from_lookup(lookup)?,
            binance: BinanceConfig::from_lookup(lookup)?,
            model: ModelEnvConfig::from_lookup(lookup)?,
        })
    }

    /// Per-request defaults handed to the inference service
    pub fn inference_settings(&self) -> InferenceSettings {
        InferenceSettings {
            interval: self.binance.interval,
            limit: self.binance.kline_limit,
            max_horizon: self.model.max_horizon,
        }
    }
}
