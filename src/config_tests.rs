use crate::config::Config;
use crate::domain::market::Interval;
use std::collections::HashMap;
use std::time::Duration;

fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(&move |key| vars.get(key).cloned())
}

#[test]
fn test_config_defaults() {
    let config = config_from(&[]).unwrap();
    let settings = config.inference_settings();

    assert_eq!(settings.interval, Interval::OneMin);
    assert_eq!(settings.limit, 1000);
    assert_eq!(settings.max_horizon, 64);
    assert_eq!(config.server.port, 8000);
    assert!(config.model.model_path.is_none());
}

#[test]
fn test_config_overrides() {
    let config = config_from(&[
        ("PORT", "9100"),
        ("BINANCE_BASE_URL", "http://127.0.0.1:9999"),
        ("BINANCE_KLINE_INTERVAL", "5m"),
        ("BINANCE_KLINE_LIMIT", "300"),
        ("BINANCE_TIMEOUT_MS", "1500"),
        ("MODEL_PATH", "models/chronos.onnx"),
        ("MODEL_MAX_HORIZON", "24"),
    ])
    .unwrap();

    assert_eq!(config.server.port, 9100);
    assert_eq!(config.binance.base_url, "http://127.0.0.1:9999");
    assert_eq!(config.binance.timeout, Duration::from_millis(1500));
    assert_eq!(
        config.model.model_path.as_deref(),
        Some(std::path::Path::new("models/chronos.onnx"))
    );

    let settings = config.inference_settings();
    assert_eq!(settings.interval, Interval::FiveMin);
    assert_eq!(settings.limit, 300);
    assert_eq!(settings.max_horizon, 24);
}

#[test]
fn test_config_rejects_invalid_numbers() {
    assert!(config_from(&[("BINANCE_TIMEOUT_MS", "soon")]).is_err());
    assert!(config_from(&[("MODEL_MAX_HORIZON", "-2")]).is_err());
}
