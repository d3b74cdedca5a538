use httpmock::prelude::*;
use pricecast::domain::errors::ForecastError;
use pricecast::domain::market::Interval;
use pricecast::domain::market::symbol::resolve;
use pricecast::domain::ports::MarketDataService;
use pricecast::infrastructure::binance::BinanceMarketDataService;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use std::time::Duration;

fn kline(close_time: i64, close: &str) -> Value {
    json!([
        close_time - 59_999,
        close,
        close,
        close,
        close,
        "12.5",
        close_time,
        "1250.0",
        42,
        "6.0",
        "600.0",
        "0"
    ])
}

fn client(server: &MockServer, timeout: Duration) -> BinanceMarketDataService {
    BinanceMarketDataService::builder()
        .base_url(server.base_url())
        .timeout(timeout)
        .build()
        .expect("client should build")
}

#[tokio::test]
async fn fetch_candles_sends_symbol_interval_and_limit() {
    let server = MockServer::start_async().await;
    let body = json!([
        kline(1_700_000_059_999, "100.0"),
        kline(1_700_000_119_999, "102.0"),
        kline(1_700_000_179_999, "99.0"),
    ]);

    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v3/klines")
                .query_param("symbol", "ETHUSDT")
                .query_param("interval", "5m")
                .query_param("limit", "3");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(body);
        })
        .await;

    let candles = client(&server, Duration::from_secs(2))
        .fetch_candles(resolve("eth").unwrap(), Interval::FiveMin, 3)
        .await
        .expect("klines should decode");

    mock.assert_async().await;
    assert_eq!(candles.len(), 3);
    assert_eq!(candles[0].close, dec!(100.0));
    assert_eq!(candles[2].close_time, 1_700_000_179_999);
    assert_eq!(candles[1].number_of_trades, 42);
}

#[tokio::test]
async fn fetch_candles_maps_non_200_to_upstream_error() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v3/klines");
            then.status(400)
                .header("content-type", "application/json")
                .body(r#"{"code":-1121,"msg":"Invalid symbol."}"#);
        })
        .await;

    let err = client(&server, Duration::from_secs(2))
        .fetch_candles(resolve("BTC").unwrap(), Interval::OneMin, 1000)
        .await
        .unwrap_err();

    mock.assert_async().await;
    match err {
        ForecastError::UpstreamError { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("Invalid symbol."));
        }
        other => panic!("expected UpstreamError, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_candles_does_not_retry() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v3/klines");
            then.status(503).body("maintenance");
        })
        .await;

    let result = client(&server, Duration::from_secs(2))
        .fetch_candles(resolve("SOL").unwrap(), Interval::OneMin, 10)
        .await;

    assert!(matches!(
        result,
        Err(ForecastError::UpstreamError { status: 503, .. })
    ));
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn fetch_candles_empty_array_is_empty_upstream_data() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v3/klines");
            then.status(200)
                .header("content-type", "application/json")
                .body("[]");
        })
        .await;

    let err = client(&server, Duration::from_secs(2))
        .fetch_candles(resolve("BNB").unwrap(), Interval::OneMin, 1000)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ForecastError::EmptyUpstreamData {
            pair: "BNBUSDT".to_string()
        }
    );
}

#[tokio::test]
async fn fetch_candles_empty_body_is_empty_upstream_data() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v3/klines");
            then.status(200);
        })
        .await;

    let err = client(&server, Duration::from_secs(2))
        .fetch_candles(resolve("ARB").unwrap(), Interval::OneMin, 1000)
        .await
        .unwrap_err();

    assert!(matches!(err, ForecastError::EmptyUpstreamData { .. }));
}

#[tokio::test]
async fn fetch_candles_malformed_rows() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v3/klines");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([[1, "1.0", "2.0"]]));
        })
        .await;

    let err = client(&server, Duration::from_secs(2))
        .fetch_candles(resolve("ETH").unwrap(), Interval::OneMin, 1000)
        .await
        .unwrap_err();

    assert!(matches!(err, ForecastError::MalformedUpstreamData { .. }));
}

#[tokio::test]
async fn fetch_candles_times_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v3/klines");
            then.status(200)
                .delay(Duration::from_millis(1500))
                .json_body(json!([kline(1_700_000_059_999, "1.0")]));
        })
        .await;

    let err = client(&server, Duration::from_millis(200))
        .fetch_candles(resolve("ETH").unwrap(), Interval::OneMin, 1000)
        .await
        .unwrap_err();

    assert_eq!(err, ForecastError::UpstreamTimeout { timeout_ms: 200 });
}
