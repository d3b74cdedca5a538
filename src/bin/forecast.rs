//! One-shot forecasting CLI
//!
//! Runs the same pipeline as the server for a single token and prints JSON.

use anyhow::Result;
use clap::{Parser, Subcommand};
use pricecast::application::bootstrap::ServicesBootstrap;
use pricecast::application::inference_service::InferenceService;
use pricecast::config::Config;
use pricecast::domain::errors::ForecastError;
use pricecast::domain::market::TradingPair;
use serde_json::{Value, json};

#[derive(Parser)]
#[command(author, version, about = "Forecast a token from recent Binance candles", long_about = None)]
struct Cli {
    /// Kline interval override (1m or 5m)
    #[arg(short, long, global = true)]
    interval: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Single forecast value (horizon 1)
    Value {
        /// Token to forecast (ETH, SOL, BTC, BNB, ARB)
        token: String,
    },
    /// One forecast value per step
    Path {
        token: String,

        /// Number of steps to forecast
        #[arg(short = 'n', long, default_value = "12")]
        horizon: i64,
    },
    /// Percentage change across the candle window
    Volatility { token: String },
    /// List supported tokens
    Symbols,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let interval = cli.interval.as_deref();

    let output = match cli.command {
        Commands::Symbols => Ok(symbols()),
        command => {
            let config = Config::from_env()?;
            let service = ServicesBootstrap::init(&config, None)?;
            run(&service, command, interval).await
        }
    };

    match output {
        Ok(body) => {
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&json!({ "error": e.to_string(), "kind": e.kind() }))?
            );
            std::process::exit(if e.is_client_error() { 2 } else { 1 });
        }
    }
}

async fn run(
    service: &InferenceService,
    command: Commands,
    interval: Option<&str>,
) -> Result<Value, ForecastError> {
    match command {
        Commands::Value { token } => service
            .forecast_value(&token, interval)
            .await
            .map(|r| json!({ "forecast": r.values().first() })),
        Commands::Path { token, horizon } => service
            .forecast_path(&token, &horizon.to_string(), interval)
            .await
            .map(|r| json!({ "cast": r.values() })),
        Commands::Volatility { token } => service
            .volatility(&token, interval)
            .await
            .map(|v| json!({ "volatility": v })),
        Commands::Symbols => Ok(symbols()),
    }
}

fn symbols() -> Value {
    let symbols: Vec<_> = TradingPair::supported()
        .into_iter()
        .map(|p| json!({ "token": p.token(), "pair": p.as_str() }))
        .collect();
    json!({ "symbols": symbols })
}
