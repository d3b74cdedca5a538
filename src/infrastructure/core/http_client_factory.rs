use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("pricecast/", env!("CARGO_PKG_VERSION"));

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates an HTTP client with bounded timeouts.
    ///
    /// No retry middleware: a failed upstream call surfaces to the caller
    /// immediately and any retry policy belongs outside the service.
    pub fn create_client(timeout: Duration, connect_timeout: Duration) -> Result<Client> {
        Client::builder()
            .pool_max_idle_per_host(5)
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")
    }
}
