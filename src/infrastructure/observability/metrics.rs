//! Prometheus metrics definitions for pricecast
//!
//! All metrics use the `pricecast_` prefix.

use prometheus::{
    CounterVec, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Responses by route and HTTP status
    pub requests_total: CounterVec,
    /// Failed requests by error kind
    pub errors_total: CounterVec,
    /// Market data request latency in seconds
    pub upstream_latency_seconds: HistogramVec,
    /// Forecasting engine loaded (1) or unavailable (0)
    pub model_ready: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance with all collectors registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let requests_total = CounterVec::new(
            Opts::new("pricecast_requests_total", "HTTP responses by route and status"),
            &["route", "status"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let errors_total = CounterVec::new(
            Opts::new("pricecast_errors_total", "Failed requests by error kind"),
            &["kind"],
        )?;
        registry.register(Box::new(errors_total.clone()))?;

        let upstream_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "pricecast_upstream_latency_seconds",
                "Market data request latency in seconds",
            )
            .buckets(vec![0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
            &["endpoint"],
        )?;
        registry.register(Box::new(upstream_latency_seconds.clone()))?;

        let model_ready = Gauge::with_opts(Opts::new(
            "pricecast_model_ready",
            "Forecasting engine status (1=ready, 0=unavailable)",
        ))?;
        registry.register(Box::new(model_ready.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            requests_total,
            errors_total,
            upstream_latency_seconds,
            model_ready,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn inc_requests(&self, route: &str, status: u16) {
        let status = status.to_string();
        self.requests_total
            .with_label_values(&[route, status.as_str()])
            .inc();
    }

    pub fn inc_errors(&self, kind: &str) {
        self.errors_total.with_label_values(&[kind]).inc();
    }

    pub fn set_model_ready(&self, ready: bool) {
        self.model_ready.set(if ready { 1.0 } else { 0.0 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        assert!(metrics.render().contains("pricecast_model_ready"));
    }

    #[test]
    fn test_request_counter() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.inc_requests("volatility", 200);
        metrics.inc_requests("volatility", 500);
        metrics.inc_errors("empty_upstream_data");
        let output = metrics.render();
        assert!(output.contains("pricecast_requests_total"));
        assert!(output.contains("status=\"500\""));
        assert!(output.contains("kind=\"empty_upstream_data\""));
    }

    #[test]
    fn test_model_ready_gauge() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.set_model_ready(true);
        assert!(metrics.render().contains("pricecast_model_ready 1"));
        metrics.set_model_ready(false);
        assert!(metrics.render().contains("pricecast_model_ready 0"));
    }
}
