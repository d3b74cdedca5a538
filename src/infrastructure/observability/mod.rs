//! Prometheus metrics for the inference service
//!
//! Counters and histograms are registered on a private registry and rendered
//! in the text exposition format on `GET /metrics`.

pub mod latency_tracker;
pub mod metrics;

pub use latency_tracker::LatencyGuard;
pub use metrics::Metrics;
