use crate::application::inference_service::InferenceService;
use crate::infrastructure::observability::Metrics;
use std::sync::Arc;

/// Shared application state, passed to all route handlers via `axum::extract::State`.
pub struct AppState {
    pub service: Arc<InferenceService>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(service: Arc<InferenceService>, metrics: Metrics) -> Arc<Self> {
        metrics.set_model_ready(service.model_ready());
        Arc::new(Self { service, metrics })
    }
}
