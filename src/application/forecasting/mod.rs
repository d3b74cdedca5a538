pub mod orchestrator;

pub use orchestrator::{EngineHandle, Forecaster};
