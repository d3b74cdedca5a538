// Service wiring for the binaries
pub mod bootstrap;

// Forecast orchestration around the external model
pub mod forecasting;

// Per-request pipeline shared by the HTTP routes and the CLI
pub mod inference_service;

// Model loading (ONNX runtime)
pub mod ml;

// Price-change metric computed without the model
pub mod volatility;
