// Market data domain (symbols, candles, series)
pub mod market;

// Forecast request/response types
pub mod forecast;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
