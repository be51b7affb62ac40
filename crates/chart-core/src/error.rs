//! Error types for the chart engine.
//!
//! Normal data-shape variation (too few candles, flat prices, empty
//! snapshots) never produces an error. Only snapshots that break the
//! candle invariants, bad configuration and I/O surface here.

use thiserror::Error;

/// Top-level chart engine error.
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Candle invariant violated: {0}")]
    Candle(#[from] CandleError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        ChartError::Serialization(err.to_string())
    }
}

/// Violations of the candle snapshot contract.
///
/// These indicate a bug in the data source rather than a transient
/// condition, so the session rejects the whole snapshot.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CandleError {
    #[error("timestamp went backwards at index {index}: {previous} -> {current}")]
    NonMonotonic {
        index: usize,
        previous: i64,
        current: i64,
    },

    #[error("duplicate timestamp {timestamp} at index {index}")]
    DuplicateTimestamp { index: usize, timestamp: i64 },

    #[error("price range invalid at index {index} (timestamp {timestamp}): low <= open/close <= high does not hold")]
    InvalidRange { index: usize, timestamp: i64 },

    #[error("non-finite value at index {index} (timestamp {timestamp})")]
    NonFinite { index: usize, timestamp: i64 },
}

/// Indicator parameter errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Candle source errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Data file not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type alias for chart operations.
pub type ChartResult<T> = Result<T, ChartError>;
