//! OHLCV candle type and snapshot validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CandleError;

/// One time-bucketed OHLCV record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandlePoint {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume
    pub volume: f64,
}

impl CandlePoint {
    /// Create a new candle.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Timestamp truncated to whole seconds, the time axis of derived series.
    #[inline]
    pub fn time_secs(&self) -> i64 {
        self.timestamp.div_euclid(1000)
    }

    /// Bottom of the candle body.
    #[inline]
    pub fn body_low(&self) -> f64 {
        self.open.min(self.close)
    }

    /// Top of the candle body.
    #[inline]
    pub fn body_high(&self) -> f64 {
        self.open.max(self.close)
    }

    /// Bullish when the close is at or above the open.
    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    fn check(&self, index: usize) -> Result<(), CandleError> {
        let values = [self.open, self.high, self.low, self.close, self.volume];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(CandleError::NonFinite {
                index,
                timestamp: self.timestamp,
            });
        }
        if self.low > self.body_low() || self.body_high() > self.high {
            return Err(CandleError::InvalidRange {
                index,
                timestamp: self.timestamp,
            });
        }
        Ok(())
    }
}

/// Check a full candle snapshot against the ordering and range invariants.
///
/// Timestamps must be strictly increasing and every candle must satisfy
/// `low <= open, close <= high`. An empty snapshot is valid.
pub fn validate_candles(candles: &[CandlePoint]) -> Result<(), CandleError> {
    for (index, candle) in candles.iter().enumerate() {
        candle.check(index)?;
        if index == 0 {
            continue;
        }
        let previous = candles[index - 1].timestamp;
        if candle.timestamp == previous {
            return Err(CandleError::DuplicateTimestamp {
                index,
                timestamp: candle.timestamp,
            });
        }
        if candle.timestamp < previous {
            return Err(CandleError::NonMonotonic {
                index,
                previous,
                current: candle.timestamp,
            });
        }
    }
    Ok(())
}
