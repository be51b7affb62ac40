//! Derived series points.

use serde::{Deserialize, Serialize};

use super::CandlePoint;

/// A point of a line-type indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPoint {
    /// Unix time in seconds, aligned with the candle it was derived from
    pub time: i64,
    pub value: f64,
}

impl IndicatorPoint {
    pub fn new(time: i64, value: f64) -> Self {
        Self { time, value }
    }
}

/// Direction tag carried by histogram bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Bullish,
    Bearish,
}

impl ColorTag {
    /// Bullish when `value >= reference`.
    #[inline]
    pub fn compare(value: f64, reference: f64) -> Self {
        if value >= reference {
            ColorTag::Bullish
        } else {
            ColorTag::Bearish
        }
    }
}

/// A histogram bar (MACD histogram, volume).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramPoint {
    pub time: i64,
    pub value: f64,
    pub tag: ColorTag,
}

impl HistogramPoint {
    pub fn new(time: i64, value: f64, tag: ColorTag) -> Self {
        Self { time, value, tag }
    }
}

/// Anything placed on the chart's time axis.
///
/// The key only has to be comparable within one series: candles use
/// milliseconds, derived points use seconds.
pub trait TimedPoint: Clone + PartialEq {
    fn time_key(&self) -> i64;
}

impl TimedPoint for CandlePoint {
    fn time_key(&self) -> i64 {
        self.timestamp
    }
}

impl TimedPoint for IndicatorPoint {
    fn time_key(&self) -> i64 {
        self.time
    }
}

impl TimedPoint for HistogramPoint {
    fn time_key(&self) -> i64 {
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_tag_compare() {
        assert_eq!(ColorTag::compare(1.0, 1.0), ColorTag::Bullish);
        assert_eq!(ColorTag::compare(2.0, 1.0), ColorTag::Bullish);
        assert_eq!(ColorTag::compare(0.5, 1.0), ColorTag::Bearish);
    }

    #[test]
    fn test_histogram_serializes_lowercase_tag() {
        let bar = HistogramPoint::new(5, -0.25, ColorTag::Bearish);
        let json = serde_json::to_string(&bar).unwrap();
        assert_eq!(json, r#"{"time":5,"value":-0.25,"tag":"bearish"}"#);
    }

    #[test]
    fn test_time_keys() {
        let candle = CandlePoint::new(7_000, 1.0, 1.0, 1.0, 1.0, 0.0);
        assert_eq!(candle.time_key(), 7_000);
        assert_eq!(IndicatorPoint::new(7, 1.0).time_key(), 7);
    }
}
