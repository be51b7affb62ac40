//! Volume indicators.

use chart_core::traits::Indicator;
use chart_core::types::{CandlePoint, ColorTag, HistogramPoint, IndicatorPoint};

/// On-Balance Volume (OBV).
///
/// Running total starting at zero: each candle after the first adds its
/// volume on an up close, subtracts it on a down close, and leaves the
/// total unchanged on a flat close. The first candle has no point.
#[derive(Debug, Clone, Default)]
pub struct Obv;

impl Obv {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for Obv {
    type Output = IndicatorPoint;

    fn calculate(&self, candles: &[CandlePoint]) -> Vec<IndicatorPoint> {
        let mut obv = 0.0;
        candles
            .windows(2)
            .map(|pair| {
                let (prev, curr) = (&pair[0], &pair[1]);
                if curr.close > prev.close {
                    obv += curr.volume;
                } else if curr.close < prev.close {
                    obv -= curr.volume;
                }
                IndicatorPoint::new(curr.time_secs(), obv)
            })
            .collect()
    }

    fn period(&self) -> usize {
        2
    }

    fn name(&self) -> &str {
        "OBV"
    }
}

/// Per-candle volume bars tagged by candle direction.
#[derive(Debug, Clone, Default)]
pub struct VolumeBars;

impl Indicator for VolumeBars {
    type Output = HistogramPoint;

    fn calculate(&self, candles: &[CandlePoint]) -> Vec<HistogramPoint> {
        candles
            .iter()
            .map(|c| {
                let tag = if c.is_bullish() {
                    ColorTag::Bullish
                } else {
                    ColorTag::Bearish
                };
                HistogramPoint::new(c.time_secs(), c.volume, tag)
            })
            .collect()
    }

    fn period(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "Volume"
    }
}
