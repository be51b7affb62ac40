//! Indicator trait definitions.

use crate::types::CandlePoint;

/// Batch indicator over a full candle snapshot.
///
/// Implementations are pure: the same snapshot always yields the same
/// output, which is what lets the synchronizer detect plain appends.
pub trait Indicator: Send + Sync {
    /// The point type of the produced series.
    type Output;

    /// Calculate the indicator series for the given candles.
    ///
    /// Returns an empty series when there are fewer candles than
    /// [`Indicator::period`].
    fn calculate(&self, candles: &[CandlePoint]) -> Vec<Self::Output>;

    /// Minimum number of candles needed for the first output point.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Whether the snapshot is long enough to produce output.
    fn is_ready(&self, candles: &[CandlePoint]) -> bool {
        candles.len() >= self.period()
    }
}

/// Indicator producing several aligned series (MACD, Bollinger bands).
pub trait MultiSeriesIndicator: Send + Sync {
    /// Container holding every output series.
    type Outputs;

    /// Calculate all output series for the given candles.
    fn calculate(&self, candles: &[CandlePoint]) -> Self::Outputs;

    /// Minimum number of candles needed for output.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    fn is_ready(&self, candles: &[CandlePoint]) -> bool {
        candles.len() >= self.period()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct WindowSum {
        period: usize,
    }

    impl Indicator for WindowSum {
        type Output = f64;

        fn calculate(&self, candles: &[CandlePoint]) -> Vec<f64> {
            if !self.is_ready(candles) {
                return vec![];
            }
            candles
                .windows(self.period)
                .map(|w| w.iter().map(|c| c.close).sum())
                .collect()
        }

        fn period(&self) -> usize {
            self.period
        }

        fn name(&self) -> &str {
            "sum"
        }
    }

    fn closes(values: &[f64]) -> Vec<CandlePoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &c)| CandlePoint::new(i as i64 * 1000, c, c, c, c, 1.0))
            .collect()
    }

    #[test]
    fn test_is_ready() {
        let indicator = WindowSum { period: 5 };

        assert!(!indicator.is_ready(&closes(&[1.0, 2.0, 3.0])));
        assert!(indicator.is_ready(&closes(&[1.0, 2.0, 3.0, 4.0, 5.0])));
    }

    #[test]
    fn test_default_calculate_contract() {
        let indicator = WindowSum { period: 3 };
        let result = indicator.calculate(&closes(&[1.0, 2.0, 3.0, 4.0, 5.0]));

        assert_eq!(result, vec![6.0, 9.0, 12.0]);
        assert!(indicator.calculate(&closes(&[1.0])).is_empty());
    }
}
