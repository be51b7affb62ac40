//! Momentum indicators.

use chart_core::traits::{Indicator, MultiSeriesIndicator};
use chart_core::types::{CandlePoint, ColorTag, HistogramPoint, IndicatorPoint};
use serde::{Deserialize, Serialize};

use crate::moving_average::ema_values;

/// RS used when the average loss is zero.
const ZERO_LOSS_RS: f64 = 100.0;

/// Relative Strength Index (RSI) with Wilder smoothing.
///
/// The first point sits at candle index `period`, seeded with the plain
/// average gain and loss of the first `period` deltas.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator. 14 is the usual period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    fn value(avg_gain: f64, avg_loss: f64) -> f64 {
        let rs = if avg_loss == 0.0 {
            ZERO_LOSS_RS
        } else {
            avg_gain / avg_loss
        };
        100.0 - 100.0 / (1.0 + rs)
    }
}

impl Indicator for Rsi {
    type Output = IndicatorPoint;

    fn calculate(&self, candles: &[CandlePoint]) -> Vec<IndicatorPoint> {
        if candles.len() <= self.period {
            return vec![];
        }

        let period_f64 = self.period as f64;
        let split = |i: usize| {
            let change = candles[i].close - candles[i - 1].close;
            if change > 0.0 {
                (change, 0.0)
            } else {
                (0.0, -change)
            }
        };

        let (mut avg_gain, mut avg_loss) = (1..=self.period)
            .map(split)
            .fold((0.0, 0.0), |(g, l), (gain, loss)| (g + gain, l + loss));
        avg_gain /= period_f64;
        avg_loss /= period_f64;

        let mut result = Vec::with_capacity(candles.len() - self.period);
        result.push(IndicatorPoint::new(
            candles[self.period].time_secs(),
            Self::value(avg_gain, avg_loss),
        ));

        for i in (self.period + 1)..candles.len() {
            let (gain, loss) = split(i);
            avg_gain = (avg_gain * (period_f64 - 1.0) + gain) / period_f64;
            avg_loss = (avg_loss * (period_f64 - 1.0) + loss) / period_f64;
            result.push(IndicatorPoint::new(
                candles[i].time_secs(),
                Self::value(avg_gain, avg_loss),
            ));
        }

        result
    }

    fn period(&self) -> usize {
        self.period + 1 // needs period deltas
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// MACD output series.
///
/// `line` starts once both EMAs exist; `signal` and `histogram` start
/// `signal_period - 1` points later and are index-aligned with each other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdSeries {
    pub line: Vec<IndicatorPoint>,
    pub signal: Vec<IndicatorPoint>,
    pub histogram: Vec<HistogramPoint>,
}

impl MacdSeries {
    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }
}

/// MACD (Moving Average Convergence Divergence).
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && slow > 0 && signal > 0, "Periods must be greater than 0");
        Self {
            fast_period: fast,
            slow_period: slow,
            signal_period: signal,
        }
    }

    /// Candle index of the first MACD line point.
    fn line_start(&self) -> usize {
        self.fast_period.max(self.slow_period) - 1
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiSeriesIndicator for Macd {
    type Outputs = MacdSeries;

    fn calculate(&self, candles: &[CandlePoint]) -> MacdSeries {
        // No partial output while the signal line is still warming up.
        if !self.is_ready(candles) {
            return MacdSeries::default();
        }

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let fast = ema_values(&closes, self.fast_period);
        let slow = ema_values(&closes, self.slow_period);

        let start = self.line_start();
        let line_values: Vec<f64> = (start..candles.len())
            .map(|i| fast[i + 1 - self.fast_period] - slow[i + 1 - self.slow_period])
            .collect();
        let signal_values = ema_values(&line_values, self.signal_period);

        let line = line_values
            .iter()
            .enumerate()
            .map(|(j, &value)| IndicatorPoint::new(candles[start + j].time_secs(), value))
            .collect();

        let offset = self.signal_period - 1;
        let mut signal = Vec::with_capacity(signal_values.len());
        let mut histogram = Vec::with_capacity(signal_values.len());
        for (j, &sig) in signal_values.iter().enumerate() {
            let macd = line_values[offset + j];
            let time = candles[start + offset + j].time_secs();
            signal.push(IndicatorPoint::new(time, sig));
            histogram.push(HistogramPoint::new(
                time,
                macd - sig,
                ColorTag::compare(macd, sig),
            ));
        }

        MacdSeries {
            line,
            signal,
            histogram,
        }
    }

    fn period(&self) -> usize {
        self.line_start() + self.signal_period
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candles(closes: &[f64]) -> Vec<CandlePoint> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| CandlePoint::new(i as i64 * 1000, c, c, c, c, 100.0))
            .collect()
    }

    fn wave(len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| 100.0 + (i as f64 * 0.5).sin() * 5.0 + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn test_rsi_bounded() {
        let result = Rsi::new(14).calculate(&candles(&wave(60)));

        assert_eq!(result.len(), 60 - 14);
        for point in &result {
            assert!(point.value >= 0.0 && point.value <= 100.0);
        }
        assert_eq!(result[0].time, 14);
    }

    #[test]
    fn test_rsi_all_gains_saturates() {
        let data: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let result = Rsi::new(5).calculate(&candles(&data));

        // avgLoss == 0 maps to RS = 100
        let expected = 100.0 - 100.0 / 101.0;
        for point in &result {
            assert!(point.value.is_finite());
            assert!((point.value - expected).abs() < 1e-10);
            assert!(point.value > 99.0);
        }
    }

    #[test]
    fn test_rsi_all_losses() {
        let data: Vec<f64> = (1..=20).rev().map(|i| i as f64).collect();
        let result = Rsi::new(5).calculate(&candles(&data));

        assert!(!result.is_empty());
        for point in &result {
            assert!(point.value.abs() < 1e-10);
        }
    }

    #[test]
    fn test_rsi_wilder_recurrence() {
        // deltas: +1, -1, +2, +1 ; period 2
        let data = [10.0, 11.0, 10.0, 12.0, 13.0];
        let result = Rsi::new(2).calculate(&candles(&data));
        assert_eq!(result.len(), 3);

        // seed: gain 0.5, loss 0.5 -> RS 1 -> 50
        assert!((result[0].value - 50.0).abs() < 1e-10);
        // gain (0.5 + 2)/2 = 1.25, loss 0.25 -> RS 5
        assert!((result[1].value - (100.0 - 100.0 / 6.0)).abs() < 1e-10);
        // gain (1.25 + 1)/2 = 1.125, loss 0.125 -> RS 9 -> 90
        assert!((result[2].value - 90.0).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        assert!(Rsi::new(5).calculate(&candles(&[1.0, 2.0, 3.0, 4.0, 5.0])).is_empty());
    }

    #[test]
    fn test_macd_histogram_identity() {
        let data = wave(80);
        let macd = Macd::with_periods(5, 10, 4);
        let series = macd.calculate(&candles(&data));

        assert_eq!(series.line.len(), 80 - 9);
        assert_eq!(series.signal.len(), series.line.len() - 3);
        assert_eq!(series.histogram.len(), series.signal.len());

        let offset = series.line.len() - series.signal.len();
        for (i, bar) in series.histogram.iter().enumerate() {
            let line = series.line[offset + i];
            let signal = series.signal[i];
            assert_eq!(bar.time, line.time);
            assert_eq!(bar.time, signal.time);
            assert!((bar.value - (line.value - signal.value)).abs() < 1e-12);
            let bullish = line.value >= signal.value;
            assert_eq!(bar.tag == ColorTag::Bullish, bullish);
        }
    }

    #[test]
    fn test_macd_line_matches_ema_difference() {
        let data = wave(40);
        let c = candles(&data);
        let series = Macd::with_periods(3, 6, 3).calculate(&c);

        let fast = crate::Ema::new(3).calculate(&c);
        let slow = crate::Ema::new(6).calculate(&c);
        // fast starts 3 candles earlier than slow
        for (i, point) in series.line.iter().enumerate() {
            assert_eq!(point.value, fast[i + 3].value - slow[i].value);
            assert_eq!(point.time, slow[i].time);
        }
    }

    #[test]
    fn test_macd_warm_up_is_empty() {
        let macd = Macd::with_periods(3, 6, 3);
        // needs 6 + 3 - 1 = 8 candles
        assert!(macd.calculate(&candles(&wave(7))).is_empty());
        let series = macd.calculate(&candles(&wave(8)));
        assert_eq!(series.line.len(), 3);
        assert_eq!(series.signal.len(), 1);
    }
}
