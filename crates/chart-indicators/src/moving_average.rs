//! Moving average indicators.

use chart_core::traits::Indicator;
use chart_core::types::{CandlePoint, IndicatorPoint};

/// Simple Moving Average (SMA) of closing prices.
///
/// One point per full window, timed at the window's last candle.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Sma {
    type Output = IndicatorPoint;

    fn calculate(&self, candles: &[CandlePoint]) -> Vec<IndicatorPoint> {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        sma_values(&closes, self.period)
            .into_iter()
            .enumerate()
            .map(|(i, value)| IndicatorPoint::new(candles[i + self.period - 1].time_secs(), value))
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Exponential Moving Average (EMA) of closing prices.
///
/// Seeded with the SMA of the first `period` closes, then
/// `ema[i] = close[i] * k + ema[i-1] * (1 - k)` with `k = 2 / (period + 1)`.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
}

impl Ema {
    /// Create a new EMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// Smoothing factor `2 / (period + 1)`.
    pub fn multiplier(&self) -> f64 {
        2.0 / (self.period as f64 + 1.0)
    }
}

impl Indicator for Ema {
    type Output = IndicatorPoint;

    fn calculate(&self, candles: &[CandlePoint]) -> Vec<IndicatorPoint> {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        ema_values(&closes, self.period)
            .into_iter()
            .enumerate()
            .map(|(i, value)| IndicatorPoint::new(candles[i + self.period - 1].time_secs(), value))
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

/// Sliding-window mean; `data.len() - period + 1` values or none.
pub(crate) fn sma_values(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let mut result = Vec::with_capacity(data.len() - period + 1);
    let period_f64 = period as f64;

    let mut sum: f64 = data[..period].iter().sum();
    result.push(sum / period_f64);

    for i in period..data.len() {
        sum = sum - data[i - period] + data[i];
        result.push(sum / period_f64);
    }

    result
}

/// SMA-seeded EMA; the first value sits at input index `period - 1`.
pub(crate) fn ema_values(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let one_minus_mult = 1.0 - multiplier;
    let mut result = Vec::with_capacity(data.len() - period + 1);

    let mut ema = data[..period].iter().sum::<f64>() / period as f64;
    result.push(ema);

    for &value in &data[period..] {
        ema = value * multiplier + ema * one_minus_mult;
        result.push(ema);
    }

    result
}
