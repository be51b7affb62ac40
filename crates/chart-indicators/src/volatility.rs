//! Volatility indicators.

use chart_core::traits::MultiSeriesIndicator;
use chart_core::types::{CandlePoint, IndicatorPoint};
use serde::{Deserialize, Serialize};

/// Bollinger band output series, index-aligned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BollingerSeries {
    pub upper: Vec<IndicatorPoint>,
    pub middle: Vec<IndicatorPoint>,
    pub lower: Vec<IndicatorPoint>,
}

/// Bollinger Bands.
///
/// Middle band is the SMA of closes; upper and lower bands sit
/// `std_dev_multiplier` population standard deviations away.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl BollingerBands {
    /// Create new Bollinger Bands with default parameters (20, 2.0).
    pub fn new() -> Self {
        Self::with_params(20, 2.0)
    }

    /// Create Bollinger Bands with custom parameters.
    pub fn with_params(period: usize, std_dev_multiplier: f64) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        assert!(
            std_dev_multiplier > 0.0,
            "Std dev multiplier must be positive"
        );
        Self {
            period,
            std_dev_multiplier,
        }
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiSeriesIndicator for BollingerBands {
    type Outputs = BollingerSeries;

    fn calculate(&self, candles: &[CandlePoint]) -> BollingerSeries {
        if !self.is_ready(candles) {
            return BollingerSeries::default();
        }

        let period_f64 = self.period as f64;
        let capacity = candles.len() - self.period + 1;
        let mut bands = BollingerSeries {
            upper: Vec::with_capacity(capacity),
            middle: Vec::with_capacity(capacity),
            lower: Vec::with_capacity(capacity),
        };

        for window in candles.windows(self.period) {
            let time = window[self.period - 1].time_secs();
            let mean = window.iter().map(|c| c.close).sum::<f64>() / period_f64;
            let variance = window
                .iter()
                .map(|c| (c.close - mean).powi(2))
                .sum::<f64>()
                / period_f64;
            let width = variance.sqrt() * self.std_dev_multiplier;

            bands.upper.push(IndicatorPoint::new(time, mean + width));
            bands.middle.push(IndicatorPoint::new(time, mean));
            bands.lower.push(IndicatorPoint::new(time, mean - width));
        }

        bands
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "Bollinger"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candles(closes: &[f64]) -> Vec<CandlePoint> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| CandlePoint::new(i as i64 * 1000, c, c, c, c, 1.0))
            .collect()
    }

    #[test]
    fn test_bands_around_sma() {
        // window [2, 4, 4, 4, 5, 5, 7, 9]: mean 5, population sd 2
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let bands = BollingerBands::with_params(8, 2.0).calculate(&candles(&data));

        assert_eq!(bands.middle.len(), 1);
        assert!((bands.middle[0].value - 5.0).abs() < 1e-12);
        assert!((bands.upper[0].value - 9.0).abs() < 1e-12);
        assert!((bands.lower[0].value - 1.0).abs() < 1e-12);
        assert_eq!(bands.middle[0].time, 7);
    }

    #[test]
    fn test_flat_prices_collapse_bands() {
        let bands = BollingerBands::with_params(3, 2.0).calculate(&candles(&[4.0; 6]));
        assert_eq!(bands.upper.len(), 4);
        assert!(bands
            .upper
            .iter()
            .zip(&bands.lower)
            .all(|(u, l)| (u.value - l.value).abs() < 1e-12));
    }

    #[test]
    fn test_insufficient_data() {
        let bands = BollingerBands::new().calculate(&candles(&[1.0, 2.0]));
        assert!(bands.middle.is_empty() && bands.upper.is_empty() && bands.lower.is_empty());
    }
}
