//! Evaluation of the enabled indicator set over a candle snapshot.

use chart_core::error::IndicatorError;
use chart_core::traits::{Indicator, MultiSeriesIndicator};
use chart_core::types::{CandlePoint, HistogramPoint, IndicatorPoint, SeriesKey};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::{BollingerBands, BollingerSeries, Ema, Macd, MacdSeries, Obv, Rsi, Sma, VolumeBars};

/// SMA toggle and look-back periods (one line per period).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmaSettings {
    pub enabled: bool,
    pub periods: Vec<usize>,
}

impl Default for SmaSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            periods: vec![20],
        }
    }
}

/// EMA toggle and look-back periods (one line per period).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmaSettings {
    pub enabled: bool,
    pub periods: Vec<usize>,
}

impl Default for EmaSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            periods: vec![12, 50],
        }
    }
}

/// RSI toggle and period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiSettings {
    pub enabled: bool,
    pub period: usize,
}

impl Default for RsiSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            period: 14,
        }
    }
}

/// MACD toggle and periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdSettings {
    pub enabled: bool,
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

/// Bollinger band toggle and parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerSettings {
    pub enabled: bool,
    pub period: usize,
    pub std_dev: f64,
}

impl Default for BollingerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            period: 20,
            std_dev: 2.0,
        }
    }
}

/// OBV toggle; off unless asked for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObvSettings {
    pub enabled: bool,
}

/// Volume bar toggle; on unless switched off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeSettings {
    pub enabled: bool,
}

impl Default for VolumeSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Which indicators are visible and with which periods.
///
/// Every table and every field may be omitted; missing values take the
/// defaults above.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorSettings {
    pub sma: SmaSettings,
    pub ema: EmaSettings,
    pub rsi: RsiSettings,
    pub macd: MacdSettings,
    pub bollinger: BollingerSettings,
    pub obv: ObvSettings,
    pub volume: VolumeSettings,
}

impl IndicatorSettings {
    /// Everything switched off; candles only.
    pub fn none() -> Self {
        Self {
            sma: SmaSettings {
                enabled: false,
                periods: vec![],
            },
            ema: EmaSettings {
                enabled: false,
                periods: vec![],
            },
            rsi: RsiSettings {
                enabled: false,
                ..RsiSettings::default()
            },
            macd: MacdSettings {
                enabled: false,
                ..MacdSettings::default()
            },
            bollinger: BollingerSettings::default(),
            obv: ObvSettings { enabled: false },
            volume: VolumeSettings { enabled: false },
        }
    }

    /// Reject parameters the indicator constructors would panic on.
    pub fn validate(&self) -> Result<(), IndicatorError> {
        let zero = |name: &str| IndicatorError::InvalidParameter(format!("{name} period must be greater than 0"));

        if self.sma.periods.contains(&0) {
            return Err(zero("SMA"));
        }
        if self.ema.periods.contains(&0) {
            return Err(zero("EMA"));
        }
        if self.rsi.period == 0 {
            return Err(zero("RSI"));
        }
        let macd = &self.macd;
        if macd.fast == 0 || macd.slow == 0 || macd.signal == 0 {
            return Err(zero("MACD"));
        }
        if macd.fast >= macd.slow {
            return Err(IndicatorError::InvalidParameter(format!(
                "MACD fast period ({}) must be less than slow period ({})",
                macd.fast, macd.slow
            )));
        }
        if self.bollinger.period == 0 {
            return Err(zero("Bollinger"));
        }
        if self.bollinger.std_dev.is_nan() || self.bollinger.std_dev <= 0.0 {
            return Err(IndicatorError::InvalidParameter(
                "Bollinger std_dev must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// All derived series for one candle snapshot.
///
/// Disabled indicators are absent; enabled indicators without enough
/// data are present with empty series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndicatorSet {
    pub sma: BTreeMap<usize, Vec<IndicatorPoint>>,
    pub ema: BTreeMap<usize, Vec<IndicatorPoint>>,
    pub rsi: Option<Vec<IndicatorPoint>>,
    pub macd: Option<MacdSeries>,
    pub bollinger: Option<BollingerSeries>,
    pub obv: Option<Vec<IndicatorPoint>>,
    pub volume: Option<Vec<HistogramPoint>>,
}

impl IndicatorSet {
    /// Every line-type series with its key, in draw order.
    pub fn line_series(&self) -> Vec<(SeriesKey, &[IndicatorPoint])> {
        let mut series: Vec<(SeriesKey, &[IndicatorPoint])> = Vec::new();
        for (&period, points) in &self.sma {
            series.push((SeriesKey::Sma(period), points.as_slice()));
        }
        for (&period, points) in &self.ema {
            series.push((SeriesKey::Ema(period), points.as_slice()));
        }
        if let Some(bands) = &self.bollinger {
            series.push((SeriesKey::BollingerUpper, bands.upper.as_slice()));
            series.push((SeriesKey::BollingerMiddle, bands.middle.as_slice()));
            series.push((SeriesKey::BollingerLower, bands.lower.as_slice()));
        }
        if let Some(rsi) = &self.rsi {
            series.push((SeriesKey::Rsi, rsi.as_slice()));
        }
        if let Some(macd) = &self.macd {
            series.push((SeriesKey::MacdLine, macd.line.as_slice()));
            series.push((SeriesKey::MacdSignal, macd.signal.as_slice()));
        }
        if let Some(obv) = &self.obv {
            series.push((SeriesKey::Obv, obv.as_slice()));
        }
        series
    }

    /// Every histogram series with its key.
    pub fn histogram_series(&self) -> Vec<(SeriesKey, &[HistogramPoint])> {
        let mut series: Vec<(SeriesKey, &[HistogramPoint])> = Vec::new();
        if let Some(volume) = &self.volume {
            series.push((SeriesKey::Volume, volume.as_slice()));
        }
        if let Some(macd) = &self.macd {
            series.push((SeriesKey::MacdHistogram, macd.histogram.as_slice()));
        }
        series
    }

    /// Values of every series at a candle index.
    ///
    /// Series end at the last candle, so a series of length `len` starts
    /// at candle `candle_count - len`. Series that have not started yet
    /// at `index` are skipped.
    pub fn values_at(&self, index: usize, candle_count: usize) -> BTreeMap<SeriesKey, f64> {
        fn aligned<T>(points: &[T], index: usize, candle_count: usize) -> Option<&T> {
            let offset = candle_count.checked_sub(points.len())?;
            index.checked_sub(offset).and_then(|i| points.get(i))
        }

        let mut values = BTreeMap::new();
        for (key, points) in self.line_series() {
            if let Some(point) = aligned(points, index, candle_count) {
                values.insert(key, point.value);
            }
        }
        for (key, points) in self.histogram_series() {
            if let Some(point) = aligned(points, index, candle_count) {
                values.insert(key, point.value);
            }
        }
        values
    }
}

/// Evaluates the enabled indicators for each new candle snapshot.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    settings: IndicatorSettings,
}

impl IndicatorEngine {
    /// Create an engine after validating the settings.
    pub fn new(settings: IndicatorSettings) -> Result<Self, IndicatorError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &IndicatorSettings {
        &self.settings
    }

    /// Recompute every enabled series from the full snapshot.
    pub fn compute(&self, candles: &[CandlePoint]) -> IndicatorSet {
        let s = &self.settings;
        let mut set = IndicatorSet::default();

        if s.sma.enabled {
            for period in s.sma.periods.iter().copied().collect::<BTreeSet<_>>() {
                set.sma.insert(period, Sma::new(period).calculate(candles));
            }
        }
        if s.ema.enabled {
            for period in s.ema.periods.iter().copied().collect::<BTreeSet<_>>() {
                set.ema.insert(period, Ema::new(period).calculate(candles));
            }
        }
        if s.rsi.enabled {
            set.rsi = Some(Rsi::new(s.rsi.period).calculate(candles));
        }
        if s.macd.enabled {
            let macd = Macd::with_periods(s.macd.fast, s.macd.slow, s.macd.signal);
            set.macd = Some(macd.calculate(candles));
        }
        if s.bollinger.enabled {
            let bands = BollingerBands::with_params(s.bollinger.period, s.bollinger.std_dev);
            set.bollinger = Some(bands.calculate(candles));
        }
        if s.obv.enabled {
            set.obv = Some(Obv::new().calculate(candles));
        }
        if s.volume.enabled {
            set.volume = Some(VolumeBars.calculate(candles));
        }

        debug!(
            candles = candles.len(),
            lines = set.line_series().len(),
            histograms = set.histogram_series().len(),
            "Indicators recomputed"
        );
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candles(len: usize) -> Vec<CandlePoint> {
        (0..len)
            .map(|i| {
                let c = 100.0 + (i as f64 * 0.3).sin() * 4.0;
                CandlePoint::new(i as i64 * 60_000, c - 0.5, c + 1.0, c - 1.0, c, 1000.0 + i as f64)
            })
            .collect()
    }

    #[test]
    fn test_default_settings_are_valid() {
        let settings = IndicatorSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.sma.periods, vec![20]);
        assert_eq!(settings.ema.periods, vec![12, 50]);
        assert_eq!(settings.rsi.period, 14);
        assert_eq!((settings.macd.fast, settings.macd.slow, settings.macd.signal), (12, 26, 9));
    }

    #[test]
    fn test_validate_rejects_bad_periods() {
        let mut settings = IndicatorSettings::default();
        settings.sma.periods = vec![0];
        assert!(settings.validate().is_err());

        let mut settings = IndicatorSettings::default();
        settings.macd.fast = 30;
        assert!(matches!(
            settings.validate(),
            Err(IndicatorError::InvalidParameter(_))
        ));
        assert!(IndicatorEngine::new(settings).is_err());
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: IndicatorSettings =
            serde_json::from_str(r#"{"rsi":{"enabled":false,"period":7}}"#).unwrap();
        assert!(!settings.rsi.enabled);
        assert_eq!(settings.rsi.period, 7);
        assert_eq!(settings.ema.periods, vec![12, 50]);
        assert!(settings.volume.enabled);
    }

    #[test]
    fn test_partial_tables_take_field_defaults() {
        let settings: IndicatorSettings = serde_json::from_str(
            r#"{"rsi":{"enabled":false},"ema":{"enabled":false},"obv":{},"volume":{},"macd":{"signal":5}}"#,
        )
        .unwrap();
        assert!(!settings.rsi.enabled);
        assert_eq!(settings.rsi.period, 14);
        assert!(!settings.ema.enabled);
        assert_eq!(settings.ema.periods, vec![12, 50]);
        assert_eq!(settings.sma.periods, vec![20]);
        assert!(!settings.obv.enabled);
        assert!(settings.volume.enabled);
        assert_eq!((settings.macd.fast, settings.macd.slow, settings.macd.signal), (12, 26, 5));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_compute_respects_toggles() {
        let engine = IndicatorEngine::new(IndicatorSettings::default()).unwrap();
        let set = engine.compute(&candles(100));

        assert_eq!(set.sma[&20].len(), 81);
        assert_eq!(set.ema[&50].len(), 51);
        assert!(set.rsi.is_some());
        assert!(set.macd.is_some());
        assert!(set.bollinger.is_none());
        assert!(set.obv.is_none());
        assert_eq!(set.volume.as_ref().map(Vec::len), Some(100));

        let none = IndicatorEngine::new(IndicatorSettings::none()).unwrap();
        let empty = none.compute(&candles(100));
        assert!(empty.line_series().is_empty());
        assert!(empty.histogram_series().is_empty());
    }

    #[test]
    fn test_compute_is_deterministic() {
        let engine = IndicatorEngine::new(IndicatorSettings::default()).unwrap();
        let data = candles(120);
        assert_eq!(engine.compute(&data), engine.compute(&data));
    }

    #[test]
    fn test_insufficient_data_yields_empty_series() {
        let engine = IndicatorEngine::new(IndicatorSettings::default()).unwrap();
        let set = engine.compute(&candles(5));

        assert!(set.sma[&20].is_empty());
        assert!(set.rsi.as_ref().is_some_and(|r| r.is_empty()));
        assert!(set.macd.as_ref().is_some_and(|m| m.is_empty()));
    }

    #[test]
    fn test_values_at_aligns_from_the_end() {
        let mut settings = IndicatorSettings::none();
        settings.sma = SmaSettings {
            enabled: true,
            periods: vec![3],
        };
        settings.obv.enabled = true;
        let data = candles(10);
        let set = IndicatorEngine::new(settings).unwrap().compute(&data);

        // SMA(3) starts at candle 2, OBV at candle 1
        let first = set.values_at(0, data.len());
        assert!(first.is_empty());

        let at_one = set.values_at(1, data.len());
        assert!(!at_one.contains_key(&SeriesKey::Sma(3)));
        assert_eq!(at_one.get(&SeriesKey::Obv), Some(&set.obv.as_ref().unwrap()[0].value));

        let at_two = set.values_at(2, data.len());
        assert_eq!(at_two.get(&SeriesKey::Sma(3)), Some(&set.sma[&3][0].value));
    }

    #[test]
    fn test_duplicate_periods_collapse() {
        let mut settings = IndicatorSettings::none();
        settings.ema = EmaSettings {
            enabled: true,
            periods: vec![5, 5, 8],
        };
        let set = IndicatorEngine::new(settings).unwrap().compute(&candles(30));
        assert_eq!(set.ema.len(), 2);
    }
}
