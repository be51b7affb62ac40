//! Series identifiers.

use serde::{Serialize, Serializer};
use std::fmt;

/// Identifies one on-screen series.
///
/// Ordering follows draw order: candles first, overlays next, sub-pane
/// series last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SeriesKey {
    Candles,
    Sma(usize),
    Ema(usize),
    BollingerUpper,
    BollingerMiddle,
    BollingerLower,
    Volume,
    Rsi,
    MacdLine,
    MacdSignal,
    MacdHistogram,
    Obv,
    /// Pointer guides; never synchronized.
    Crosshair,
}

impl SeriesKey {
    /// Series drawn on top of the price candles.
    pub fn is_overlay(&self) -> bool {
        matches!(
            self,
            SeriesKey::Sma(_)
                | SeriesKey::Ema(_)
                | SeriesKey::BollingerUpper
                | SeriesKey::BollingerMiddle
                | SeriesKey::BollingerLower
        )
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesKey::Candles => write!(f, "candles"),
            SeriesKey::Sma(period) => write!(f, "sma{}", period),
            SeriesKey::Ema(period) => write!(f, "ema{}", period),
            SeriesKey::BollingerUpper => write!(f, "bb.upper"),
            SeriesKey::BollingerMiddle => write!(f, "bb.middle"),
            SeriesKey::BollingerLower => write!(f, "bb.lower"),
            SeriesKey::Volume => write!(f, "volume"),
            SeriesKey::Rsi => write!(f, "rsi"),
            SeriesKey::MacdLine => write!(f, "macd.line"),
            SeriesKey::MacdSignal => write!(f, "macd.signal"),
            SeriesKey::MacdHistogram => write!(f, "macd.hist"),
            SeriesKey::Obv => write!(f, "obv"),
            SeriesKey::Crosshair => write!(f, "crosshair"),
        }
    }
}

impl Serialize for SeriesKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
