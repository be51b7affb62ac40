//! Technical indicators for the chart engine.
//!
//! Every indicator is a pure function of the full candle snapshot:
//! - Moving averages (SMA, EMA)
//! - Momentum indicators (RSI, MACD)
//! - Volume indicators (OBV, volume bars)
//! - Volatility indicators (Bollinger Bands)
//!
//! [`IndicatorEngine`] evaluates the enabled set described by
//! [`IndicatorSettings`] in one pass.

pub mod engine;
pub mod momentum;
pub mod moving_average;
pub mod volatility;
pub mod volume;

pub use engine::{
    BollingerSettings, EmaSettings, IndicatorEngine, IndicatorSet, IndicatorSettings,
    MacdSettings, ObvSettings, RsiSettings, SmaSettings, VolumeSettings,
};
pub use momentum::{Macd, MacdSeries, Rsi};
pub use moving_average::{Ema, Sma};
pub use volatility::{BollingerBands, BollingerSeries};
pub use volume::{Obv, VolumeBars};
