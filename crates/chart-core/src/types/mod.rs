//! Core data types for the chart engine.

mod candle;
mod point;
mod series_key;
mod timeframe;

pub use candle::{validate_candles, CandlePoint};
pub use point::{ColorTag, HistogramPoint, IndicatorPoint, TimedPoint};
pub use series_key::SeriesKey;
pub use timeframe::Timeframe;
