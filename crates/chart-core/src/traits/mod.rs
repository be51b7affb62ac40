//! Core traits for the chart engine.

mod indicator;

pub use indicator::{Indicator, MultiSeriesIndicator};
