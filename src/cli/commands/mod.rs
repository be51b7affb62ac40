//! CLI command implementations.

pub mod hover;
pub mod indicators;
pub mod replay;
pub mod validate;

use anyhow::{Context, Result};
use chart_config::ChartConfig;
use chart_core::types::CandlePoint;
use chart_data::{CsvCandleSource, DemoFeed};
use chart_render::{Margins, Size};
use chart_session::SessionOptions;
use std::path::Path;
use tracing::info;

/// Candles from a CSV file, or the demo feed history.
pub(crate) fn load_candles(data: Option<&Path>, config: &ChartConfig) -> Result<Vec<CandlePoint>> {
    match data {
        Some(path) => {
            let source = CsvCandleSource::new(path)
                .with_context(|| format!("Data path '{}' does not exist", path.display()))?;
            let candles = source.load().context("Failed to load CSV candles")?;
            info!(path = %path.display(), candles = candles.len(), "Loaded candles");
            Ok(candles)
        }
        None => Ok(DemoFeed::new(config.feed.clone()).snapshot().to_vec()),
    }
}

pub(crate) fn session_options(config: &ChartConfig) -> SessionOptions {
    SessionOptions {
        size: Size::new(config.chart.width, config.chart.height),
        margins: Margins::default(),
        max_series_points: config.chart.max_series_points,
    }
}
