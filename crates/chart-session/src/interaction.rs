//! Pointer handling: crosshair and tooltip.

use std::collections::BTreeMap;

use chart_core::types::{CandlePoint, SeriesKey};
use chart_indicators::IndicatorSet;
use chart_render::{Rect, TimeScale};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::trace;

/// Index of the first candle with `timestamp >= time_ms`, clamped to the
/// last candle when `time_ms` lies past the end.
///
/// Candles must be sorted by timestamp. Returns `None` for an empty slice.
pub fn bisect_candles(candles: &[CandlePoint], time_ms: f64) -> Option<usize> {
    let last = candles.len().checked_sub(1)?;
    let index = candles.partition_point(|c| (c.timestamp as f64) < time_ms);
    Some(index.min(last))
}

/// Visual pointer guides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Crosshair {
    /// Snapped to the located candle
    pub x: f64,
    /// Raw pointer y
    pub y: f64,
    pub index: usize,
}

/// Data under the pointer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub index: usize,
    pub time: DateTime<Utc>,
    pub candle: CandlePoint,
    /// Indicator values aligned with the candle; series that have not
    /// started yet are absent.
    pub values: BTreeMap<SeriesKey, f64>,
}

/// Tracks crosshair and tooltip state between pointer events.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    crosshair: Option<Crosshair>,
    tooltip: Option<Tooltip>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locate the candle under `(px, py)` and assemble its tooltip.
    ///
    /// Pointers outside the plot, missing scales and empty data clear the
    /// state instead.
    pub fn pointer_move(
        &mut self,
        (px, py): (f64, f64),
        plot: Rect,
        time_scale: Option<&TimeScale>,
        candles: &[CandlePoint],
        indicators: &IndicatorSet,
    ) -> Option<&Tooltip> {
        let Some(time_scale) = time_scale.filter(|_| plot.contains(px, py)) else {
            self.pointer_out();
            return None;
        };
        let Some(index) = bisect_candles(candles, time_scale.invert(px)) else {
            self.pointer_out();
            return None;
        };

        let candle = candles[index];
        self.crosshair = Some(Crosshair {
            x: time_scale.map(candle.timestamp as f64),
            y: py,
            index,
        });
        self.tooltip = Some(Tooltip {
            index,
            time: candle.datetime(),
            candle,
            values: indicators.values_at(index, candles.len()),
        });
        trace!(index, timestamp = candle.timestamp, "Pointer located candle");
        self.tooltip.as_ref()
    }

    /// Hide the crosshair and clear the tooltip.
    pub fn pointer_out(&mut self) {
        self.crosshair = None;
        self.tooltip = None;
    }

    pub fn crosshair(&self) -> Option<&Crosshair> {
        self.crosshair.as_ref()
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }
}
