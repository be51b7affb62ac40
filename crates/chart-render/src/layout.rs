//! Vertical pane stacking.

use chart_core::types::SeriesKey;
use serde::{Deserialize, Serialize};

/// Vertical gap between stacked panes, in pixels.
pub const PANE_GAP: f64 = 8.0;

/// Pixel dimensions of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 60.0,
            bottom: 30.0,
            left: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }
}

/// A horizontal band with its own value scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pane {
    Price,
    Volume,
    Rsi,
    Macd,
    Obv,
}

impl Pane {
    /// Relative height when stacking.
    pub fn weight(&self) -> f64 {
        match self {
            Pane::Price => 3.0,
            _ => 1.0,
        }
    }
}

/// The pane a series is drawn in; `None` for glyphs spanning all panes.
pub fn pane_for(key: SeriesKey) -> Option<Pane> {
    match key {
        SeriesKey::Candles => Some(Pane::Price),
        key if key.is_overlay() => Some(Pane::Price),
        SeriesKey::Volume => Some(Pane::Volume),
        SeriesKey::Rsi => Some(Pane::Rsi),
        SeriesKey::MacdLine | SeriesKey::MacdSignal | SeriesKey::MacdHistogram => {
            Some(Pane::Macd)
        }
        SeriesKey::Obv => Some(Pane::Obv),
        _ => None,
    }
}

/// Rectangles of the plot area and every active pane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaneLayout {
    plot: Rect,
    panes: Vec<(Pane, Rect)>,
}

impl PaneLayout {
    /// Stack `active` panes top to bottom inside `size` minus `margins`.
    ///
    /// Panes are ordered Price, Volume, Rsi, Macd, Obv regardless of the
    /// order given; duplicates are ignored.
    pub fn compute(size: Size, margins: Margins, active: &[Pane]) -> Self {
        let plot = Rect::new(
            margins.left,
            margins.top,
            size.width - margins.left - margins.right,
            size.height - margins.top - margins.bottom,
        );

        let mut ordered: Vec<Pane> = active.to_vec();
        ordered.sort();
        ordered.dedup();

        if ordered.is_empty() {
            return Self {
                plot,
                panes: Vec::new(),
            };
        }

        let gaps = PANE_GAP * (ordered.len() - 1) as f64;
        let usable = (plot.height - gaps).max(0.0);
        let total_weight: f64 = ordered.iter().map(Pane::weight).sum();

        let mut y = plot.y;
        let panes = ordered
            .into_iter()
            .map(|pane| {
                let height = usable * pane.weight() / total_weight;
                let rect = Rect::new(plot.x, y, plot.width, height);
                y += height + PANE_GAP;
                (pane, rect)
            })
            .collect();

        Self { plot, panes }
    }

    pub fn plot(&self) -> Rect {
        self.plot
    }

    pub fn pane(&self, pane: Pane) -> Option<Rect> {
        self.panes
            .iter()
            .find(|(p, _)| *p == pane)
            .map(|(_, rect)| *rect)
    }

    pub fn panes(&self) -> &[(Pane, Rect)] {
        &self.panes
    }

    /// Pane under a pixel, if any.
    pub fn pane_at(&self, px: f64, py: f64) -> Option<Pane> {
        self.panes
            .iter()
            .find(|(_, rect)| rect.contains(px, py))
            .map(|(pane, _)| *pane)
    }
}
