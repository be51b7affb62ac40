//! Chart renderer: series buffers, scales and frame diffing.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use chart_core::types::{CandlePoint, ColorTag, HistogramPoint, IndicatorPoint, SeriesKey};
use chart_sync::SyncAction;
use serde::Serialize;
use tracing::{debug, info};

use crate::backend::RenderBackend;
use crate::buffer::{apply_action, SeriesBuffer};
use crate::layout::{pane_for, Margins, Pane, PaneLayout, Rect, Size};
use crate::scale::{LinearScale, TimeScale, ZoomTransform};
use crate::scene::{diff_frames, Frame, Glyph, GlyphId, GlyphPart};

/// Candle and bar width as a share of the candle spacing.
const BAR_FILL: f64 = 0.7;
const MIN_BAR_WIDTH: f64 = 1.0;
const MAX_BAR_WIDTH: f64 = 24.0;

/// Lifecycle of a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RendererState {
    /// No backend; every call is a no-op.
    Unmounted,
    /// Backend attached, no candles held.
    Mounted,
    /// Backend attached and a non-empty candle series held.
    Populated,
}

/// Outcome of one [`ChartRenderer::render`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderStats {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    /// Series whose glyphs were recomputed.
    pub series_laid_out: usize,
    /// Scales or panes changed, so every series was recomputed.
    pub full_relayout: bool,
}

impl RenderStats {
    pub fn mutations(&self) -> usize {
        self.added + self.updated + self.removed
    }
}

/// Everything glyph positions depend on besides the series points.
#[derive(Debug, Clone, PartialEq)]
struct Geometry {
    layout: PaneLayout,
    time: TimeScale,
    scales: BTreeMap<Pane, LinearScale>,
    bar_width: f64,
}

impl Geometry {
    /// Whether an x position lies within the plot, allowing one bar of slack.
    fn visible(&self, x: f64) -> bool {
        let plot = self.layout.plot();
        x >= plot.x - self.bar_width && x <= plot.right() + self.bar_width
    }
}

/// Retained-mode chart renderer over a [`RenderBackend`].
///
/// Series points arrive as sync actions; [`render`](Self::render) turns
/// the held points into a frame and forwards the diff to the backend.
pub struct ChartRenderer<B: RenderBackend> {
    backend: Option<B>,
    state: RendererState,
    size: Size,
    margins: Margins,
    capacity: usize,
    transform: ZoomTransform,
    crosshair: Option<(f64, f64)>,
    buffers: BTreeMap<SeriesKey, SeriesBuffer>,
    dirty: BTreeSet<SeriesKey>,
    series_glyphs: BTreeMap<SeriesKey, Frame>,
    geometry: Option<Geometry>,
    frame: Frame,
}

impl<B: RenderBackend> ChartRenderer<B> {
    /// Create an unmounted renderer holding at most `capacity` points per
    /// series.
    pub fn new(margins: Margins, capacity: usize) -> Self {
        Self {
            backend: None,
            state: RendererState::Unmounted,
            size: Size::new(0.0, 0.0),
            margins,
            capacity: capacity.max(1),
            transform: ZoomTransform::IDENTITY,
            crosshair: None,
            buffers: BTreeMap::new(),
            dirty: BTreeSet::new(),
            series_glyphs: BTreeMap::new(),
            geometry: None,
            frame: Frame::new(),
        }
    }

    /// Attach a backend. A previously attached backend is released first.
    pub fn mount(&mut self, mut backend: B, size: Size) {
        if self.backend.is_some() {
            self.unmount();
        }
        backend.resize(size);
        self.backend = Some(backend);
        self.size = size;
        self.state = RendererState::Mounted;
        info!(width = size.width, height = size.height, "Renderer mounted");
    }

    /// Release the backend and every held series; returns the backend.
    pub fn unmount(&mut self) -> Option<B> {
        let mut backend = self.backend.take()?;
        backend.release();
        self.buffers.clear();
        self.dirty.clear();
        self.series_glyphs.clear();
        self.geometry = None;
        self.frame.clear();
        self.crosshair = None;
        self.transform = ZoomTransform::IDENTITY;
        self.state = RendererState::Unmounted;
        info!("Renderer unmounted");
        Some(backend)
    }

    pub fn state(&self) -> RendererState {
        self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.state != RendererState::Unmounted
    }

    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    /// Apply a sync action to the primary candle series.
    ///
    /// Returns `true` when the held candles changed.
    pub fn apply_candles(&mut self, action: SyncAction<CandlePoint>) -> bool {
        if !self.is_mounted() {
            return false;
        }
        let capacity = self.capacity;
        let buffer = self
            .buffers
            .entry(SeriesKey::Candles)
            .or_insert_with(|| SeriesBuffer::Candles(VecDeque::new()));
        if buffer.as_candles().is_none() {
            *buffer = SeriesBuffer::Candles(VecDeque::new());
        }

        let changed = match buffer {
            SeriesBuffer::Candles(points) => apply_action(points, action, capacity),
            _ => false,
        };
        self.state = if buffer.is_empty() {
            RendererState::Mounted
        } else {
            RendererState::Populated
        };
        if changed {
            self.dirty.insert(SeriesKey::Candles);
        }
        changed
    }

    /// Apply a sync action to a line series, creating it on first use.
    pub fn apply_line(&mut self, key: SeriesKey, action: SyncAction<IndicatorPoint>) -> bool {
        if !self.is_mounted() {
            return false;
        }
        let capacity = self.capacity;
        let buffer = self
            .buffers
            .entry(key)
            .or_insert_with(|| SeriesBuffer::Line(VecDeque::new()));
        if buffer.as_line().is_none() {
            *buffer = SeriesBuffer::Line(VecDeque::new());
        }

        let changed = match buffer {
            SeriesBuffer::Line(points) => apply_action(points, action, capacity),
            _ => false,
        };
        if changed {
            self.dirty.insert(key);
        }
        changed
    }

    /// Apply a sync action to a histogram series, creating it on first use.
    pub fn apply_histogram(
        &mut self,
        key: SeriesKey,
        action: SyncAction<HistogramPoint>,
    ) -> bool {
        if !self.is_mounted() {
            return false;
        }
        let capacity = self.capacity;
        let buffer = self
            .buffers
            .entry(key)
            .or_insert_with(|| SeriesBuffer::Histogram(VecDeque::new()));
        if buffer.as_histogram().is_none() {
            *buffer = SeriesBuffer::Histogram(VecDeque::new());
        }

        let changed = match buffer {
            SeriesBuffer::Histogram(points) => apply_action(points, action, capacity),
            _ => false,
        };
        if changed {
            self.dirty.insert(key);
        }
        changed
    }

    /// Drop a series and its glyphs on the next render.
    pub fn remove_series(&mut self, key: SeriesKey) -> bool {
        let removed = self.buffers.remove(&key).is_some();
        if removed {
            self.dirty.remove(&key);
            if key == SeriesKey::Candles && self.is_mounted() {
                self.state = RendererState::Mounted;
            }
            debug!(series = %key, "Series removed");
        }
        removed
    }

    pub fn series_keys(&self) -> impl Iterator<Item = SeriesKey> + '_ {
        self.buffers.keys().copied()
    }

    pub fn buffer(&self, key: SeriesKey) -> Option<&SeriesBuffer> {
        self.buffers.get(&key)
    }

    /// Number of points held for a series.
    pub fn series_len(&self, key: SeriesKey) -> usize {
        self.buffers.get(&key).map_or(0, SeriesBuffer::len)
    }

    /// Change the surface size. Held series are untouched.
    pub fn resize(&mut self, size: Size) {
        if !self.is_mounted() {
            return;
        }
        self.size = size;
        if let Some(backend) = self.backend.as_mut() {
            backend.resize(size);
        }
        debug!(width = size.width, height = size.height, "Renderer resized");
    }

    /// Zoom the time axis by `factor` around the pixel x `cursor_px`.
    pub fn zoom_at(&mut self, cursor_px: f64, factor: f64) {
        if self.is_mounted() && cursor_px.is_finite() && factor.is_finite() && factor > 0.0 {
            self.transform.zoom_at(cursor_px, factor);
        }
    }

    /// Shift the time axis by `dx_px` pixels.
    pub fn pan(&mut self, dx_px: f64) {
        if self.is_mounted() && dx_px.is_finite() {
            self.transform.pan(dx_px);
        }
    }

    pub fn reset_zoom(&mut self) {
        self.transform = ZoomTransform::IDENTITY;
    }

    /// Place (or clear) the crosshair at a pixel position.
    pub fn set_crosshair(&mut self, position: Option<(f64, f64)>) {
        if self.is_mounted() {
            self.crosshair = position;
        }
    }

    pub fn crosshair(&self) -> Option<(f64, f64)> {
        self.crosshair
    }

    /// Plot rectangle for the current size and margins.
    pub fn plot_area(&self) -> Rect {
        match &self.geometry {
            Some(geometry) => geometry.layout.plot(),
            None => PaneLayout::compute(self.size, self.margins, &[]).plot(),
        }
    }

    /// Zoomed time scale of the last render.
    pub fn time_scale(&self) -> Option<TimeScale> {
        self.geometry.as_ref().map(|g| g.time)
    }

    /// Value scale of a pane as of the last render.
    pub fn pane_scale(&self, pane: Pane) -> Option<LinearScale> {
        self.geometry
            .as_ref()
            .and_then(|g| g.scales.get(&pane).copied())
    }

    pub fn layout(&self) -> Option<&PaneLayout> {
        self.geometry.as_ref().map(|g| &g.layout)
    }

    /// Current frame as last sent to the backend.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Lay out the held series and push the frame diff to the backend.
    ///
    /// When scales or panes changed since the last render every series is
    /// recomputed; otherwise only series touched since then.
    pub fn render(&mut self) -> RenderStats {
        if self.backend.is_none() {
            return RenderStats::default();
        }

        let geometry = self.compute_geometry();
        let full_relayout = geometry != self.geometry;

        let keys: Vec<SeriesKey> = if full_relayout {
            self.buffers.keys().copied().collect()
        } else {
            self.dirty.iter().copied().collect()
        };
        self.dirty.clear();

        let buffers = &self.buffers;
        self.series_glyphs.retain(|key, _| buffers.contains_key(key));

        let mut series_laid_out = 0;
        match &geometry {
            Some(g) => {
                for key in keys {
                    if let Some(buffer) = self.buffers.get(&key) {
                        self.series_glyphs.insert(key, layout_series(key, buffer, g));
                        series_laid_out += 1;
                    }
                }
            }
            None => self.series_glyphs.clear(),
        }

        let mut frame: Frame = self
            .series_glyphs
            .values()
            .flat_map(|glyphs| glyphs.iter().map(|(id, glyph)| (*id, *glyph)))
            .collect();
        if let (Some(g), Some((x, y))) = (&geometry, self.crosshair) {
            add_crosshair(&mut frame, g.layout.plot(), x, y);
        }

        let diff = diff_frames(&self.frame, &frame);
        if !diff.is_empty() {
            if let Some(backend) = self.backend.as_mut() {
                backend.apply(&diff);
            }
        }

        let stats = RenderStats {
            added: diff.added.len(),
            updated: diff.updated.len(),
            removed: diff.removed.len(),
            series_laid_out,
            full_relayout,
        };
        debug!(
            added = stats.added,
            updated = stats.updated,
            removed = stats.removed,
            laid_out = stats.series_laid_out,
            full = stats.full_relayout,
            "Frame rendered"
        );

        self.frame = frame;
        self.geometry = geometry;
        stats
    }

    fn compute_geometry(&self) -> Option<Geometry> {
        let candles = self
            .buffers
            .get(&SeriesKey::Candles)
            .and_then(SeriesBuffer::as_candles)?;
        let first = candles.front()?;
        let last = candles.back()?;

        let mut active = vec![Pane::Price];
        active.extend(
            self.buffers
                .iter()
                .filter(|(_, buffer)| !buffer.is_empty())
                .filter_map(|(key, _)| pane_for(*key)),
        );
        let layout = PaneLayout::compute(self.size, self.margins, &active);
        let plot = layout.plot();

        let base = TimeScale::new(
            (first.timestamp as f64, last.timestamp as f64),
            (plot.x, plot.right()),
        );
        let time = self.transform.rescale(&base);

        let mut scales = BTreeMap::new();
        for &(pane, rect) in layout.panes() {
            let range = (rect.bottom(), rect.y);
            let scale = match pane {
                Pane::Price => LinearScale::for_candles(candles.iter(), range),
                Pane::Rsi => Some(LinearScale::new((0.0, 100.0), range)),
                Pane::Volume => self
                    .pane_value_range(pane)
                    .map(|(_, high)| LinearScale::new((0.0, high.max(0.0)), range)),
                Pane::Macd | Pane::Obv => self
                    .pane_value_range(pane)
                    .map(|domain| LinearScale::new(domain, range)),
            };
            if let Some(scale) = scale {
                scales.insert(pane, scale);
            }
        }

        let spacing = if candles.len() > 1 {
            time.pixels_per_ms() * (last.timestamp - first.timestamp) as f64
                / (candles.len() - 1) as f64
        } else {
            plot.width * 0.05
        };
        let bar_width = (spacing * BAR_FILL).clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH);

        Some(Geometry {
            layout,
            time,
            scales,
            bar_width,
        })
    }

    fn pane_value_range(&self, pane: Pane) -> Option<(f64, f64)> {
        self.buffers
            .iter()
            .filter(|(key, _)| pane_for(**key) == Some(pane))
            .filter_map(|(_, buffer)| buffer.value_range())
            .reduce(|(a, b), (lo, hi)| (a.min(lo), b.max(hi)))
    }
}

fn layout_series(key: SeriesKey, buffer: &SeriesBuffer, geometry: &Geometry) -> Frame {
    let mut frame = Frame::new();
    let Some(scale) = pane_for(key).and_then(|pane| geometry.scales.get(&pane)) else {
        return frame;
    };
    let time = &geometry.time;
    let half = geometry.bar_width / 2.0;

    match buffer {
        SeriesBuffer::Candles(points) => {
            for candle in points {
                let x = time.map(candle.timestamp as f64);
                if !geometry.visible(x) {
                    continue;
                }
                let tag = if candle.is_bullish() {
                    ColorTag::Bullish
                } else {
                    ColorTag::Bearish
                };
                let top = scale.map(candle.body_high());
                let bottom = scale.map(candle.body_low());
                frame.insert(
                    GlyphId::new(key, candle.timestamp, GlyphPart::Body),
                    Glyph::CandleBody {
                        x: x - half,
                        y: top.min(bottom),
                        width: geometry.bar_width,
                        height: (bottom - top).abs(),
                        tag,
                    },
                );
                frame.insert(
                    GlyphId::new(key, candle.timestamp, GlyphPart::Wick),
                    Glyph::Wick {
                        x,
                        y_high: scale.map(candle.high),
                        y_low: scale.map(candle.low),
                        tag,
                    },
                );
            }
        }
        SeriesBuffer::Line(points) => {
            let finite = points.iter().filter(|p| p.value.is_finite());
            for (prev, point) in finite.clone().zip(finite.skip(1)) {
                let x1 = time.map_secs(prev.time);
                let x2 = time.map_secs(point.time);
                if !geometry.visible(x1) && !geometry.visible(x2) {
                    continue;
                }
                frame.insert(
                    GlyphId::new(key, point.time, GlyphPart::Segment),
                    Glyph::Segment {
                        x1,
                        y1: scale.map(prev.value),
                        x2,
                        y2: scale.map(point.value),
                    },
                );
            }
        }
        SeriesBuffer::Histogram(points) => {
            let (r0, r1) = scale.range();
            let zero = scale.map(0.0).clamp(r0.min(r1), r0.max(r1));
            for bar in points.iter().filter(|p| p.value.is_finite()) {
                let x = time.map_secs(bar.time);
                if !geometry.visible(x) {
                    continue;
                }
                let y = scale.map(bar.value);
                frame.insert(
                    GlyphId::new(key, bar.time, GlyphPart::Bar),
                    Glyph::Bar {
                        x: x - half,
                        y: y.min(zero),
                        width: geometry.bar_width,
                        height: (zero - y).abs(),
                        tag: bar.tag,
                    },
                );
            }
        }
    }
    frame
}

fn add_crosshair(frame: &mut Frame, plot: Rect, x: f64, y: f64) {
    frame.insert(
        GlyphId::new(SeriesKey::Crosshair, 0, GlyphPart::CrosshairV),
        Glyph::Rule {
            x1: x,
            y1: plot.y,
            x2: x,
            y2: plot.bottom(),
        },
    );
    frame.insert(
        GlyphId::new(SeriesKey::Crosshair, 0, GlyphPart::CrosshairH),
        Glyph::Rule {
            x1: plot.x,
            y1: y,
            x2: plot.right(),
            y2: y,
        },
    );
}
