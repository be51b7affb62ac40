//! Session state and the recompute/sync/render pipeline.

use std::collections::BTreeMap;

use chart_core::error::ChartResult;
use chart_core::types::{validate_candles, CandlePoint, HistogramPoint, IndicatorPoint, SeriesKey};
use chart_indicators::{IndicatorEngine, IndicatorSet, IndicatorSettings};
use chart_render::{ChartRenderer, Margins, RenderBackend, RenderStats, Size};
use chart_sync::{SeriesSynchronizer, SyncKind, MAX_SERIES_POINTS};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::interaction::{InteractionController, Tooltip};

/// Surface and memory settings for a new session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOptions {
    pub size: Size,
    pub margins: Margins,
    /// Points retained per series by caches and renderer buffers
    pub max_series_points: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            size: Size::new(800.0, 400.0),
            margins: Margins::default(),
            max_series_points: MAX_SERIES_POINTS,
        }
    }
}

/// What one pipeline run did to each series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncReport {
    pub actions: Vec<(SeriesKey, SyncKind)>,
    /// Series dropped from the renderer (toggled off or emptied)
    pub removed: Vec<SeriesKey>,
    pub render: RenderStats,
}

impl SyncReport {
    pub fn kind_of(&self, key: SeriesKey) -> Option<SyncKind> {
        self.actions
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, kind)| *kind)
    }

    /// Number of series that took the given action.
    pub fn count(&self, kind: SyncKind) -> usize {
        self.actions.iter().filter(|(_, k)| *k == kind).count()
    }

    /// Whether nothing changed on screen.
    pub fn is_noop(&self) -> bool {
        self.removed.is_empty() && self.actions.iter().all(|(_, k)| *k == SyncKind::Noop)
    }
}

/// One mounted chart.
pub struct ChartSession<B: RenderBackend> {
    engine: IndicatorEngine,
    capacity: usize,
    candles: Vec<CandlePoint>,
    indicators: IndicatorSet,
    candle_sync: SeriesSynchronizer<CandlePoint>,
    line_syncs: BTreeMap<SeriesKey, SeriesSynchronizer<IndicatorPoint>>,
    histogram_syncs: BTreeMap<SeriesKey, SeriesSynchronizer<HistogramPoint>>,
    renderer: ChartRenderer<B>,
    interaction: InteractionController,
}

impl<B: RenderBackend> ChartSession<B> {
    /// Validate the settings and mount `backend`.
    pub fn create(
        backend: B,
        settings: IndicatorSettings,
        options: SessionOptions,
    ) -> ChartResult<Self> {
        let engine = IndicatorEngine::new(settings)?;
        let capacity = options.max_series_points.max(1);

        let mut renderer = ChartRenderer::new(options.margins, capacity);
        renderer.mount(backend, options.size);
        info!(capacity, "Chart session created");

        Ok(Self {
            engine,
            capacity,
            candles: Vec::new(),
            indicators: IndicatorSet::default(),
            candle_sync: SeriesSynchronizer::with_capacity(SeriesKey::Candles, capacity),
            line_syncs: BTreeMap::new(),
            histogram_syncs: BTreeMap::new(),
            renderer,
            interaction: InteractionController::new(),
        })
    }

    /// Run the pipeline for a new full candle snapshot.
    ///
    /// A snapshot that breaks the candle invariants is rejected as a whole
    /// and nothing is applied. After [`dispose`](Self::dispose) this is a
    /// no-op.
    pub fn on_candles_changed(&mut self, candles: &[CandlePoint]) -> ChartResult<SyncReport> {
        if !self.renderer.is_mounted() {
            debug!("Snapshot ignored: session disposed");
            return Ok(SyncReport::default());
        }

        if let Err(e) = validate_candles(candles) {
            error!(error = %e, candles = candles.len(), "Rejected candle snapshot");
            return Err(e.into());
        }

        self.candles = candles.to_vec();
        self.indicators = self.engine.compute(&self.candles);
        Ok(self.synchronize())
    }

    /// Swap the indicator settings and resynchronize the current snapshot.
    pub fn set_indicators(&mut self, settings: IndicatorSettings) -> ChartResult<SyncReport> {
        self.engine = IndicatorEngine::new(settings)?;
        if !self.renderer.is_mounted() {
            return Ok(SyncReport::default());
        }
        self.indicators = self.engine.compute(&self.candles);
        info!("Indicator settings changed");
        Ok(self.synchronize())
    }

    fn synchronize(&mut self) -> SyncReport {
        let mut report = SyncReport::default();

        let action = self.candle_sync.sync(&self.candles);
        report.actions.push((SeriesKey::Candles, action.kind()));
        self.renderer.apply_candles(action);

        let lines = self.indicators.line_series();
        let live: Vec<SeriesKey> = lines
            .iter()
            .filter(|(_, points)| !points.is_empty())
            .map(|(key, _)| *key)
            .collect();
        self.line_syncs.retain(|key, _| live.contains(key));
        for (key, points) in lines.into_iter().filter(|(_, p)| !p.is_empty()) {
            let capacity = self.capacity;
            let sync = self
                .line_syncs
                .entry(key)
                .or_insert_with(|| SeriesSynchronizer::with_capacity(key, capacity));
            let action = sync.sync(points);
            report.actions.push((key, action.kind()));
            self.renderer.apply_line(key, action);
        }

        let histograms = self.indicators.histogram_series();
        let live_bars: Vec<SeriesKey> = histograms
            .iter()
            .filter(|(_, points)| !points.is_empty())
            .map(|(key, _)| *key)
            .collect();
        self.histogram_syncs.retain(|key, _| live_bars.contains(key));
        for (key, points) in histograms.into_iter().filter(|(_, p)| !p.is_empty()) {
            let capacity = self.capacity;
            let sync = self
                .histogram_syncs
                .entry(key)
                .or_insert_with(|| SeriesSynchronizer::with_capacity(key, capacity));
            let action = sync.sync(points);
            report.actions.push((key, action.kind()));
            self.renderer.apply_histogram(key, action);
        }

        let stale: Vec<SeriesKey> = self
            .renderer
            .series_keys()
            .filter(|key| {
                *key != SeriesKey::Candles
                    && !self.line_syncs.contains_key(key)
                    && !self.histogram_syncs.contains_key(key)
            })
            .collect();
        for key in stale {
            self.renderer.remove_series(key);
            report.removed.push(key);
        }

        report.render = self.renderer.render();
        debug!(
            series = report.actions.len(),
            appended = report.count(SyncKind::Append),
            replaced = report.count(SyncKind::Replace),
            removed = report.removed.len(),
            "Pipeline complete"
        );
        report
    }

    /// Resize the surface. Caches and indicator data are untouched.
    pub fn resize(&mut self, size: Size) -> RenderStats {
        self.clear_pointer();
        self.renderer.resize(size);
        self.renderer.render()
    }

    /// Zoom the time axis around the pixel x `cursor_px`.
    pub fn zoom_at(&mut self, cursor_px: f64, factor: f64) -> RenderStats {
        self.clear_pointer();
        self.renderer.zoom_at(cursor_px, factor);
        self.renderer.render()
    }

    pub fn pan(&mut self, dx_px: f64) -> RenderStats {
        self.clear_pointer();
        self.renderer.pan(dx_px);
        self.renderer.render()
    }

    pub fn reset_zoom(&mut self) -> RenderStats {
        self.clear_pointer();
        self.renderer.reset_zoom();
        self.renderer.render()
    }

    /// Update crosshair and tooltip for a pointer position.
    pub fn pointer_move(&mut self, px: f64, py: f64) -> Option<Tooltip> {
        if !self.renderer.is_mounted() {
            return None;
        }
        let plot = self.renderer.plot_area();
        let time_scale = self.renderer.time_scale();
        let tooltip = self
            .interaction
            .pointer_move(
                (px, py),
                plot,
                time_scale.as_ref(),
                &self.candles,
                &self.indicators,
            )
            .cloned();

        let position = self.interaction.crosshair().map(|c| (c.x, c.y));
        self.renderer.set_crosshair(position);
        self.renderer.render();
        tooltip
    }

    /// Clear tooltip and hide the crosshair.
    pub fn pointer_out(&mut self) {
        self.clear_pointer();
        self.renderer.render();
    }

    fn clear_pointer(&mut self) {
        self.interaction.pointer_out();
        self.renderer.set_crosshair(None);
    }

    /// Unmount the renderer and drop all session state; returns the backend.
    pub fn dispose(&mut self) -> Option<B> {
        self.interaction.pointer_out();
        self.candle_sync.reset();
        self.line_syncs.clear();
        self.histogram_syncs.clear();
        self.candles.clear();
        self.indicators = IndicatorSet::default();
        let backend = self.renderer.unmount();
        info!("Chart session disposed");
        backend
    }

    pub fn is_disposed(&self) -> bool {
        !self.renderer.is_mounted()
    }

    pub fn candles(&self) -> &[CandlePoint] {
        &self.candles
    }

    pub fn indicators(&self) -> &IndicatorSet {
        &self.indicators
    }

    pub fn settings(&self) -> &IndicatorSettings {
        self.engine.settings()
    }

    pub fn renderer(&self) -> &ChartRenderer<B> {
        &self.renderer
    }

    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    pub fn candle_synchronizer(&self) -> &SeriesSynchronizer<CandlePoint> {
        &self.candle_sync
    }

    pub fn line_synchronizer(&self, key: SeriesKey) -> Option<&SeriesSynchronizer<IndicatorPoint>> {
        self.line_syncs.get(&key)
    }

    pub fn histogram_synchronizer(
        &self,
        key: SeriesKey,
    ) -> Option<&SeriesSynchronizer<HistogramPoint>> {
        self.histogram_syncs.get(&key)
    }
}
