//! Replay command implementation.

use anyhow::{Context, Result};
use chart_config::ChartConfig;
use chart_core::types::CandlePoint;
use chart_data::DemoFeed;
use chart_render::SvgScene;
use chart_session::{ChartSession, SyncReport};
use chart_sync::SyncKind;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{info, warn};

use super::{load_candles, session_options};
use crate::cli::{OutputFormat, ReplayArgs};

/// Totals over a replay.
#[derive(Debug, Default, Serialize)]
struct ReplaySummary {
    snapshots: usize,
    final_candles: usize,
    rejected: usize,
    actions: BTreeMap<SyncKind, usize>,
    removed_series: usize,
    glyphs_added: usize,
    glyphs_updated: usize,
    glyphs_removed: usize,
    full_relayouts: usize,
}

impl ReplaySummary {
    fn record(&mut self, report: &SyncReport) {
        self.snapshots += 1;
        for (_, kind) in &report.actions {
            *self.actions.entry(*kind).or_default() += 1;
        }
        self.removed_series += report.removed.len();
        self.glyphs_added += report.render.added;
        self.glyphs_updated += report.render.updated;
        self.glyphs_removed += report.render.removed;
        if report.render.full_relayout {
            self.full_relayouts += 1;
        }
    }

    fn text(&self) -> String {
        let mut lines = vec![
            format!("Snapshots:        {}", self.snapshots),
            format!("Final candles:    {}", self.final_candles),
            format!("Rejected:         {}", self.rejected),
        ];
        for (kind, count) in &self.actions {
            lines.push(format!("{:<18}{}", format!("{}:", kind), count));
        }
        lines.push(format!("Series removed:   {}", self.removed_series));
        lines.push(format!(
            "Glyphs:           +{} ~{} -{}",
            self.glyphs_added, self.glyphs_updated, self.glyphs_removed
        ));
        lines.push(format!("Full relayouts:   {}", self.full_relayouts));
        lines.join("\n")
    }
}

/// Source of successive snapshots.
enum Snapshots {
    Feed(DemoFeed),
    Csv { candles: Vec<CandlePoint>, shown: usize },
}

impl Snapshots {
    fn initial(&self) -> &[CandlePoint] {
        match self {
            Snapshots::Feed(feed) => feed.snapshot(),
            Snapshots::Csv { candles, shown } => &candles[..*shown],
        }
    }

    /// Next snapshot, or `None` once a CSV file is exhausted.
    fn next(&mut self, tick: usize, reset_every: Option<usize>) -> Option<Vec<CandlePoint>> {
        match self {
            Snapshots::Feed(feed) => {
                if reset_every.is_some_and(|n| n > 0 && tick % n == 0) {
                    info!(tick, "Demo feed reset");
                    return Some(feed.reset().to_vec());
                }
                Some(feed.tick().to_vec())
            }
            Snapshots::Csv { candles, shown } => {
                if *shown >= candles.len() {
                    return None;
                }
                *shown += 1;
                Some(candles[..*shown].to_vec())
            }
        }
    }
}

pub async fn run(args: ReplayArgs, config: &ChartConfig) -> Result<()> {
    config.validate().context("Invalid configuration")?;

    let mut source = match &args.data {
        Some(path) => {
            let candles = load_candles(Some(path), config)?;
            let shown = config.feed.history.min(candles.len());
            Snapshots::Csv { candles, shown }
        }
        None => Snapshots::Feed(DemoFeed::new(config.feed.clone())),
    };

    let mut session = ChartSession::create(
        SvgScene::new(),
        config.indicators.clone(),
        session_options(config),
    )
    .context("Failed to create chart session")?;

    let mut summary = ReplaySummary::default();
    let report = session
        .on_candles_changed(source.initial())
        .context("Initial snapshot rejected")?;
    summary.record(&report);
    info!(candles = session.candles().len(), "Replay started");

    let mut interval = (args.interval_ms > 0)
        .then(|| tokio::time::interval(Duration::from_millis(args.interval_ms)));

    for tick in 1..=args.ticks {
        if let Some(interval) = interval.as_mut() {
            interval.tick().await;
        }
        let Some(snapshot) = source.next(tick, args.reset_every) else {
            info!(tick, "Data exhausted");
            break;
        };
        match session.on_candles_changed(&snapshot) {
            Ok(report) => summary.record(&report),
            Err(e) => {
                warn!(tick, error = %e, "Snapshot rejected");
                summary.rejected += 1;
            }
        }
    }
    summary.final_candles = session.candles().len();

    if let Some(path) = &args.svg {
        let svg = session
            .renderer()
            .backend()
            .map(SvgScene::to_svg)
            .unwrap_or_default();
        std::fs::write(path, svg)
            .with_context(|| format!("Failed to write SVG to {}", path.display()))?;
        info!("Final frame saved to {:?}", path);
    }
    session.dispose();

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => println!("{}", summary.text()),
    }

    Ok(())
}
