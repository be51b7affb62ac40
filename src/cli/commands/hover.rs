//! Hover command implementation.

use anyhow::{Context, Result};
use chart_config::ChartConfig;
use chart_render::RetainedScene;
use chart_session::ChartSession;

use super::{load_candles, session_options};
use crate::cli::{HoverArgs, OutputFormat};

pub async fn run(args: HoverArgs, config: &ChartConfig) -> Result<()> {
    let candles = load_candles(args.data.as_deref(), config)?;
    let mut session = ChartSession::create(
        RetainedScene::new(),
        config.indicators.clone(),
        session_options(config),
    )
    .context("Failed to create chart session")?;
    session
        .on_candles_changed(&candles)
        .context("Candle snapshot rejected")?;

    let tooltip = session.pointer_move(args.x, args.y);
    let plot = session.renderer().plot_area();

    match (args.output, tooltip) {
        (OutputFormat::Json, tooltip) => {
            println!("{}", serde_json::to_string_pretty(&tooltip)?);
        }
        (OutputFormat::Text, Some(tooltip)) => {
            let c = &tooltip.candle;
            println!("Candle #{} at {}", tooltip.index, tooltip.time.to_rfc3339());
            println!(
                "  O {:.4}  H {:.4}  L {:.4}  C {:.4}  V {:.2}",
                c.open, c.high, c.low, c.close, c.volume
            );
            for (key, value) in &tooltip.values {
                println!("  {:<12} {:.4}", key.to_string(), value);
            }
        }
        (OutputFormat::Text, None) => {
            println!(
                "No candle under ({}, {}); plot area is x {:.0}..{:.0}, y {:.0}..{:.0}",
                args.x,
                args.y,
                plot.x,
                plot.right(),
                plot.y,
                plot.bottom()
            );
        }
    }

    session.dispose();
    Ok(())
}
