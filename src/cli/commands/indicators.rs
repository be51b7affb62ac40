//! Indicators command implementation.

use anyhow::{Context, Result};
use chart_config::ChartConfig;
use chart_indicators::IndicatorEngine;
use serde_json::{json, Map, Value};

use super::load_candles;
use crate::cli::{IndicatorsArgs, OutputFormat};

pub async fn run(args: IndicatorsArgs, config: &ChartConfig) -> Result<()> {
    let candles = load_candles(args.data.as_deref(), config)?;
    let engine = IndicatorEngine::new(config.indicators.clone()).context("Invalid indicator settings")?;
    let set = engine.compute(&candles);

    match args.output {
        OutputFormat::Json => {
            let mut series = Map::new();
            for (key, points) in set.line_series() {
                let start = points.len().saturating_sub(args.tail);
                series.insert(key.to_string(), serde_json::to_value(&points[start..])?);
            }
            for (key, points) in set.histogram_series() {
                let start = points.len().saturating_sub(args.tail);
                series.insert(key.to_string(), serde_json::to_value(&points[start..])?);
            }
            let out = json!({ "candles": candles.len(), "series": Value::Object(series) });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!("Candles: {}", candles.len());
            for (key, points) in set.line_series() {
                let start = points.len().saturating_sub(args.tail);
                let tail: Vec<String> = points[start..]
                    .iter()
                    .map(|p| format!("{}={:.4}", p.time, p.value))
                    .collect();
                println!("{:<12} {:>6} pts  {}", key.to_string(), points.len(), tail.join(" "));
            }
            for (key, points) in set.histogram_series() {
                let start = points.len().saturating_sub(args.tail);
                let tail: Vec<String> = points[start..]
                    .iter()
                    .map(|p| format!("{}={:.4}({:?})", p.time, p.value, p.tag))
                    .collect();
                println!("{:<12} {:>6} pts  {}", key.to_string(), points.len(), tail.join(" "));
            }
        }
    }

    Ok(())
}
