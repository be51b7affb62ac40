//! Validate configuration command.

use anyhow::Result;
use chart_config::load_config;
use std::path::Path;

use crate::cli::ValidateArgs;

pub async fn run(args: ValidateArgs, config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };
    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Chart size: {}x{}", config.chart.width, config.chart.height);
    println!("Max series points: {}", config.chart.max_series_points);
    println!("SMA periods: {:?}", config.indicators.sma.periods);
    println!("EMA periods: {:?}", config.indicators.ema.periods);
    println!(
        "MACD: {}/{}/{}",
        config.indicators.macd.fast, config.indicators.macd.slow, config.indicators.macd.signal
    );
    println!("Demo feed: seed {} @ {}", config.feed.seed, config.feed.timeframe);

    if args.print {
        println!();
        print!("{}", config.to_toml()?);
    }

    Ok(())
}
