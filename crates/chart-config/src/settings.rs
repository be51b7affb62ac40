//! Configuration structures.

use chart_core::error::{ChartError, ChartResult};
use chart_data::FeedSettings;
use chart_indicators::IndicatorSettings;
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ChartConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub chart: ChartSettings,
    #[serde(default)]
    pub indicators: IndicatorSettings,
    #[serde(default)]
    pub feed: FeedSettings,
}

impl ChartConfig {
    /// Check values the engine would otherwise reject or misrender.
    pub fn validate(&self) -> ChartResult<()> {
        self.indicators.validate()?;

        let chart = &self.chart;
        if !(chart.width.is_finite() && chart.width > 0.0)
            || !(chart.height.is_finite() && chart.height > 0.0)
        {
            return Err(ChartError::Config(format!(
                "chart size must be positive, got {}x{}",
                chart.width, chart.height
            )));
        }
        if chart.max_series_points == 0 {
            return Err(ChartError::Config(
                "chart.max_series_points must be greater than 0".to_string(),
            ));
        }

        let feed = &self.feed;
        if feed.ticks_per_candle == 0 {
            return Err(ChartError::Config(
                "feed.ticks_per_candle must be greater than 0".to_string(),
            ));
        }
        if !(feed.start_price.is_finite() && feed.start_price > 0.0) {
            return Err(ChartError::Config(
                "feed.start_price must be positive".to_string(),
            ));
        }
        if !(feed.volatility.is_finite() && (0.0..1.0).contains(&feed.volatility)) {
            return Err(ChartError::Config(
                "feed.volatility must be in [0, 1)".to_string(),
            ));
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(ChartError::Config(format!(
                "logging.format must be \"pretty\" or \"json\", got {:?}",
                other
            ))),
        }
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> ChartResult<String> {
        toml::to_string_pretty(self).map_err(|e| ChartError::Serialization(e.to_string()))
    }
}

/// General app settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "chartctl".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: Option<String>,
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Drawing surface and memory bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub width: f64,
    pub height: f64,
    pub max_series_points: usize,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            max_series_points: 5_000,
        }
    }
}
