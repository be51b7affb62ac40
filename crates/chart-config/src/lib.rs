//! Configuration management.

mod settings;

pub use settings::{AppSettings, ChartConfig, ChartSettings, LoggingConfig};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Environment variable prefix; `CHART__CHART__WIDTH=1200` sets `chart.width`.
pub const ENV_PREFIX: &str = "CHART";

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<ChartConfig, ConfigError> {
    load_layers(Some(path), environment())
}

/// Like [`load_config`], but a missing file yields the defaults (still
/// overridable from the environment).
pub fn load_or_default(path: &Path) -> Result<ChartConfig, ConfigError> {
    let file = path.exists().then_some(path);
    load_layers(file, environment())
}

fn load_layers(path: Option<&Path>, env: Environment) -> Result<ChartConfig, ConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }
    builder.add_source(env).build()?.try_deserialize()
}
