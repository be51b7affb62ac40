//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chartctl")]
#[command(author, version, about = "Streaming market-chart engine")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", env = "CHARTCTL_CONFIG")]
    pub config: PathBuf,

    /// Log level (defaults to the configured level)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Stream candle snapshots through a chart session
    Replay(ReplayArgs),
    /// Print the computed indicator series
    Indicators(IndicatorsArgs),
    /// Print the tooltip for a pointer position
    Hover(HoverArgs),
    /// Validate configuration
    ValidateConfig(ValidateArgs),
}

#[derive(clap::Args)]
pub struct ReplayArgs {
    /// Data file (CSV); the demo feed is used when omitted
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Number of snapshots to stream after the initial history
    #[arg(long, default_value = "100")]
    pub ticks: usize,

    /// Delay between snapshots in milliseconds
    #[arg(long, default_value = "0")]
    pub interval_ms: u64,

    /// Reset the demo feed every N ticks
    #[arg(long)]
    pub reset_every: Option<usize>,

    /// Write the final frame as SVG
    #[arg(long)]
    pub svg: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct IndicatorsArgs {
    /// Data file (CSV); the demo feed history is used when omitted
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Points to print per series
    #[arg(long, default_value = "5")]
    pub tail: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct HoverArgs {
    /// Pointer x in pixels
    #[arg(long)]
    pub x: f64,

    /// Pointer y in pixels
    #[arg(long)]
    pub y: f64,

    /// Data file (CSV); the demo feed history is used when omitted
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Print the effective configuration as TOML
    #[arg(long)]
    pub print: bool,
}
