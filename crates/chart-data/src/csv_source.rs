//! CSV candle source.

use std::io::Read;
use std::path::{Path, PathBuf};

use chart_core::error::DataError;
use chart_core::types::CandlePoint;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::{debug, warn};

/// Unix values above this are taken as milliseconds, below as seconds.
const MILLIS_THRESHOLD: i64 = 10_000_000_000;

#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(
        alias = "Date",
        alias = "date",
        alias = "Time",
        alias = "time",
        alias = "timestamp",
        alias = "Timestamp"
    )]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close")]
    close: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: f64,
}

/// Loads a candle snapshot from a CSV file with a header row.
///
/// Output is sorted by timestamp; rows repeating a timestamp keep the
/// last occurrence.
#[derive(Debug, Clone)]
pub struct CsvCandleSource {
    path: PathBuf,
}

impl CsvCandleSource {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::NotFound(path.display().to_string()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every candle from the file.
    pub fn load(&self) -> Result<Vec<CandlePoint>, DataError> {
        let file = std::fs::File::open(&self.path)
            .map_err(|e| DataError::Parse(format!("{}: {}", self.path.display(), e)))?;
        let candles = Self::parse(file)?;
        debug!(path = %self.path.display(), candles = candles.len(), "Loaded CSV candles");
        Ok(candles)
    }

    /// Parse CSV content from any reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<CandlePoint>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut candles = Vec::new();
        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| DataError::Parse(e.to_string()))?;
            candles.push(CandlePoint::new(
                parse_timestamp(&record.date)?,
                record.open,
                record.high,
                record.low,
                record.close,
                record.volume,
            ));
        }

        // stable sort, so the last row of a repeated timestamp stays last
        candles.sort_by_key(|c| c.timestamp);
        let before = candles.len();
        candles.reverse();
        candles.dedup_by_key(|c| c.timestamp);
        candles.reverse();
        if candles.len() != before {
            warn!(dropped = before - candles.len(), "Dropped rows with repeated timestamps");
        }

        Ok(candles)
    }
}

/// Parse a date string, RFC 3339 timestamp or unix seconds/milliseconds
/// into unix milliseconds.
pub(crate) fn parse_timestamp(value: &str) -> Result<i64, DataError> {
    if let Ok(ts) = value.parse::<i64>() {
        return Ok(if ts.abs() > MILLIS_THRESHOLD { ts } else { ts * 1000 });
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.timestamp_millis());
    }

    const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M"];
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date.and_time(NaiveTime::default()).and_utc().timestamp_millis());
        }
    }

    Err(DataError::Parse(format!("Could not parse date: {}", value)))
}
