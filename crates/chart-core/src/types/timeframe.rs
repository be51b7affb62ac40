//! Candle bucket widths.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width of one candle bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    #[serde(rename = "1s")]
    Second1,
    #[serde(rename = "1m")]
    #[default]
    Minute1,
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "4h")]
    Hour4,
    #[serde(rename = "1d")]
    Daily,
}

impl Timeframe {
    /// Bucket width in milliseconds.
    pub fn as_millis(&self) -> i64 {
        let secs = match self {
            Timeframe::Second1 => 1,
            Timeframe::Minute1 => 60,
            Timeframe::Minute5 => 300,
            Timeframe::Minute15 => 900,
            Timeframe::Hour1 => 3600,
            Timeframe::Hour4 => 14_400,
            Timeframe::Daily => 86_400,
        };
        secs * 1000
    }

    /// Start of the bucket containing `timestamp_ms`.
    pub fn bucket_start(&self, timestamp_ms: i64) -> i64 {
        let width = self.as_millis();
        timestamp_ms.div_euclid(width) * width
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Timeframe::Second1 => "1s",
            Timeframe::Minute1 => "1m",
            Timeframe::Minute5 => "5m",
            Timeframe::Minute15 => "15m",
            Timeframe::Hour1 => "1h",
            Timeframe::Hour4 => "4h",
            Timeframe::Daily => "1d",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1s" | "second" => Ok(Timeframe::Second1),
            "1m" | "1min" | "minute" => Ok(Timeframe::Minute1),
            "5m" | "5min" => Ok(Timeframe::Minute5),
            "15m" | "15min" => Ok(Timeframe::Minute15),
            "1h" | "hour" => Ok(Timeframe::Hour1),
            "4h" => Ok(Timeframe::Hour4),
            "1d" | "day" | "daily" => Ok(Timeframe::Daily),
            _ => Err(format!("Invalid timeframe: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_width() {
        assert_eq!(Timeframe::Second1.as_millis(), 1_000);
        assert_eq!(Timeframe::Minute1.as_millis(), 60_000);
        assert_eq!(Timeframe::Daily.as_millis(), 86_400_000);
    }

    #[test]
    fn test_bucket_start() {
        assert_eq!(Timeframe::Minute1.bucket_start(125_000), 120_000);
        assert_eq!(Timeframe::Minute1.bucket_start(-1), -60_000);
    }

    #[test]
    fn test_timeframe_round_trips_through_text() {
        for tf in ["1s", "1m", "5m", "15m", "1h", "4h", "1d"] {
            assert_eq!(Timeframe::from_str(tf).unwrap().to_string(), tf);
        }
        assert!(Timeframe::from_str("2w").is_err());
    }
}
