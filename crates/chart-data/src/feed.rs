//! Seeded random-walk candle feed for demos and replays.

use chart_core::types::{CandlePoint, Timeframe};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Demo feed parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    /// RNG seed; the same seed always yields the same candles
    pub seed: u64,
    pub start_price: f64,
    /// Largest relative price move per tick
    pub volatility: f64,
    pub timeframe: Timeframe,
    /// Candles generated up front
    pub history: usize,
    /// Ticks that revise the open candle before a new one starts
    pub ticks_per_candle: usize,
    /// Timestamp of the first candle (unix ms)
    pub start_time_ms: i64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            start_price: 100.0,
            volatility: 0.004,
            timeframe: Timeframe::Minute1,
            history: 200,
            ticks_per_candle: 4,
            start_time_ms: 1_704_067_200_000,
        }
    }
}

/// Simulated market feed producing full candle snapshots.
///
/// Each [`tick`](Self::tick) either revises the still-open last candle or,
/// every `ticks_per_candle` ticks, opens a new one.
#[derive(Debug, Clone)]
pub struct DemoFeed {
    settings: FeedSettings,
    rng: StdRng,
    candles: Vec<CandlePoint>,
    price: f64,
    ticks_in_candle: usize,
}

impl DemoFeed {
    pub fn new(settings: FeedSettings) -> Self {
        let mut feed = Self {
            rng: StdRng::seed_from_u64(settings.seed),
            price: settings.start_price,
            settings,
            candles: Vec::new(),
            ticks_in_candle: 0,
        };
        feed.generate_history();
        feed
    }

    pub fn settings(&self) -> &FeedSettings {
        &self.settings
    }

    /// Current full snapshot.
    pub fn snapshot(&self) -> &[CandlePoint] {
        &self.candles
    }

    /// The candles generated up front.
    pub fn history(&self) -> &[CandlePoint] {
        let len = self.settings.history.min(self.candles.len());
        &self.candles[..len]
    }

    /// Advance the feed by one tick and return the new snapshot.
    pub fn tick(&mut self) -> &[CandlePoint] {
        self.ticks_in_candle += 1;
        if self.candles.is_empty() || self.ticks_in_candle >= self.settings.ticks_per_candle.max(1) {
            self.ticks_in_candle = 0;
            self.open_candle();
        } else {
            self.revise_last();
        }
        &self.candles
    }

    /// Reseed and regenerate the history; the next snapshot is shorter
    /// than the previous one whenever ticks were taken.
    pub fn reset(&mut self) -> &[CandlePoint] {
        self.rng = StdRng::seed_from_u64(self.settings.seed);
        self.price = self.settings.start_price;
        self.ticks_in_candle = 0;
        self.candles.clear();
        self.generate_history();
        debug!(candles = self.candles.len(), "Demo feed reset");
        &self.candles
    }

    fn generate_history(&mut self) {
        for _ in 0..self.settings.history {
            self.open_candle();
            for _ in 1..self.settings.ticks_per_candle.max(1) {
                self.revise_last();
            }
        }
    }

    fn step(&mut self) -> f64 {
        let change = self.rng.gen_range(-1.0..=1.0) * self.settings.volatility;
        self.price = (self.price * (1.0 + change)).max(0.01);
        self.price
    }

    fn open_candle(&mut self) {
        let timestamp = match self.candles.last() {
            Some(last) => last.timestamp + self.settings.timeframe.as_millis(),
            None => self
                .settings
                .timeframe
                .bucket_start(self.settings.start_time_ms),
        };
        let open = self.price;
        let close = self.step();
        let volume = self.rng.gen_range(10.0..100.0);
        self.candles.push(CandlePoint::new(
            timestamp,
            open,
            open.max(close),
            open.min(close),
            close,
            volume,
        ));
    }

    fn revise_last(&mut self) {
        let price = self.step();
        let extra = self.rng.gen_range(1.0..25.0);
        if let Some(last) = self.candles.last_mut() {
            last.close = price;
            last.high = last.high.max(price);
            last.low = last.low.min(price);
            last.volume += extra;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chart_core::types::validate_candles;

    fn settings() -> FeedSettings {
        FeedSettings {
            history: 50,
            ticks_per_candle: 3,
            ..FeedSettings::default()
        }
    }

    #[test]
    fn test_history_is_valid_and_deterministic() {
        let a = DemoFeed::new(settings());
        let b = DemoFeed::new(settings());

        assert_eq!(a.snapshot().len(), 50);
        assert_eq!(a.snapshot(), b.snapshot());
        assert!(validate_candles(a.snapshot()).is_ok());
        assert_eq!(a.history(), a.snapshot());
    }

    #[test]
    fn test_tick_revises_then_appends() {
        let mut feed = DemoFeed::new(settings());
        let before = feed.snapshot().to_vec();

        let after = feed.tick().to_vec();
        assert_eq!(after.len(), before.len());
        assert_eq!(after[..49], before[..49]);
        assert_eq!(after[49].timestamp, before[49].timestamp);

        feed.tick();
        let appended = feed.tick().to_vec();
        assert_eq!(appended.len(), 51);
        assert_eq!(appended[50].timestamp - appended[49].timestamp, 60_000);
        assert_eq!(appended[50].open, appended[49].close);
        assert!(validate_candles(&appended).is_ok());
    }

    #[test]
    fn test_reset_restores_history() {
        let mut feed = DemoFeed::new(settings());
        let initial = feed.snapshot().to_vec();
        for _ in 0..10 {
            feed.tick();
        }
        assert!(feed.snapshot().len() > initial.len());

        assert_eq!(feed.reset(), initial.as_slice());
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: FeedSettings =
            serde_json::from_str(r#"{"seed": 7, "timeframe": "5m"}"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.timeframe, Timeframe::Minute5);
        assert_eq!(settings.history, FeedSettings::default().history);
    }
}
