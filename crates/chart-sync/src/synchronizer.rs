//! Per-series synchronizer.

use chart_core::types::{SeriesKey, TimedPoint};
use tracing::{debug, trace};

use crate::cache::SeriesCache;
use crate::decision::{decide, SyncKind};
use crate::MAX_SERIES_POINTS;

/// Mutation to apply to one renderer series.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncAction<P> {
    Noop,
    /// Swap the whole buffer for these points (already bounded).
    Replace(Vec<P>),
    Append(P),
    UpdateLast(P),
}

impl<P> SyncAction<P> {
    pub fn kind(&self) -> SyncKind {
        match self {
            SyncAction::Noop => SyncKind::Noop,
            SyncAction::Replace(_) => SyncKind::Replace,
            SyncAction::Append(_) => SyncKind::Append,
            SyncAction::UpdateLast(_) => SyncKind::UpdateLast,
        }
    }

    /// Whether applying the action changes anything.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, SyncAction::Noop)
    }
}

/// Owns the shadow cache of one series and turns recomputed arrays into
/// renderer actions.
#[derive(Debug, Clone)]
pub struct SeriesSynchronizer<P> {
    key: SeriesKey,
    cache: SeriesCache<P>,
}

impl<P: TimedPoint> SeriesSynchronizer<P> {
    /// Create a synchronizer bounded by [`MAX_SERIES_POINTS`].
    pub fn new(key: SeriesKey) -> Self {
        Self::with_capacity(key, MAX_SERIES_POINTS)
    }

    /// Create a synchronizer retaining at most `capacity` points.
    pub fn with_capacity(key: SeriesKey, capacity: usize) -> Self {
        Self {
            key,
            cache: SeriesCache::new(capacity),
        }
    }

    pub fn key(&self) -> SeriesKey {
        self.key
    }

    /// Read-only view of the cache.
    pub fn cache(&self) -> &SeriesCache<P> {
        &self.cache
    }

    /// Compare `incoming` with the cache, update the cache, and return the
    /// action that brings the renderer to the same state.
    pub fn sync(&mut self, incoming: &[P]) -> SyncAction<P> {
        let kind = decide(
            self.cache.len(),
            incoming.len(),
            self.cache.last(),
            incoming.last(),
        );

        let action = match (kind, incoming.last()) {
            (SyncKind::Noop, _) => SyncAction::Noop,
            (SyncKind::Append, Some(last)) => {
                self.cache.push(last.clone());
                SyncAction::Append(last.clone())
            }
            (SyncKind::UpdateLast, Some(last)) => {
                self.cache.set_last(last.clone());
                SyncAction::UpdateLast(last.clone())
            }
            _ => SyncAction::Replace(self.cache.replace(incoming)),
        };

        if action.is_mutation() {
            debug!(
                series = %self.key,
                action = %kind,
                cached = self.cache.len(),
                retained = self.cache.retained(),
                "Series synchronized"
            );
        } else {
            trace!(series = %self.key, "Series unchanged");
        }
        action
    }

    /// Forget everything; the next non-empty sync is a full replace.
    pub fn reset(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chart_core::traits::Indicator;
    use chart_core::types::{CandlePoint, IndicatorPoint};
    use chart_indicators::Sma;

    fn candles(closes: &[f64]) -> Vec<CandlePoint> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| CandlePoint::new(i as i64 * 1000, c, c + 1.0, c - 1.0, c, 10.0))
            .collect()
    }

    fn line(values: &[f64]) -> Vec<IndicatorPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| IndicatorPoint::new(i as i64, v))
            .collect()
    }

    #[test]
    fn test_first_sync_replaces() {
        let mut sync = SeriesSynchronizer::new(SeriesKey::Rsi);
        let incoming = line(&[1.0, 2.0, 3.0]);

        assert_eq!(sync.sync(&incoming), SyncAction::Replace(incoming.clone()));
        assert_eq!(sync.cache().to_vec(), incoming);
    }

    #[test]
    fn test_same_input_twice_is_noop() {
        let mut sync = SeriesSynchronizer::new(SeriesKey::Rsi);
        let incoming = line(&[1.0, 2.0, 3.0]);

        sync.sync(&incoming);
        assert_eq!(sync.sync(&incoming), SyncAction::Noop);
        assert!(!sync.sync(&incoming).is_mutation());
    }

    #[test]
    fn test_empty_to_empty_is_noop() {
        let mut sync = SeriesSynchronizer::<IndicatorPoint>::new(SeriesKey::Obv);
        assert_eq!(sync.sync(&[]), SyncAction::Noop);
    }

    #[test]
    fn test_new_candle_appends_indicator_point() {
        let sma = Sma::new(3);
        let mut closes = vec![10.0, 11.0, 12.0, 13.0, 14.0, 15.0];
        let mut sync = SeriesSynchronizer::new(SeriesKey::Sma(3));

        sync.sync(&sma.calculate(&candles(&closes)));
        closes.push(16.0);
        let next = sma.calculate(&candles(&closes));

        let action = sync.sync(&next);
        assert_eq!(action.kind(), SyncKind::Append);
        assert_eq!(action, SyncAction::Append(*next.last().unwrap()));
        assert_eq!(sync.cache().len(), next.len());
    }

    #[test]
    fn test_revised_candle_updates_last() {
        let sma = Sma::new(2);
        let mut closes = vec![10.0, 20.0, 15.0];
        let mut sync = SeriesSynchronizer::new(SeriesKey::Sma(2));
        sync.sync(&sma.calculate(&candles(&closes)));

        closes[2] = 25.0;
        let action = sync.sync(&sma.calculate(&candles(&closes)));
        assert_eq!(action, SyncAction::UpdateLast(IndicatorPoint::new(2, 22.5)));
        assert_eq!(sync.cache().last(), Some(&IndicatorPoint::new(2, 22.5)));
    }

    #[test]
    fn test_reset_and_truncation_replace() {
        let mut sync = SeriesSynchronizer::new(SeriesKey::Rsi);
        sync.sync(&line(&[1.0, 2.0, 3.0, 4.0]));

        let shorter = line(&[9.0, 8.0]);
        assert_eq!(sync.sync(&shorter), SyncAction::Replace(shorter.clone()));

        let backfilled = line(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(sync.sync(&backfilled).kind(), SyncKind::Replace);

        assert_eq!(sync.sync(&[]), SyncAction::Replace(vec![]));
        assert!(sync.cache().is_empty());
    }

    #[test]
    fn test_bounded_cache_keeps_appending() {
        let mut sync = SeriesSynchronizer::with_capacity(SeriesKey::Candles, 4);
        let mut values: Vec<f64> = (0..6).map(f64::from).collect();

        let first = sync.sync(&line(&values));
        assert_eq!(first, SyncAction::Replace(line(&values)[2..].to_vec()));
        assert_eq!(sync.cache().retained(), 4);

        for next in 6..10 {
            values.push(next as f64);
            let action = sync.sync(&line(&values));
            assert_eq!(action.kind(), SyncKind::Append);
            assert_eq!(sync.cache().retained(), 4);
            assert_eq!(sync.cache().len(), values.len());
        }
        assert_eq!(sync.cache().to_vec(), line(&values)[6..].to_vec());
    }

    #[test]
    fn test_candle_series_sync() {
        let mut sync = SeriesSynchronizer::new(SeriesKey::Candles);
        let mut data = candles(&[10.0, 11.0]);
        sync.sync(&data);

        data[1].close = 11.5;
        data[1].high = 12.5;
        assert_eq!(sync.sync(&data), SyncAction::UpdateLast(data[1]));

        data.push(CandlePoint::new(2000, 11.5, 12.0, 11.0, 11.8, 5.0));
        assert_eq!(sync.sync(&data), SyncAction::Append(data[2]));
    }
}
