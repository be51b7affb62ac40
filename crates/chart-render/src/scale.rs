//! Time (X) and value (Y) scale transforms with zoom/pan.

use chart_core::types::CandlePoint;
use serde::Serialize;

/// Smallest and largest zoom factor a [`ZoomTransform`] accepts.
pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 64.0;

/// Linear mapping from a data domain onto a pixel range.
///
/// The range may be inverted (price axes run bottom to top).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Create a scale; a zero-width domain is widened by one unit so the
    /// mapping never divides by zero.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let (d0, mut d1) = domain;
        if (d1 - d0).abs() < 1e-12 {
            d1 = d0 + 1.0;
        }
        Self {
            domain: (d0, d1),
            range,
        }
    }

    /// Price axis with 1% headroom: `[min(low) * 0.99, max(high) * 1.01]`.
    ///
    /// Returns `None` for an empty candle slice.
    pub fn for_candles<'a>(
        candles: impl IntoIterator<Item = &'a CandlePoint>,
        range: (f64, f64),
    ) -> Option<Self> {
        let (low, high) = candles
            .into_iter()
            .fold(None, |acc: Option<(f64, f64)>, c| match acc {
                None => Some((c.low, c.high)),
                Some((lo, hi)) => Some((lo.min(c.low), hi.max(c.high))),
            })?;
        Some(Self::new((low * 0.99, high * 1.01), range))
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Same domain, new pixel range.
    pub fn with_range(&self, range: (f64, f64)) -> Self {
        Self {
            domain: self.domain,
            range,
        }
    }

    #[inline]
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    #[inline]
    pub fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = r1 - r0;
        if span.abs() < 1e-12 {
            return d0;
        }
        d0 + (px - r0) / span * (d1 - d0)
    }
}

/// Horizontal scale from millisecond timestamps to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeScale(LinearScale);

impl TimeScale {
    pub fn new(domain_ms: (f64, f64), range: (f64, f64)) -> Self {
        Self(LinearScale::new(domain_ms, range))
    }

    /// Domain spanning the first and last candle timestamps.
    pub fn for_candles(candles: &[CandlePoint], range: (f64, f64)) -> Option<Self> {
        let first = candles.first()?;
        let last = candles.last()?;
        Some(Self::new(
            (first.timestamp as f64, last.timestamp as f64),
            range,
        ))
    }

    pub fn domain(&self) -> (f64, f64) {
        self.0.domain()
    }

    pub fn range(&self) -> (f64, f64) {
        self.0.range()
    }

    pub fn with_range(&self, range: (f64, f64)) -> Self {
        Self(self.0.with_range(range))
    }

    /// Pixel x of a millisecond timestamp.
    #[inline]
    pub fn map(&self, timestamp_ms: f64) -> f64 {
        self.0.map(timestamp_ms)
    }

    /// Pixel x of a derived point's time in seconds.
    #[inline]
    pub fn map_secs(&self, time_secs: i64) -> f64 {
        self.0.map(time_secs as f64 * 1000.0)
    }

    /// Timestamp in milliseconds under a pixel x.
    #[inline]
    pub fn invert(&self, px: f64) -> f64 {
        self.0.invert(px)
    }

    /// Pixels per millisecond.
    pub fn pixels_per_ms(&self) -> f64 {
        let (d0, d1) = self.domain();
        let (r0, r1) = self.range();
        (r1 - r0) / (d1 - d0)
    }
}

/// Zoom/pan state applied to the time axis only: `px' = px * k + x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: ZoomTransform = ZoomTransform { k: 1.0, x: 0.0 };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    #[inline]
    pub fn apply(&self, px: f64) -> f64 {
        px * self.k + self.x
    }

    #[inline]
    pub fn invert(&self, px: f64) -> f64 {
        (px - self.x) / self.k
    }

    /// Time scale seen through this transform: same range, domain narrowed
    /// (or shifted) so that `rescaled.map(t) == self.apply(base.map(t))`.
    pub fn rescale(&self, base: &TimeScale) -> TimeScale {
        let (r0, r1) = base.range();
        let d0 = base.invert(self.invert(r0));
        let d1 = base.invert(self.invert(r1));
        TimeScale::new((d0, d1), (r0, r1))
    }

    /// Multiply the zoom factor by `factor`, keeping `cursor_px` fixed.
    pub fn zoom_at(&mut self, cursor_px: f64, factor: f64) {
        if !(cursor_px.is_finite() && factor.is_finite() && factor > 0.0) {
            return;
        }
        let new_k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        // keep the point under the cursor: apply'(invert(cursor)) == cursor
        let anchor = self.invert(cursor_px);
        self.k = new_k;
        self.x = cursor_px - anchor * new_k;
    }

    /// Shift by `dx_px` pixels.
    pub fn pan(&mut self, dx_px: f64) {
        if dx_px.is_finite() {
            self.x += dx_px;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_map_and_invert() {
        let scale = LinearScale::new((0.0, 100.0), (400.0, 0.0));
        assert!((scale.map(0.0) - 400.0).abs() < 1e-9);
        assert!((scale.map(100.0) - 0.0).abs() < 1e-9);
        assert!((scale.map(25.0) - 300.0).abs() < 1e-9);
        assert!((scale.invert(300.0) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_domain_is_widened() {
        let scale = LinearScale::new((5.0, 5.0), (0.0, 10.0));
        assert_eq!(scale.domain(), (5.0, 6.0));
        assert!(scale.map(5.5).is_finite());
    }

    #[test]
    fn test_price_headroom() {
        let candles = [
            CandlePoint::new(0, 100.0, 110.0, 90.0, 105.0, 1.0),
            CandlePoint::new(1000, 105.0, 120.0, 100.0, 118.0, 1.0),
        ];
        let scale = LinearScale::for_candles(&candles, (300.0, 0.0)).unwrap();
        let (lo, hi) = scale.domain();
        assert!((lo - 89.1).abs() < 1e-9);
        assert!((hi - 121.2).abs() < 1e-9);
        assert!(LinearScale::for_candles(std::iter::empty(), (1.0, 0.0)).is_none());
    }

    #[test]
    fn test_time_scale_for_candles() {
        let candles = [
            CandlePoint::new(1_000, 1.0, 1.0, 1.0, 1.0, 0.0),
            CandlePoint::new(5_000, 1.0, 1.0, 1.0, 1.0, 0.0),
        ];
        let scale = TimeScale::for_candles(&candles, (0.0, 800.0)).unwrap();
        assert!((scale.map(3_000.0) - 400.0).abs() < 1e-9);
        assert!((scale.map_secs(5) - 800.0).abs() < 1e-9);
        assert!((scale.invert(200.0) - 2_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_rescale_matches_transform() {
        let base = TimeScale::new((0.0, 10_000.0), (50.0, 850.0));
        let mut transform = ZoomTransform::IDENTITY;
        transform.zoom_at(450.0, 4.0);
        transform.pan(-30.0);

        let rescaled = transform.rescale(&base);
        for t in [0.0, 2_500.0, 5_000.0, 9_999.0] {
            let expected = transform.apply(base.map(t));
            assert!((rescaled.map(t) - expected).abs() < 1e-6);
        }
        assert_eq!(rescaled.range(), base.range());
    }

    #[test]
    fn test_zoom_keeps_cursor_anchor() {
        let mut transform = ZoomTransform::default();
        let before = transform.invert(300.0);
        transform.zoom_at(300.0, 2.0);
        assert!((transform.invert(300.0) - before).abs() < 1e-9);
        assert!((transform.k - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut transform = ZoomTransform::default();
        transform.zoom_at(0.0, 0.1);
        assert_eq!(transform.k, MIN_ZOOM);
        transform.zoom_at(0.0, 1_000.0);
        assert_eq!(transform.k, MAX_ZOOM);
    }

    #[test]
    fn test_non_finite_input_is_ignored() {
        let mut transform = ZoomTransform::default();
        transform.zoom_at(100.0, 2.0);
        let before = transform;

        transform.zoom_at(f64::NAN, 2.0);
        transform.zoom_at(f64::INFINITY, 2.0);
        transform.zoom_at(100.0, f64::NAN);
        transform.pan(f64::NAN);
        assert_eq!(transform, before);
        assert!(transform.x.is_finite());
    }
}
