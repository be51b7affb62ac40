//! Keyed glyph frames and frame diffing.

use std::collections::BTreeMap;

use chart_core::types::{ColorTag, SeriesKey};
use serde::Serialize;

/// Which piece of a data point a glyph draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GlyphPart {
    Body,
    Wick,
    /// Line segment ending at the keyed point.
    Segment,
    Bar,
    CrosshairV,
    CrosshairH,
}

/// Stable identity of a glyph across frames.
///
/// `time` is the series' own time key (ms for candles, seconds for
/// derived points).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GlyphId {
    pub series: SeriesKey,
    pub time: i64,
    pub part: GlyphPart,
}

impl GlyphId {
    pub fn new(series: SeriesKey, time: i64, part: GlyphPart) -> Self {
        Self { series, time, part }
    }
}

/// Geometry of one drawable primitive, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Glyph {
    CandleBody {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        tag: ColorTag,
    },
    Wick {
        x: f64,
        y_high: f64,
        y_low: f64,
        tag: ColorTag,
    },
    Segment {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Bar {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        tag: ColorTag,
    },
    Rule {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
}

pub type Frame = BTreeMap<GlyphId, Glyph>;

/// Changes that turn one frame into the next.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SceneDiff {
    pub added: Vec<(GlyphId, Glyph)>,
    pub updated: Vec<(GlyphId, Glyph)>,
    pub removed: Vec<GlyphId>,
}

impl SceneDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    /// Total number of glyph mutations.
    pub fn len(&self) -> usize {
        self.added.len() + self.updated.len() + self.removed.len()
    }
}

/// Diff `previous` against `next`, visiting both ordered maps once.
pub fn diff_frames(previous: &Frame, next: &Frame) -> SceneDiff {
    let mut diff = SceneDiff::default();

    for (id, glyph) in next {
        match previous.get(id) {
            None => diff.added.push((*id, *glyph)),
            Some(old) if old != glyph => diff.updated.push((*id, *glyph)),
            Some(_) => {}
        }
    }
    diff.removed = previous
        .keys()
        .filter(|id| !next.contains_key(id))
        .copied()
        .collect();

    diff
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(y: f64) -> Glyph {
        Glyph::Segment {
            x1: 0.0,
            y1: 0.0,
            x2: 10.0,
            y2: y,
        }
    }

    #[test]
    fn test_diff_identical_frames_is_empty() {
        let mut frame = Frame::new();
        frame.insert(GlyphId::new(SeriesKey::Rsi, 1, GlyphPart::Segment), segment(5.0));

        let diff = diff_frames(&frame, &frame.clone());
        assert!(diff.is_empty());
        assert_eq!(diff.len(), 0);
    }

    #[test]
    fn test_diff_added_updated_removed() {
        let a = GlyphId::new(SeriesKey::Rsi, 1, GlyphPart::Segment);
        let b = GlyphId::new(SeriesKey::Rsi, 2, GlyphPart::Segment);
        let c = GlyphId::new(SeriesKey::Rsi, 3, GlyphPart::Segment);

        let previous: Frame = [(a, segment(1.0)), (b, segment(2.0))].into_iter().collect();
        let next: Frame = [(b, segment(2.5)), (c, segment(3.0))].into_iter().collect();

        let diff = diff_frames(&previous, &next);
        assert_eq!(diff.added, vec![(c, segment(3.0))]);
        assert_eq!(diff.updated, vec![(b, segment(2.5))]);
        assert_eq!(diff.removed, vec![a]);
        assert_eq!(diff.len(), 3);
    }

    #[test]
    fn test_glyph_serializes_with_kind() {
        let glyph = Glyph::Wick {
            x: 1.0,
            y_high: 2.0,
            y_low: 3.0,
            tag: ColorTag::Bullish,
        };
        let json = serde_json::to_value(glyph).unwrap();
        assert_eq!(json["kind"], "wick");
        assert_eq!(json["tag"], "bullish");
    }
}
