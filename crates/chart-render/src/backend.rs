//! Drawing backends.

use serde::Serialize;

use crate::layout::Size;
use crate::scene::{Frame, Glyph, GlyphId, SceneDiff};

/// Receives glyph changes from the renderer.
///
/// Implementations only ever see the difference between two frames.
pub trait RenderBackend {
    /// Apply one frame diff.
    fn apply(&mut self, diff: &SceneDiff);

    /// The drawing surface changed size.
    fn resize(&mut self, size: Size);

    /// Drop every glyph and any held resources.
    fn release(&mut self);
}

/// Counters of mutations a backend has received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MutationStats {
    pub diffs: usize,
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
}

impl MutationStats {
    fn record(&mut self, diff: &SceneDiff) {
        self.diffs += 1;
        self.added += diff.added.len();
        self.updated += diff.updated.len();
        self.removed += diff.removed.len();
    }
}

/// In-memory glyph store.
#[derive(Debug, Clone, Default)]
pub struct RetainedScene {
    glyphs: Frame,
    size: Option<Size>,
    stats: MutationStats,
    released: bool,
}

impl RetainedScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn glyphs(&self) -> &Frame {
        &self.glyphs
    }

    pub fn glyph(&self, id: &GlyphId) -> Option<&Glyph> {
        self.glyphs.get(id)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn size(&self) -> Option<Size> {
        self.size
    }

    pub fn stats(&self) -> MutationStats {
        self.stats
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl RenderBackend for RetainedScene {
    fn apply(&mut self, diff: &SceneDiff) {
        for id in &diff.removed {
            self.glyphs.remove(id);
        }
        for (id, glyph) in diff.added.iter().chain(diff.updated.iter()) {
            self.glyphs.insert(*id, *glyph);
        }
        self.stats.record(diff);
        self.released = false;
    }

    fn resize(&mut self, size: Size) {
        self.size = Some(size);
    }

    fn release(&mut self) {
        self.glyphs.clear();
        self.released = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{diff_frames, GlyphPart};
    use chart_core::types::SeriesKey;

    fn rule(x: f64) -> Glyph {
        Glyph::Rule {
            x1: x,
            y1: 0.0,
            x2: x,
            y2: 100.0,
        }
    }

    #[test]
    fn test_retained_scene_tracks_frames() {
        let id = GlyphId::new(SeriesKey::Crosshair, 0, GlyphPart::CrosshairV);
        let mut scene = RetainedScene::new();

        let first: Frame = [(id, rule(10.0))].into_iter().collect();
        scene.apply(&diff_frames(&Frame::new(), &first));
        assert_eq!(scene.glyph(&id), Some(&rule(10.0)));

        let second: Frame = [(id, rule(20.0))].into_iter().collect();
        scene.apply(&diff_frames(&first, &second));
        assert_eq!(scene.glyphs(), &second);

        scene.apply(&diff_frames(&second, &Frame::new()));
        assert!(scene.is_empty());

        let stats = scene.stats();
        assert_eq!(stats.diffs, 3);
        assert_eq!((stats.added, stats.updated, stats.removed), (1, 1, 1));
    }

    #[test]
    fn test_release_clears_glyphs() {
        let id = GlyphId::new(SeriesKey::Crosshair, 0, GlyphPart::CrosshairH);
        let mut scene = RetainedScene::new();
        let frame: Frame = [(id, rule(1.0))].into_iter().collect();
        scene.apply(&diff_frames(&Frame::new(), &frame));
        scene.resize(Size::new(400.0, 300.0));

        scene.release();
        assert!(scene.is_empty());
        assert!(scene.is_released());
        assert_eq!(scene.size(), Some(Size::new(400.0, 300.0)));
    }
}
