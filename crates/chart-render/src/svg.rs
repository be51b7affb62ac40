//! SVG serialization of a retained scene.

use std::fmt::Write as _;

use chart_core::types::{ColorTag, SeriesKey};

use crate::backend::{MutationStats, RenderBackend, RetainedScene};
use crate::layout::Size;
use crate::scene::{Glyph, SceneDiff};

const BULLISH: &str = "#26a69a";
const BEARISH: &str = "#ef5350";
const CROSSHAIR: &str = "#9598a1";
const BACKGROUND: &str = "#131722";

fn tag_color(tag: ColorTag) -> &'static str {
    match tag {
        ColorTag::Bullish => BULLISH,
        ColorTag::Bearish => BEARISH,
    }
}

fn line_color(series: SeriesKey) -> &'static str {
    match series {
        SeriesKey::Sma(_) => "#2962ff",
        SeriesKey::Ema(_) => "#ff9800",
        SeriesKey::BollingerUpper | SeriesKey::BollingerLower => "#7e57c2",
        SeriesKey::BollingerMiddle => "#b39ddb",
        SeriesKey::Rsi => "#ab47bc",
        SeriesKey::MacdLine => "#2196f3",
        SeriesKey::MacdSignal => "#ff6d00",
        SeriesKey::Obv => "#00bcd4",
        _ => "#d1d4dc",
    }
}

/// Backend that keeps a retained scene and renders it to an SVG document.
#[derive(Debug, Clone, Default)]
pub struct SvgScene {
    scene: RetainedScene,
}

impl SvgScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(&self) -> &RetainedScene {
        &self.scene
    }

    pub fn stats(&self) -> MutationStats {
        self.scene.stats()
    }

    /// Serialize every retained glyph, in draw order.
    pub fn to_svg(&self) -> String {
        let size = self.scene.size().unwrap_or(Size::new(0.0, 0.0));
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = size.width,
            h = size.height
        );
        let _ = writeln!(
            out,
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            BACKGROUND
        );

        for (id, glyph) in self.scene.glyphs() {
            let _ = match *glyph {
                Glyph::CandleBody {
                    x,
                    y,
                    width,
                    height,
                    tag,
                } => writeln!(
                    out,
                    r#"<rect class="{}" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
                    id.series,
                    x,
                    y,
                    width,
                    height.max(1.0),
                    tag_color(tag)
                ),
                Glyph::Wick {
                    x,
                    y_high,
                    y_low,
                    tag,
                } => writeln!(
                    out,
                    r#"<line class="{}" x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}"/>"#,
                    id.series,
                    x,
                    y_high,
                    x,
                    y_low,
                    tag_color(tag)
                ),
                Glyph::Segment { x1, y1, x2, y2 } => writeln!(
                    out,
                    r#"<line class="{}" x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="1.5"/>"#,
                    id.series,
                    x1,
                    y1,
                    x2,
                    y2,
                    line_color(id.series)
                ),
                Glyph::Bar {
                    x,
                    y,
                    width,
                    height,
                    tag,
                } => writeln!(
                    out,
                    r#"<rect class="{}" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" fill-opacity="0.6"/>"#,
                    id.series,
                    x,
                    y,
                    width,
                    height,
                    tag_color(tag)
                ),
                Glyph::Rule { x1, y1, x2, y2 } => writeln!(
                    out,
                    r#"<line class="{}" x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-dasharray="4 4"/>"#,
                    id.series,
                    x1,
                    y1,
                    x2,
                    y2,
                    CROSSHAIR
                ),
            };
        }

        out.push_str("</svg>\n");
        out
    }
}

impl RenderBackend for SvgScene {
    fn apply(&mut self, diff: &SceneDiff) {
        self.scene.apply(diff);
    }

    fn resize(&mut self, size: Size) {
        self.scene.resize(size);
    }

    fn release(&mut self) {
        self.scene.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{diff_frames, Frame, GlyphId, GlyphPart};

    #[test]
    fn test_svg_contains_glyphs() {
        let mut svg = SvgScene::new();
        svg.resize(Size::new(200.0, 100.0));

        let frame: Frame = [
            (
                GlyphId::new(SeriesKey::Candles, 0, GlyphPart::Body),
                Glyph::CandleBody {
                    x: 10.0,
                    y: 20.0,
                    width: 4.0,
                    height: 30.0,
                    tag: ColorTag::Bearish,
                },
            ),
            (
                GlyphId::new(SeriesKey::Sma(20), 1, GlyphPart::Segment),
                Glyph::Segment {
                    x1: 0.0,
                    y1: 1.0,
                    x2: 2.0,
                    y2: 3.0,
                },
            ),
        ]
        .into_iter()
        .collect();
        svg.apply(&diff_frames(&Frame::new(), &frame));

        let doc = svg.to_svg();
        assert!(doc.starts_with("<svg"));
        assert!(doc.contains(r#"width="200""#));
        assert!(doc.contains(BEARISH));
        assert!(doc.contains(r#"class="sma20""#));
        assert!(doc.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_empty_scene_is_valid_document() {
        let doc = SvgScene::new().to_svg();
        assert!(doc.contains("<svg"));
        assert!(doc.contains("</svg>"));
    }
}
