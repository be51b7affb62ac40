//! Chart rendering.
//!
//! The renderer keeps one bounded buffer per registered series, lays the
//! series out on shared time and per-pane value scales, and describes the
//! result as a keyed frame of glyphs. Each render diffs the new frame
//! against the previous one and hands only the changes to a
//! [`RenderBackend`], so drawing code never sees unchanged glyphs.

pub mod backend;
pub mod buffer;
pub mod layout;
pub mod renderer;
pub mod scale;
pub mod scene;
pub mod svg;

pub use backend::{MutationStats, RenderBackend, RetainedScene};
pub use buffer::{apply_action, SeriesBuffer};
pub use layout::{pane_for, Margins, Pane, PaneLayout, Rect, Size};
pub use renderer::{ChartRenderer, RenderStats, RendererState};
pub use scale::{LinearScale, TimeScale, ZoomTransform};
pub use scene::{diff_frames, Frame, Glyph, GlyphId, GlyphPart, SceneDiff};
pub use svg::SvgScene;
