//! Series synchronization.
//!
//! For every on-screen series the [`SeriesSynchronizer`] compares a freshly
//! recomputed array with what it last pushed to the renderer and emits a
//! single [`SyncAction`]: replace the whole buffer, append one point, patch
//! the last point, or do nothing. The comparison only looks at lengths and
//! last points (see [`decide`]), so a streaming tick costs O(1) instead of
//! a full array diff.

mod cache;
mod decision;
mod synchronizer;

pub use cache::SeriesCache;
pub use decision::{decide, SyncKind};
pub use synchronizer::{SeriesSynchronizer, SyncAction};

/// Upper bound on points retained per series by caches and renderer buffers.
pub const MAX_SERIES_POINTS: usize = 5_000;
