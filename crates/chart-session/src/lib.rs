//! Chart session.
//!
//! A [`ChartSession`] owns everything one mounted chart needs: the
//! indicator engine, a synchronizer per series, the renderer and the
//! pointer [`InteractionController`]. Every candle snapshot goes through
//! the same explicit pipeline: validate, recompute, synchronize, render.

pub mod interaction;
pub mod session;

pub use interaction::{bisect_candles, Crosshair, InteractionController, Tooltip};
pub use session::{ChartSession, SessionOptions, SyncReport};
