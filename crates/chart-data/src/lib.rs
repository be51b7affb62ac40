//! Candle sources.
//!
//! Both sources hand out complete, ordered snapshots; the chart core never
//! asks them for deltas.

mod csv_source;
mod feed;

pub use csv_source::CsvCandleSource;
pub use feed::{DemoFeed, FeedSettings};
