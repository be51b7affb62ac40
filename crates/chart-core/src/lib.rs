//! Core types and traits for the chart engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (CandlePoint) and their ordering invariants
//! - Derived point types (IndicatorPoint, HistogramPoint) and series identifiers
//! - The batch `Indicator` trait implemented by the indicator engine
//! - The error taxonomy shared by every chart crate

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CandleError, ChartError, ChartResult, DataError, IndicatorError};
pub use traits::*;
pub use types::*;
