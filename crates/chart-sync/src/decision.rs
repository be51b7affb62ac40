//! The replace / append / update-last rule.

use chart_core::types::TimedPoint;
use serde::Serialize;
use std::fmt;

/// Which mutation a sync step performs on the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncKind {
    /// Nothing changed.
    Noop,
    /// Reset, truncation, gap or first load: swap the whole buffer.
    Replace,
    /// Normal streaming tick: one new point at the end.
    Append,
    /// The still-open last point was revised.
    UpdateLast,
}

impl fmt::Display for SyncKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyncKind::Noop => "noop",
            SyncKind::Replace => "replace",
            SyncKind::Append => "append",
            SyncKind::UpdateLast => "update_last",
        };
        write!(f, "{}", s)
    }
}

/// Choose the sync action from the cached and incoming series shapes.
///
/// `cached_len` is the logical length of the previously applied series,
/// which may exceed the number of points the cache still retains.
/// The result depends on nothing but the four arguments.
pub fn decide<P: TimedPoint>(
    cached_len: usize,
    incoming_len: usize,
    cached_last: Option<&P>,
    incoming_last: Option<&P>,
) -> SyncKind {
    if cached_len == 0 {
        return if incoming_len == 0 {
            SyncKind::Noop
        } else {
            SyncKind::Replace
        };
    }

    if incoming_len < cached_len || incoming_len > cached_len + 1 {
        return SyncKind::Replace;
    }

    if incoming_len == cached_len + 1 {
        return SyncKind::Append;
    }

    match (cached_last, incoming_last) {
        (Some(cached), Some(incoming)) if cached.time_key() == incoming.time_key() => {
            if cached == incoming {
                SyncKind::Noop
            } else {
                SyncKind::UpdateLast
            }
        }
        // Same length but the tail moved: history was rewritten.
        _ => SyncKind::Replace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chart_core::types::IndicatorPoint;

    fn p(time: i64, value: f64) -> IndicatorPoint {
        IndicatorPoint::new(time, value)
    }

    #[test]
    fn test_empty_cache() {
        assert_eq!(decide::<IndicatorPoint>(0, 0, None, None), SyncKind::Noop);
        assert_eq!(decide(0, 5, None, Some(&p(5, 1.0))), SyncKind::Replace);
    }

    #[test]
    fn test_truncation_and_gap_replace() {
        let last = p(10, 1.0);
        assert_eq!(decide(10, 4, Some(&last), Some(&p(4, 1.0))), SyncKind::Replace);
        assert_eq!(decide(10, 12, Some(&last), Some(&p(12, 1.0))), SyncKind::Replace);
        assert_eq!(decide(10, 0, Some(&last), None), SyncKind::Replace);
    }

    #[test]
    fn test_append_one() {
        assert_eq!(
            decide(10, 11, Some(&p(10, 1.0)), Some(&p(11, 2.0))),
            SyncKind::Append
        );
    }

    #[test]
    fn test_update_last_and_noop() {
        assert_eq!(
            decide(10, 10, Some(&p(10, 1.0)), Some(&p(10, 1.5))),
            SyncKind::UpdateLast
        );
        assert_eq!(
            decide(10, 10, Some(&p(10, 1.0)), Some(&p(10, 1.0))),
            SyncKind::Noop
        );
    }

    #[test]
    fn test_same_length_shifted_tail_replaces() {
        assert_eq!(
            decide(10, 10, Some(&p(10, 1.0)), Some(&p(11, 1.0))),
            SyncKind::Replace
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(SyncKind::UpdateLast.to_string(), "update_last");
        assert_eq!(SyncKind::Append.to_string(), "append");
    }
}
