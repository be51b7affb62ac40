//! Renderer-side point buffers.

use std::collections::VecDeque;

use chart_core::types::{CandlePoint, HistogramPoint, IndicatorPoint};
use chart_sync::SyncAction;

/// Points the renderer currently holds for one series.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesBuffer {
    Candles(VecDeque<CandlePoint>),
    Line(VecDeque<IndicatorPoint>),
    Histogram(VecDeque<HistogramPoint>),
}

impl SeriesBuffer {
    pub fn len(&self) -> usize {
        match self {
            SeriesBuffer::Candles(points) => points.len(),
            SeriesBuffer::Line(points) => points.len(),
            SeriesBuffer::Histogram(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_candles(&self) -> Option<&VecDeque<CandlePoint>> {
        match self {
            SeriesBuffer::Candles(points) => Some(points),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&VecDeque<IndicatorPoint>> {
        match self {
            SeriesBuffer::Line(points) => Some(points),
            _ => None,
        }
    }

    pub fn as_histogram(&self) -> Option<&VecDeque<HistogramPoint>> {
        match self {
            SeriesBuffer::Histogram(points) => Some(points),
            _ => None,
        }
    }

    /// Value range of the held points, ignoring non-finite values.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let values: Box<dyn Iterator<Item = (f64, f64)> + '_> = match self {
            SeriesBuffer::Candles(points) => Box::new(points.iter().map(|c| (c.low, c.high))),
            SeriesBuffer::Line(points) => Box::new(points.iter().map(|p| (p.value, p.value))),
            SeriesBuffer::Histogram(points) => {
                Box::new(points.iter().map(|p| (p.value, p.value)))
            }
        };
        values
            .filter(|(lo, hi)| lo.is_finite() && hi.is_finite())
            .fold(None, |acc, (lo, hi)| match acc {
                None => Some((lo, hi)),
                Some((a, b)) => Some((lo.min(a), hi.max(b))),
            })
    }
}

/// Apply one sync action to a bounded buffer.
///
/// Returns `true` when the buffer changed.
pub fn apply_action<P: Clone>(
    buffer: &mut VecDeque<P>,
    action: SyncAction<P>,
    capacity: usize,
) -> bool {
    match action {
        SyncAction::Noop => false,
        SyncAction::Replace(points) => {
            let start = points.len().saturating_sub(capacity);
            buffer.clear();
            buffer.extend(points.into_iter().skip(start));
            true
        }
        SyncAction::Append(point) => {
            while buffer.len() >= capacity.max(1) {
                buffer.pop_front();
            }
            buffer.push_back(point);
            true
        }
        SyncAction::UpdateLast(point) => {
            match buffer.back_mut() {
                Some(last) => *last = point,
                None => buffer.push_back(point),
            }
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_actions() {
        let mut buffer: VecDeque<i32> = VecDeque::new();

        assert!(apply_action(&mut buffer, SyncAction::Replace(vec![1, 2, 3]), 3));
        assert!(apply_action(&mut buffer, SyncAction::Append(4), 3));
        assert_eq!(buffer, VecDeque::from(vec![2, 3, 4]));

        assert!(apply_action(&mut buffer, SyncAction::UpdateLast(5), 3));
        assert_eq!(buffer.back(), Some(&5));

        assert!(!apply_action(&mut buffer, SyncAction::Noop, 3));
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn test_replace_is_bounded() {
        let mut buffer = VecDeque::new();
        apply_action(&mut buffer, SyncAction::Replace((0..10).collect()), 4);
        assert_eq!(buffer, VecDeque::from(vec![6, 7, 8, 9]));
    }

    #[test]
    fn test_value_range() {
        let buffer = SeriesBuffer::Line(
            [
                IndicatorPoint::new(0, 3.0),
                IndicatorPoint::new(1, f64::NAN),
                IndicatorPoint::new(2, -1.0),
            ]
            .into_iter()
            .collect(),
        );
        assert_eq!(buffer.value_range(), Some((-1.0, 3.0)));
        assert_eq!(SeriesBuffer::Line(VecDeque::new()).value_range(), None);
    }
}
