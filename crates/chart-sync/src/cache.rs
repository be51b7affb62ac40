//! Bounded shadow copy of what the renderer holds for one series.

use std::collections::VecDeque;

/// Last-applied points of one series.
///
/// Retains at most `capacity` points, oldest dropped first, while
/// remembering the logical length of the full series that produced them.
#[derive(Debug, Clone)]
pub struct SeriesCache<P> {
    points: VecDeque<P>,
    logical_len: usize,
    capacity: usize,
}

impl<P: Clone> SeriesCache<P> {
    /// Create an empty cache retaining at most `capacity` points.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");
        Self {
            points: VecDeque::new(),
            logical_len: 0,
            capacity,
        }
    }

    /// Length of the full series last applied.
    #[inline]
    pub fn len(&self) -> usize {
        self.logical_len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.logical_len == 0
    }

    /// Number of points actually retained.
    #[inline]
    pub fn retained(&self) -> usize {
        self.points.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn last(&self) -> Option<&P> {
        self.points.back()
    }

    /// Retained points, oldest first.
    pub fn to_vec(&self) -> Vec<P> {
        self.points.iter().cloned().collect()
    }

    /// Mirror a full replacement; returns the retained tail.
    pub fn replace(&mut self, incoming: &[P]) -> Vec<P> {
        let start = incoming.len().saturating_sub(self.capacity);
        let tail = incoming[start..].to_vec();
        self.points = tail.iter().cloned().collect();
        self.logical_len = incoming.len();
        tail
    }

    /// Mirror a one-point append, evicting the oldest point at capacity.
    pub fn push(&mut self, point: P) {
        if self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
        self.logical_len += 1;
    }

    /// Mirror an in-place revision of the last point.
    pub fn set_last(&mut self, point: P) {
        match self.points.back_mut() {
            Some(last) => *last = point,
            None => {
                self.points.push_back(point);
                self.logical_len = self.logical_len.max(1);
            }
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.logical_len = 0;
    }
}
