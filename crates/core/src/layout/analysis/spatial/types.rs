//! Core types for the spatial index.

use std::cmp::Ordering;

use ordered_float::OrderedFloat;

use crate::utils::{BoundingBox, LineSegment, Point};

/// Something that can be stored in the spatial index.
///
/// The tree is built over each anchor's bounds and split on bound centres.
pub trait Anchor: Copy + Send + Sync {
    fn bounds(&self) -> BoundingBox;
}

impl Anchor for Point {
    fn bounds(&self) -> BoundingBox {
        BoundingBox::from_point(*self)
    }
}

impl Anchor for LineSegment {
    fn bounds(&self) -> BoundingBox {
        self.bbox()
    }
}

/// A query result: index of the stored item and its distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f64,
}

/// Entry of the bounded max-heap holding the current k best candidates.
///
/// Ordered by (distance, index) so equal distances resolve to the lower index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct CandidateEntry {
    pub dist: OrderedFloat<f64>,
    pub index: usize,
}

impl CandidateEntry {
    pub fn new(distance: f64, index: usize) -> Self {
        Self {
            dist: OrderedFloat(distance),
            index,
        }
    }
}

impl PartialOrd for CandidateEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CandidateEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist
            .cmp(&other.dist)
            .then_with(|| self.index.cmp(&other.index))
    }
}

impl From<CandidateEntry> for Neighbor {
    fn from(entry: CandidateEntry) -> Self {
        Self {
            index: entry.index,
            distance: entry.dist.into_inner(),
        }
    }
}
