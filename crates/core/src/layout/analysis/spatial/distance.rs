//! Distance and angle calculations for nearest-neighbour search.
//!
//! Free functions are the raw measures; the `Metric` implementations wrap
//! them together with a lower bound against a node's bounds so the spatial
//! tree can prune branches.

use crate::utils::{BoundingBox, LineSegment, Point};

/// A distance between two anchors, with a lower bound used for pruning.
pub trait Metric<A> {
    fn distance(&self, a: &A, b: &A) -> f64;

    /// Lower bound on `distance(query, x)` for any anchor `x` contained in
    /// `bounds`. The default of zero disables pruning and is always correct.
    fn lower_bound(&self, _query: &A, _bounds: &BoundingBox) -> f64 {
        0.0
    }
}

/// Euclidean distance between two points.
#[inline]
pub fn euclidean(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Euclidean distance with each squared axis difference scaled by a weight.
///
/// A small `wx` favours neighbours on the same row; a large `wx` favours
/// neighbours in the same column.
#[inline]
pub fn weighted_euclidean(a: Point, b: Point, wx: f64, wy: f64) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (wx * dx).mul_add(dx, wy * dy * dy).sqrt()
}

/// Signed horizontal distance from `a` to `b`.
#[inline]
pub fn horizontal(a: Point, b: Point) -> f64 {
    b.x - a.x
}

/// Signed vertical distance from `a` to `b`.
#[inline]
pub fn vertical(a: Point, b: Point) -> f64 {
    b.y - a.y
}

/// Angle in degrees of the vector from `a` to `b`, in (-180, 180].
#[inline]
pub fn angle(a: Point, b: Point) -> f64 {
    (b.y - a.y).atan2(b.x - a.x).to_degrees()
}

/// Per-axis gap from a point to a box (zero inside the box).
#[inline]
fn point_bbox_gap(p: Point, bounds: &BoundingBox) -> (f64, f64) {
    let gx = (bounds.left - p.x).max(p.x - bounds.right).max(0.0);
    let gy = (bounds.bottom - p.y).max(p.y - bounds.top).max(0.0);
    (gx, gy)
}

/// Distance between two horizontal-ish segments measured across their
/// shared horizontal span.
///
/// Returns `f64::INFINITY` when the x extents do not overlap. Otherwise both
/// segments are evaluated at the midpoint x of the overlapping span and the
/// Euclidean distance between those two points is returned.
pub fn overlap_midpoint_distance(a: &LineSegment, b: &LineSegment) -> f64 {
    let lo = a.min_x().max(b.min_x());
    let hi = a.max_x().min(b.max_x());
    if lo > hi {
        return f64::INFINITY;
    }
    let mid = (lo + hi) / 2.0;
    euclidean(Point::new(mid, a.y_at(mid)), Point::new(mid, b.y_at(mid)))
}

/// Plain Euclidean metric over points.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl Metric<Point> for Euclidean {
    fn distance(&self, a: &Point, b: &Point) -> f64 {
        euclidean(*a, *b)
    }

    fn lower_bound(&self, query: &Point, bounds: &BoundingBox) -> f64 {
        let (gx, gy) = point_bbox_gap(*query, bounds);
        gx.hypot(gy)
    }
}

/// Axis-weighted Euclidean metric over points.
#[derive(Debug, Clone, Copy)]
pub struct WeightedEuclidean {
    pub wx: f64,
    pub wy: f64,
}

impl WeightedEuclidean {
    pub const fn new(wx: f64, wy: f64) -> Self {
        Self { wx, wy }
    }
}

impl Metric<Point> for WeightedEuclidean {
    fn distance(&self, a: &Point, b: &Point) -> f64 {
        weighted_euclidean(*a, *b, self.wx, self.wy)
    }

    fn lower_bound(&self, query: &Point, bounds: &BoundingBox) -> f64 {
        let (gx, gy) = point_bbox_gap(*query, bounds);
        (self.wx * gx).mul_add(gx, self.wy * gy * gy).sqrt()
    }
}

/// [`overlap_midpoint_distance`] as a metric over segments.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlapMidpoint;

impl Metric<LineSegment> for OverlapMidpoint {
    fn distance(&self, a: &LineSegment, b: &LineSegment) -> f64 {
        overlap_midpoint_distance(a, b)
    }

    fn lower_bound(&self, query: &LineSegment, bounds: &BoundingBox) -> f64 {
        // Nothing inside can overlap horizontally.
        if query.min_x() > bounds.right || query.max_x() < bounds.left {
            return f64::INFINITY;
        }
        let q = query.bbox();
        (bounds.bottom - q.top).max(q.bottom - bounds.top).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{EPSILON, approx_eq};

    #[test]
    fn signed_distances() {
        let a = Point::new(1.0, 5.0);
        let b = Point::new(4.0, 1.0);
        assert_eq!(horizontal(a, b), 3.0);
        assert_eq!(horizontal(b, a), -3.0);
        assert_eq!(vertical(a, b), -4.0);
        assert_eq!(euclidean(a, b), 5.0);
    }

    #[test]
    fn angles_cover_full_circle() {
        let o = Point::new(0.0, 0.0);
        assert!(approx_eq(angle(o, Point::new(1.0, 0.0)), 0.0, EPSILON));
        assert!(approx_eq(angle(o, Point::new(0.0, 1.0)), 90.0, EPSILON));
        assert!(approx_eq(angle(o, Point::new(0.0, -1.0)), -90.0, EPSILON));
        assert!(approx_eq(angle(o, Point::new(-1.0, 0.0)), 180.0, EPSILON));
        assert!(approx_eq(angle(o, Point::new(1.0, -1.0)), -45.0, EPSILON));
    }

    #[test]
    fn weighting_biases_axis() {
        let a = Point::new(0.0, 0.0);
        let same_row = Point::new(10.0, 0.0);
        let same_column = Point::new(0.0, 10.0);
        let row_bias = WeightedEuclidean::new(0.5, 1.0);
        assert!(row_bias.distance(&a, &same_row) < row_bias.distance(&a, &same_column));
        let column_bias = WeightedEuclidean::new(50.0, 1.0);
        assert!(column_bias.distance(&a, &same_column) < column_bias.distance(&a, &same_row));
        assert!(approx_eq(weighted_euclidean(a, same_row, 1.0, 1.0), 10.0, EPSILON));
    }

    #[test]
    fn lower_bounds_never_exceed_distance() {
        let bounds = BoundingBox::new(2.0, 2.0, 4.0, 6.0);
        let query = Point::new(-1.0, 0.0);
        let inside = [
            Point::new(2.0, 2.0),
            Point::new(4.0, 6.0),
            Point::new(3.0, 3.5),
        ];
        let metric = WeightedEuclidean::new(50.0, 1.0);
        for p in inside {
            assert!(Euclidean.lower_bound(&query, &bounds) <= Euclidean.distance(&query, &p));
            assert!(metric.lower_bound(&query, &bounds) <= metric.distance(&query, &p));
        }
        assert_eq!(Euclidean.lower_bound(&Point::new(3.0, 3.0), &bounds), 0.0);
    }

    #[test]
    fn overlap_distance_requires_horizontal_overlap() {
        let upper = LineSegment::new(Point::new(0.0, 10.0), Point::new(10.0, 10.0));
        let below = LineSegment::new(Point::new(5.0, 7.0), Point::new(20.0, 7.0));
        let aside = LineSegment::new(Point::new(11.0, 7.0), Point::new(20.0, 7.0));
        assert!(approx_eq(overlap_midpoint_distance(&upper, &below), 3.0, EPSILON));
        assert_eq!(overlap_midpoint_distance(&upper, &aside), f64::INFINITY);
        assert_eq!(
            OverlapMidpoint.lower_bound(&upper, &aside.bbox()),
            f64::INFINITY
        );
        assert!(OverlapMidpoint.lower_bound(&upper, &below.bbox()) <= 3.0);
    }
}
