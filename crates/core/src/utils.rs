//! Geometric primitives shared by the layout analysis code.
//!
//! Provides:
//! - `Point` - a position on the page
//! - `BoundingBox` - an axis-aligned rectangle with named corners
//! - `LineSegment` - a straight segment between two points
//! - `HasBBox` - trait for anything carrying a bounding box
//!
//! Page coordinates follow PDF user space: y grows upwards, so `bottom < top`.

use serde::{Deserialize, Serialize};

/// Small epsilon for floating-point comparisons.
pub const EPSILON: f64 = 1e-9;

/// Compares two floats for approximate equality.
#[inline]
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// A 2D point (x, y).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle.
///
/// Stored as its four edges; corner accessors are derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl BoundingBox {
    pub const fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    /// Degenerate box covering a single point.
    pub const fn from_point(p: Point) -> Self {
        Self::new(p.x, p.y, p.x, p.y)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    pub const fn bottom_left(&self) -> Point {
        Point::new(self.left, self.bottom)
    }

    pub const fn bottom_right(&self) -> Point {
        Point::new(self.right, self.bottom)
    }

    pub const fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub const fn top_right(&self) -> Point {
        Point::new(self.right, self.top)
    }

    pub fn centroid(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.bottom + self.top) / 2.0,
        )
    }

    /// Smallest box containing both boxes.
    pub const fn union(&self, other: &Self) -> Self {
        Self::new(
            self.left.min(other.left),
            self.bottom.min(other.bottom),
            self.right.max(other.right),
            self.top.max(other.top),
        )
    }

    /// Closed intersection test: boxes sharing only an edge or a corner intersect.
    pub fn intersects_with(&self, other: &Self) -> bool {
        !(self.left > other.right
            || other.left > self.right
            || self.top < other.bottom
            || other.top < self.bottom)
    }

    /// Union of a sequence of boxes, `None` when empty.
    pub fn union_all<I>(boxes: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        boxes.into_iter().reduce(|a, b| a.union(&b))
    }
}

/// A straight segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Point,
    pub end: Point,
}

impl LineSegment {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub const fn min_x(&self) -> f64 {
        self.start.x.min(self.end.x)
    }

    pub const fn max_x(&self) -> f64 {
        self.start.x.max(self.end.x)
    }

    /// Y coordinate of the segment's supporting line at `x`.
    ///
    /// Vertical segments return the midpoint y.
    pub fn y_at(&self, x: f64) -> f64 {
        let dx = self.end.x - self.start.x;
        if dx.abs() < EPSILON {
            return (self.start.y + self.end.y) / 2.0;
        }
        let t = (x - self.start.x) / dx;
        (self.end.y - self.start.y).mul_add(t, self.start.y)
    }

    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(
            self.min_x(),
            self.start.y.min(self.end.y),
            self.max_x(),
            self.start.y.max(self.end.y),
        )
    }
}

/// Trait for objects that have a bounding box.
pub trait HasBBox {
    fn bbox(&self) -> BoundingBox;

    fn width(&self) -> f64 {
        self.bbox().width()
    }

    fn height(&self) -> f64 {
        self.bbox().height()
    }
}

impl HasBBox for BoundingBox {
    fn bbox(&self) -> BoundingBox {
        *self
    }
}
