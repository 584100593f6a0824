//! Spatial indexing for nearest-neighbour search.
//!
//! - `types` - Anchors stored in the index and query results
//! - `distance` - Distance/angle functions and pruning-aware metrics
//! - `tree` - Immutable arena-backed spatial tree

mod distance;
mod tree;
mod types;

pub use distance::{
    Euclidean, Metric, OverlapMidpoint, WeightedEuclidean, angle, euclidean, horizontal,
    overlap_midpoint_distance, vertical, weighted_euclidean,
};
pub use tree::{SpatialIndex, SpatialNode};
pub use types::{Anchor, Neighbor};
