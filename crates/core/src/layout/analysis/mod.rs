//! Layout Analysis Module - segmentation algorithms
//!
//! Contains the layout analysis algorithms for:
//! - Nearest-neighbour spatial indexing
//! - Estimating page spacing from neighbour distances
//! - Bounded nearest-neighbour clustering
//! - Docstrum segmentation of words into lines and blocks

mod clustering;
mod docstrum;
mod histogram;
pub mod spatial;

// Re-export public types and functions
pub use clustering::{ClusteringStrategy, cluster_nearest_neighbours};
pub use docstrum::{
    SpacingEstimate, estimate_spacing, get_blocks, get_lines, get_structural_blocks,
    merge_intersecting_blocks,
};
pub use histogram::histogram_mode;
