//! Layout analysis module for page segmentation.
//!
//! This module contains:
//! - Layout types (Word, TextLine, TextBlock)
//! - Segmentation parameters (DocstrumParams)
//! - Spatial indexing and clustering algorithms

pub mod analysis;
pub mod params;
pub mod types;

// Re-export params
pub use params::*;

// Re-export layout types
pub use types::*;

// Re-export analysis types and functions
pub use analysis::*;
