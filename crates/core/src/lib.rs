//! docstrum - geometric page segmentation of positioned words.
//!
//! Fixed-layout documents store positioned glyphs, not paragraphs. This crate
//! rebuilds line and paragraph structure from word bounding boxes alone using
//! the Docstrum (document spectrum) method.
//!
//! ```
//! use docstrum_core::layout::{DocstrumParams, Word, get_blocks};
//! use docstrum_core::utils::BoundingBox;
//!
//! let words = vec![
//!     Word::horizontal("Hello", BoundingBox::new(0.0, 0.0, 25.0, 10.0)),
//!     Word::horizontal("world", BoundingBox::new(28.0, 0.0, 53.0, 10.0)),
//! ];
//! let blocks = get_blocks(&words, &DocstrumParams::default())?;
//! assert_eq!(blocks.iter().map(|b| b.word_count()).sum::<usize>(), 2);
//! # Ok::<(), docstrum_core::error::LayoutError>(())
//! ```

pub mod error;
pub mod layout;
pub mod utils;

pub use error::{LayoutError, Result};
pub use layout::{DocstrumParams, TextBlock, TextLine, Word, get_blocks};
