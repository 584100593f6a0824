//! Text line type: an ordered run of words.

use std::cmp::Ordering;

use itertools::Itertools;
use serde::Serialize;

use crate::utils::{BoundingBox, HasBBox};

use super::word::{TextOrientation, Word};

/// Separator placed between words by [`TextLine::text`].
pub const WORD_SEPARATOR: &str = " ";

/// A non-empty, ordered sequence of words.
///
/// The bounding box is the union of the member boxes and is computed once at
/// construction; lines are never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLine {
    bbox: BoundingBox,
    words: Vec<Word>,
}

impl TextLine {
    /// Builds a line keeping the given word order. Returns `None` for no words.
    pub fn new(words: Vec<Word>) -> Option<Self> {
        let bbox = BoundingBox::union_all(words.iter().map(|w| w.bbox))?;
        Some(Self { bbox, words })
    }

    /// Builds a line with words sorted in reading order for its orientation.
    ///
    /// - Normal: ascending left edge
    /// - Rotate180: descending right edge
    /// - Rotate90: descending top edge
    /// - Rotate270: ascending bottom edge
    ///
    /// Mixed orientations fall back to the Normal order.
    pub fn in_reading_order(mut words: Vec<Word>) -> Option<Self> {
        let orientation = common_orientation(&words).unwrap_or_default();
        words.sort_by(|a, b| reading_order(orientation, &a.bbox, &b.bbox));
        Self::new(words)
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Orientation shared by every word, `None` when they disagree.
    pub fn orientation(&self) -> Option<TextOrientation> {
        common_orientation(&self.words)
    }

    /// Word texts joined by [`WORD_SEPARATOR`].
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .join(WORD_SEPARATOR)
    }
}

impl HasBBox for TextLine {
    fn bbox(&self) -> BoundingBox {
        self.bbox
    }
}

fn common_orientation(words: &[Word]) -> Option<TextOrientation> {
    let first = words.first()?.orientation;
    words
        .iter()
        .all(|w| w.orientation == first)
        .then_some(first)
}

fn reading_order(orientation: TextOrientation, a: &BoundingBox, b: &BoundingBox) -> Ordering {
    match orientation {
        TextOrientation::Normal => a.left.total_cmp(&b.left),
        TextOrientation::Rotate180 => b.right.total_cmp(&a.right),
        TextOrientation::Rotate90 => b.top.total_cmp(&a.top),
        TextOrientation::Rotate270 => a.bottom.total_cmp(&b.bottom),
    }
}
