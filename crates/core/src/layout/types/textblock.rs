//! Text block type: an ordered stack of text lines.

use itertools::Itertools;
use serde::Serialize;

use crate::utils::{BoundingBox, HasBBox};

use super::textline::TextLine;
use super::word::Word;

/// Separator placed between lines by [`TextBlock::text`].
pub const LINE_SEPARATOR: &str = "\n";

/// A non-empty, ordered sequence of text lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    bbox: BoundingBox,
    lines: Vec<TextLine>,
}

impl TextBlock {
    /// Builds a block keeping the given line order. Returns `None` for no lines.
    pub fn new(lines: Vec<TextLine>) -> Option<Self> {
        let bbox = BoundingBox::union_all(lines.iter().map(HasBBox::bbox))?;
        Some(Self { bbox, lines })
    }

    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    /// Appends `other`'s lines after this block's.
    pub fn merged(mut self, other: TextBlock) -> Self {
        self.bbox = self.bbox.union(&other.bbox);
        self.lines.extend(other.lines);
        self
    }

    /// All words of the block in line order.
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.lines.iter().flat_map(|l| l.words().iter())
    }

    pub fn word_count(&self) -> usize {
        self.lines.iter().map(TextLine::len).sum()
    }

    /// Line texts joined by [`LINE_SEPARATOR`].
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(TextLine::text)
            .join(LINE_SEPARATOR)
    }
}

impl HasBBox for TextBlock {
    fn bbox(&self) -> BoundingBox {
        self.bbox
    }
}
