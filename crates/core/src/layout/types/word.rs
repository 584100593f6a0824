//! Word type: the unit of input to page segmentation.

use serde::{Deserialize, Serialize};

use crate::utils::{BoundingBox, HasBBox};

/// Reading direction of a word, in quarter turns counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextOrientation {
    /// Upright text read left to right.
    #[default]
    Normal,
    /// Text rotated 90 degrees counter-clockwise (read bottom to top).
    Rotate90,
    /// Upside-down text (read right to left).
    Rotate180,
    /// Text rotated 270 degrees counter-clockwise (read top to bottom).
    Rotate270,
}

/// A recognised word with its position on the page.
///
/// Words are produced by an upstream text pipeline and never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub bbox: BoundingBox,
    #[serde(default)]
    pub orientation: TextOrientation,
}

impl Word {
    pub fn new(text: impl Into<String>, bbox: BoundingBox, orientation: TextOrientation) -> Self {
        Self {
            text: text.into(),
            bbox,
            orientation,
        }
    }

    /// Upright word, the common case.
    pub fn horizontal(text: impl Into<String>, bbox: BoundingBox) -> Self {
        Self::new(text, bbox, TextOrientation::Normal)
    }

    /// True when the text is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl HasBBox for Word {
    fn bbox(&self) -> BoundingBox {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_detection() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        assert!(Word::horizontal("", bbox).is_blank());
        assert!(Word::horizontal(" \t\n", bbox).is_blank());
        assert!(!Word::horizontal(" a ", bbox).is_blank());
    }

    #[test]
    fn orientation_defaults_to_normal_when_absent() {
        let json = r#"{"text":"x","bbox":{"left":0,"bottom":0,"right":1,"top":1}}"#;
        let word: Word = serde_json::from_str(json).unwrap();
        assert_eq!(word.orientation, TextOrientation::Normal);

        let json = r#"{"text":"x","bbox":{"left":0,"bottom":0,"right":1,"top":1},"orientation":"rotate90"}"#;
        let word: Word = serde_json::from_str(json).unwrap();
        assert_eq!(word.orientation, TextOrientation::Rotate90);
    }
}
