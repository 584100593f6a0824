//! Layout types: words, text lines and text blocks.

mod textblock;
mod textline;
mod word;

pub use textblock::{LINE_SEPARATOR, TextBlock};
pub use textline::{TextLine, WORD_SEPARATOR};
pub use word::{TextOrientation, Word};
