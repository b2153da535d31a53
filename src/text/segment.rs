use unicode_segmentation::UnicodeSegmentation;

use crate::text::classify::{GlyphKind, classify};

/// One user-perceived character of a token, tagged with how it renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grapheme<'a> {
    /// Source substring (one extended grapheme cluster).
    pub text: &'a str,
    /// Render classification.
    pub kind: GlyphKind,
}

/// Split text into tokens on single ASCII spaces.
///
/// Consecutive spaces yield empty tokens; each still contributes one space advance.
pub fn tokens(text: &str) -> std::str::Split<'_, char> {
    text.split(' ')
}

/// Extended grapheme clusters of `token`, in source order.
pub fn graphemes(token: &str) -> impl Iterator<Item = &str> {
    token.graphemes(true)
}

/// Extended grapheme clusters of `token` with their classification.
pub fn classified(token: &str) -> impl Iterator<Item = Grapheme<'_>> {
    graphemes(token).map(|text| Grapheme {
        text,
        kind: classify(text),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/text/segment.rs"]
mod tests;
