use std::sync::LazyLock;

use regex::Regex;

/// How a grapheme is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GlyphKind {
    /// Drawn with the font (measured via font metrics).
    Textual,
    /// Drawn as a fetched bitmap.
    Pictographic,
}

// Regional indicators are not Extended_Pictographic but a pair forms a flag, which no text font
// carries.
static PICTOGRAPHIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{Extended_Pictographic}\p{Regional_Indicator}]")
        .expect("PICTOGRAPHIC regex pattern is valid")
});

/// Return `true` when any scalar of `grapheme` carries a pictographic property.
pub fn is_pictographic(grapheme: &str) -> bool {
    PICTOGRAPHIC.is_match(grapheme)
}

/// Classify one grapheme.
pub fn classify(grapheme: &str) -> GlyphKind {
    if is_pictographic(grapheme) {
        GlyphKind::Pictographic
    } else {
        GlyphKind::Textual
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/classify.rs"]
mod tests;
