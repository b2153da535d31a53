use super::*;

#[test]
fn ascii_letters_digits_and_punctuation_are_textual() {
    for g in ["a", "Z", "0", "9", "!", "?", ".", "#", "*", "~"] {
        assert_eq!(classify(g), GlyphKind::Textual, "{g}");
    }
}

#[test]
fn emoji_are_pictographic() {
    for g in ["😀", "❤️", "👍🏽", "👨‍👩‍👧", "🦀", "🇮🇳"] {
        assert_eq!(classify(g), GlyphKind::Pictographic, "{g}");
    }
}

#[test]
fn accented_and_non_latin_letters_are_textual() {
    for g in ["é", "ß", "ж", "ह", "日"] {
        assert!(!is_pictographic(g), "{g}");
    }
}
