//! Bitmap glyphs for pictographic graphemes.

/// Optional in-memory LRU decorator.
pub mod cache;
/// Glyph keys, the provider capability, and the remote provider.
pub mod provider;
