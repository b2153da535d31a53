//! Mixed text/glyph line layout.

/// Cursor-driven layout and compositing of text with inline glyph bitmaps.
pub mod compositor;
