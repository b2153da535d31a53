//! Frame rasterization: the drawing surface and the two synthesis paths.

/// Drawing surface over `vello_cpu` and the rendered frame type.
pub mod canvas;
/// Numbered frame sequences for the animated path.
pub mod frames;
/// Single-frame still sticker.
pub mod still;
