//! Text decomposition: tokens, graphemes, and their render classification.

/// Pictographic vs. textual classification.
pub mod classify;
/// Font loading, shaping, and metrics.
pub mod font;
/// Token and grapheme segmentation.
pub mod segment;
