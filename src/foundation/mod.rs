//! Shared value types, the crate error, and 8-bit blend helpers.

/// Canvas, frame-rate, color, and geometry types.
pub mod core;
/// [`error::StickerError`] and [`error::StickerResult`].
pub mod error;
pub(crate) mod math;
