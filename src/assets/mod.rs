//! Raster inputs: decoded images and per-job backgrounds.

/// Per-job background selection with gradient fallback.
pub mod background;
/// Encoded image bytes to premultiplied RGBA8.
pub mod decode;
