//! Timing curves and the scripted sticker motion.

/// Easing curves over normalized progress.
pub mod ease;
/// Frame timing and the per-frame motion parameters.
pub mod motion;
