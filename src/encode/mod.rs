//! Video encoding of frame sequences.
//!
//! The [`encoder::Encoder`] capability consumes a finished [`crate::render::frames::FrameSequence`];
//! the only built-in implementation drives the system `ffmpeg`.

/// Encoder capability and sticker re-encode options.
pub mod encoder;
/// External-process encoder over the system `ffmpeg`.
pub mod ffmpeg;
