use std::path::Path;
use std::time::Instant;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::StickerResult;
use crate::render::frames::FrameSequence;

/// Options for re-encoding a video into a loopable sticker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StickerEncodeOpts {
    /// Square bounding box the video is scaled and padded into.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Lossy quality budget, `0..=100` (lower is smaller).
    pub quality: u8,
    /// Output is clipped to this many seconds.
    pub max_duration_secs: f64,
}

/// Turns frame sequences into videos, and videos into stickers.
///
/// Implementations must not delete the input frames; the [`FrameSequence`] owns them. On failure
/// the output path must not be left behind.
pub trait Encoder: Send + Sync {
    /// Encode `frames` into one playable video at `out`.
    fn encode_frames(
        &self,
        frames: &FrameSequence,
        out: &Path,
        deadline: Option<Instant>,
    ) -> StickerResult<()>;

    /// Re-encode `video` into a looping sticker at `out`.
    fn encode_sticker(
        &self,
        video: &Path,
        out: &Path,
        opts: &StickerEncodeOpts,
        deadline: Option<Instant>,
    ) -> StickerResult<()>;
}
