use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::animation::motion::{FrameMotion, MotionScript, frame_count, normalized_time};
use crate::foundation::core::{Affine, Canvas, Fps, FrameIndex, Point};
use crate::foundation::error::StickerResult;
use crate::layout::compositor::{LayoutFrame, LayoutTrace};
use crate::lifecycle::artifacts::{ArtifactDir, FrameFiles, JobId, check_deadline, frame_pad_width};
use crate::render::canvas::{FrameRGBA, Painter};
use crate::render::still::Scene;

/// Horizontal padding of the animated text block, before scaling.
pub const ANIMATED_PADDING_PX: f64 = 28.0;
/// Vertical nudge of the text line in scaled space.
const TEXT_NUDGE_PX: f64 = -8.0;

/// Numbered frame files of one job, in index order.
///
/// Owns the files: dropping the sequence deletes every one of them, whether or not an encoder
/// ever consumed it.
#[derive(Debug)]
pub struct FrameSequence {
    job: JobId,
    pattern: PathBuf,
    fps: Fps,
    canvas: Canvas,
    files: FrameFiles,
}

impl FrameSequence {
    /// Job the frames belong to.
    pub fn job(&self) -> JobId {
        self.job
    }

    /// printf-style path pattern matching every frame file.
    pub fn pattern(&self) -> &Path {
        &self.pattern
    }

    /// Playback rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Frame dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Frame paths in index order.
    pub fn paths(&self) -> &[PathBuf] {
        self.files.paths()
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Return `true` when the sequence has no frames.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Rasterize one animated frame.
///
/// The breathing scale applies to the text pass only; the backdrop is drawn untransformed.
pub(crate) fn render_animated_frame(
    scene: &Scene<'_>,
    text: &str,
    motion: FrameMotion,
) -> StickerResult<(FrameRGBA, LayoutTrace)> {
    let mut painter = Painter::new(scene.canvas)?;
    scene.paint_backdrop(&mut painter, motion.overlay_opacity);

    let w = f64::from(scene.canvas.width);
    let s = motion.scale;
    painter.set_base_transform(Affine::scale(s));
    let frame = LayoutFrame {
        origin: Point::new(ANIMATED_PADDING_PX / s, motion.text_y / s + TEXT_NUDGE_PX),
        max_width: (w - 2.0 * ANIMATED_PADDING_PX) / s,
    };
    let trace = scene.compositor().draw(&mut painter, text, frame)?;
    painter.reset_base_transform();

    Ok((painter.finish(), trace))
}

/// Render and write every frame of an animated job, strictly in index order.
///
/// On any error the frames written so far are deleted before it surfaces.
pub(crate) fn synthesize_frames(
    scene: &Scene<'_>,
    text: &str,
    artifacts: &ArtifactDir,
    job: JobId,
    duration_secs: f64,
    fps: Fps,
    deadline: Option<Instant>,
) -> StickerResult<FrameSequence> {
    let count = frame_count(duration_secs, fps);
    let pad = frame_pad_width(count);
    let motion = MotionScript::for_canvas(scene.canvas.width);
    tracing::debug!(%job, count, fps = fps.as_f64(), "synthesizing frames");

    let mut files = FrameFiles::new();
    for i in 0..count {
        check_deadline(deadline, "frame synthesis")?;
        let t = normalized_time(FrameIndex(i), count);
        let (frame, _) = render_animated_frame(scene, text, motion.sample(t))?;
        let path = artifacts.frame_path(&job, i, pad);
        files.track(path.clone());
        frame.write_png(&path)?;
    }

    Ok(FrameSequence {
        job,
        pattern: artifacts.frame_pattern(&job, pad),
        fps,
        canvas: scene.canvas,
        files,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/frames.rs"]
mod tests;
