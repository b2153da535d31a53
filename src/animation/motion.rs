use std::f64::consts::TAU;

use crate::animation::ease::Ease;
use crate::foundation::core::{Fps, FrameIndex};

/// Number of frames for a clip: `max(1, floor(duration * fps))`.
pub fn frame_count(duration_secs: f64, fps: Fps) -> u64 {
    fps.secs_to_frames_floor(duration_secs).max(1)
}

/// Normalized time of frame `idx` out of `count`: `i / max(1, count - 1)`, so a single frame is
/// at `t = 0` and the last frame of a longer clip is at `t = 1`.
pub fn normalized_time(idx: FrameIndex, count: u64) -> f64 {
    let denom = count.saturating_sub(1).max(1);
    (idx.0 as f64 / denom as f64).clamp(0.0, 1.0)
}

/// The one scripted sticker motion: pulsing overlay band, text rising from below the canvas and
/// settling near the bottom, and a slight breathing scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionScript {
    /// Overlay opacity at rest.
    pub overlay_base: f64,
    /// Overlay pulse amplitude.
    pub overlay_amplitude: f64,
    /// Text line center at `t = 0`.
    pub start_y: f64,
    /// Text line center at `t = 1`.
    pub end_y: f64,
    /// Breathing scale amplitude.
    pub scale_amplitude: f64,
    /// Curve for the rise.
    pub rise: Ease,
}

impl MotionScript {
    /// Motion for a square canvas of `size` pixels.
    pub fn for_canvas(size: u32) -> Self {
        let size = f64::from(size);
        Self {
            overlay_base: 0.25,
            overlay_amplitude: 0.15,
            start_y: size + 80.0,
            end_y: size - 80.0,
            scale_amplitude: 0.02,
            rise: Ease::OutCubic,
        }
    }

    /// Motion parameters at normalized time `t`.
    pub fn sample(&self, t: f64) -> FrameMotion {
        let t = t.clamp(0.0, 1.0);
        let wave = (TAU * t).sin();
        FrameMotion {
            t,
            overlay_opacity: (self.overlay_base + self.overlay_amplitude * wave).clamp(0.0, 1.0),
            text_y: self.rise.lerp(self.start_y, self.end_y, t),
            scale: 1.0 + self.scale_amplitude * wave,
        }
    }
}

/// Motion parameters for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameMotion {
    /// Normalized time.
    pub t: f64,
    /// Overlay band opacity.
    pub overlay_opacity: f64,
    /// Text line center before scaling.
    pub text_y: f64,
    /// Uniform scale applied to the text pass.
    pub scale: f64,
}

#[cfg(test)]
#[path = "../../tests/unit/animation/motion.rs"]
mod tests;
