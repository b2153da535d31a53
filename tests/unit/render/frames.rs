use std::path::PathBuf;

use parking_lot::Mutex;

use super::*;
use crate::assets::background::{Background, Gradient};
use crate::foundation::core::Rgba8;
use crate::foundation::error::StickerError;
use crate::glyph::provider::{GlyphImage, GlyphKey, GlyphProvider};
use crate::layout::compositor::TextStyle;
use crate::text::font::FontEngine;

struct Offline;

impl GlyphProvider for Offline {
    fn fetch(&self, key: &GlyphKey) -> StickerResult<GlyphImage> {
        Err(StickerError::fetch(format!("offline: {key}")))
    }
}

fn style() -> TextStyle {
    TextStyle {
        font_size_px: 40.0,
        line_height: 48.0,
        color: Rgba8::WHITE,
    }
}

fn with_scene<R>(size: u32, f: impl FnOnce(&mut Scene<'_>) -> R) -> R {
    let canvas = Canvas::square(size);
    let bg = Background::from_gradient(Gradient::LOAD_FAILURE, canvas).unwrap();
    let fonts = Mutex::new(FontEngine::bundled().unwrap());
    let mut scene = Scene {
        canvas,
        background: &bg,
        fonts: &fonts,
        glyphs: &Offline,
        glyph_separator: "-",
        style: style(),
    };
    f(&mut scene)
}

fn scratch(name: &str) -> ArtifactDir {
    let dir = PathBuf::from("target").join("unit_frames").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    let dir = ArtifactDir::new(dir);
    dir.ensure().unwrap();
    dir
}

#[test]
fn first_frame_starts_below_canvas() {
    let motion = MotionScript::for_canvas(512).sample(0.0);
    let (_, trace) = with_scene(512, |s| render_animated_frame(s, "hey", motion).unwrap());
    let first = trace.units[0];
    assert_eq!(first.x, ANIMATED_PADDING_PX);
    assert_eq!(first.y, 592.0 - 8.0);
}

#[test]
fn layout_runs_in_scaled_space() {
    let motion = MotionScript::for_canvas(512).sample(0.25);
    let (_, trace) = with_scene(512, |s| render_animated_frame(s, "hey", motion).unwrap());
    let first = trace.units[0];
    assert!((first.x - ANIMATED_PADDING_PX / 1.02).abs() < 1e-9);
    assert!((first.y - (motion.text_y / 1.02 - 8.0)).abs() < 1e-9);
}

#[test]
fn sequence_writes_numbered_frames_and_cleans_up_on_drop() {
    let dir = scratch("sequence");
    let job = JobId::new();
    let fps = Fps::whole(5).unwrap();

    let seq = with_scene(64, |s| {
        synthesize_frames(s, "ab", &dir, job, 1.0, fps, None).unwrap()
    });
    assert_eq!(seq.len(), 5);
    assert_eq!(seq.job(), job);
    assert_eq!(seq.fps(), fps);
    assert_eq!(seq.canvas(), Canvas::square(64));
    assert_eq!(seq.pattern(), dir.frame_pattern(&job, 3).as_path());
    assert_eq!(seq.paths()[4], dir.frame_path(&job, 4, 3));
    assert_eq!(dir.files_for(&job).unwrap().len(), 5);

    let png = image::open(&seq.paths()[0]).unwrap();
    assert_eq!((png.width(), png.height()), (64, 64));

    drop(seq);
    assert!(dir.files_for(&job).unwrap().is_empty());
}

#[test]
fn tiny_duration_still_yields_one_frame() {
    let dir = scratch("tiny");
    let job = JobId::new();
    let seq = with_scene(32, |s| {
        synthesize_frames(s, "x", &dir, job, 0.01, Fps::whole(1).unwrap(), None).unwrap()
    });
    assert_eq!(seq.len(), 1);
}

#[test]
fn expired_deadline_cancels_without_leaving_frames() {
    let dir = scratch("deadline");
    let job = JobId::new();
    let past = Instant::now();
    let err = with_scene(32, |s| {
        synthesize_frames(s, "x", &dir, job, 1.0, Fps::whole(10).unwrap(), Some(past)).unwrap_err()
    });
    assert!(matches!(err, StickerError::Cancelled(_)));
    assert!(dir.files_for(&job).unwrap().is_empty());
}
