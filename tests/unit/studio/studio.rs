use std::path::Path;

use super::*;
use crate::assets::background::BackgroundKind;
use crate::foundation::error::StickerError;
use crate::glyph::provider::{GlyphImage, GlyphKey};
use crate::render::frames::FrameSequence;

struct Offline;

impl GlyphProvider for Offline {
    fn fetch(&self, key: &GlyphKey) -> StickerResult<GlyphImage> {
        Err(StickerError::fetch(format!("offline: {key}")))
    }
}

struct NoEncoder;

impl Encoder for NoEncoder {
    fn encode_frames(&self, _: &FrameSequence, _: &Path, _: Option<Instant>) -> StickerResult<()> {
        Err(StickerError::encode("disabled"))
    }

    fn encode_sticker(
        &self,
        _: &Path,
        _: &Path,
        _: &StickerEncodeOpts,
        _: Option<Instant>,
    ) -> StickerResult<()> {
        Err(StickerError::encode("disabled"))
    }
}

fn studio(cfg: StudioConfig) -> StickerResult<Studio> {
    Studio::with_parts(cfg, Box::new(Offline), Box::new(NoEncoder))
}

#[test]
fn studio_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Studio>();
}

#[test]
fn timeout_sets_future_deadline() {
    let before = Instant::now();
    let opts = JobOptions::default().with_timeout(Duration::from_secs(5));
    assert!(opts.deadline.unwrap() > before);
    assert_eq!(opts.duration_secs, None);
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let cfg = StudioConfig {
        canvas_size: 0,
        ..StudioConfig::default()
    };
    assert!(matches!(studio(cfg), Err(StickerError::Validation(_))));

    let cfg = StudioConfig {
        font_path: Some(PathBuf::from("target/unit_studio/missing.ttf")),
        ..StudioConfig::default()
    };
    assert!(studio(cfg).is_err());
}

#[test]
fn render_still_stays_in_memory() {
    let out_dir = PathBuf::from("target").join("unit_studio").join("in_memory");
    let _ = std::fs::remove_dir_all(&out_dir);
    let cfg = StudioConfig {
        out_dir: out_dir.clone(),
        canvas_size: 128,
        ..StudioConfig::default()
    };
    let s = studio(cfg).unwrap();
    let (frame, trace) = s.render_still("ok").unwrap();
    assert_eq!((frame.width, frame.height), (128, 128));
    assert!(!trace.units.is_empty());
    assert!(!out_dir.exists());
}

#[test]
fn bad_job_options_fail_before_any_file_is_written() {
    let out_dir = PathBuf::from("target").join("unit_studio").join("bad_opts");
    let _ = std::fs::remove_dir_all(&out_dir);
    let cfg = StudioConfig {
        out_dir: out_dir.clone(),
        canvas_size: 64,
        ..StudioConfig::default()
    };
    let s = studio(cfg).unwrap();

    let opts = JobOptions {
        duration_secs: Some(f64::NAN),
        ..JobOptions::default()
    };
    assert!(matches!(s.video("x", opts), Err(StickerError::Validation(_))));

    let opts = JobOptions {
        fps: Some(0),
        ..JobOptions::default()
    };
    assert!(matches!(s.video("x", opts), Err(StickerError::Validation(_))));
    assert!(!out_dir.exists());
}

#[test]
fn empty_pool_gradient_depends_on_job_kind() {
    let cfg = StudioConfig {
        canvas_size: 32,
        ..StudioConfig::default()
    };
    let s = studio(cfg).unwrap();
    assert_eq!(
        s.still_background().unwrap().kind(),
        &BackgroundKind::Gradient(Gradient::POOL_EMPTY)
    );
    assert_eq!(
        s.animated_background().unwrap().kind(),
        &BackgroundKind::Gradient(Gradient::LOAD_FAILURE)
    );
}
