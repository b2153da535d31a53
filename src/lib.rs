//! stickerforge renders chat stickers from text with inline emoji.
//!
//! Text is split into grapheme clusters; textual ones are shaped with a bundled bold font and
//! pictographic ones are drawn from remotely fetched bitmaps. Three call paths, each one render
//! job returning one artifact path:
//!
//! - [`Studio::image_sticker`]: a still PNG
//! - [`Studio::video`]: a short MP4 with the text rising into place
//! - [`Studio::animated_sticker`]: the same clip re-encoded to a looping WebP
//!
//! Intermediate frame files and videos are removed on every exit path, including errors and
//! deadline cancellation.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Timing curves and the scripted sticker motion.
pub mod animation;
/// Raster inputs: decoded images and per-job backgrounds.
pub mod assets;
/// Studio configuration.
pub mod config;
/// Video encoding of frame sequences.
pub mod encode;
/// Bitmap glyphs for pictographic graphemes.
pub mod glyph;
/// Mixed text/glyph line layout.
pub mod layout;
/// Output directory, job naming, and cleanup of intermediate files.
pub mod lifecycle;
/// Frame rasterization.
pub mod render;
/// The render-job façade.
pub mod studio;
/// Text decomposition and shaping.
pub mod text;

pub use crate::foundation::core::{Affine, Canvas, Fps, FrameIndex, Point, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{StickerError, StickerResult};

pub use crate::assets::background::{
    Background, BackgroundKind, BackgroundPool, Gradient, scan_background_dir,
};
pub use crate::config::{StickerQuality, StudioConfig, VideoDefaults};
pub use crate::encode::encoder::{Encoder, StickerEncodeOpts};
pub use crate::encode::ffmpeg::{FfmpegEncoder, is_ffmpeg_on_path};
pub use crate::glyph::cache::CachedGlyphProvider;
pub use crate::glyph::provider::{GlyphImage, GlyphKey, GlyphProvider, RemoteGlyphProvider};
pub use crate::layout::compositor::{LayoutTrace, PlacedUnit, UnitKind};
pub use crate::lifecycle::artifacts::{ArtifactDir, JobId};
pub use crate::render::canvas::FrameRGBA;
pub use crate::render::frames::FrameSequence;
pub use crate::studio::{JobOptions, Studio};
