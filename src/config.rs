use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::foundation::core::{Canvas, Fps, Rgba8};
use crate::foundation::error::{StickerError, StickerResult};
use crate::glyph::provider::CODEPOINTS_PLACEHOLDER;

/// Default glyph address: the 72x72 PNG Twemoji set.
pub const DEFAULT_GLYPH_URL_TEMPLATE: &str =
    "https://cdn.jsdelivr.net/gh/twitter/twemoji@14.0.2/assets/72x72/{codepoints}.png";

/// Default clip length and rate for animated jobs.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VideoDefaults {
    /// Clip length in seconds.
    pub duration_secs: f64,
    /// Frames per second.
    pub fps: u32,
}

impl Default for VideoDefaults {
    fn default() -> Self {
        Self {
            duration_secs: 3.0,
            fps: 15,
        }
    }
}

/// Quality budget for the looping sticker re-encode.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StickerQuality {
    /// Lossy quality, `0..=100`; lower gives smaller files.
    pub quality: u8,
    /// Stickers are clipped to this many seconds.
    pub max_duration_secs: f64,
}

impl Default for StickerQuality {
    fn default() -> Self {
        Self {
            quality: 50,
            max_duration_secs: 3.0,
        }
    }
}

/// Settings for a [`crate::Studio`].
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Directory every artifact and intermediate file is written to.
    pub out_dir: PathBuf,
    /// Edge length of the square canvas.
    pub canvas_size: u32,
    /// Background sources: local paths or `http(s)://` URLs.
    pub background_pool: Vec<String>,
    /// Font file for textual graphemes; `None` uses the bundled bold sans.
    pub font_path: Option<PathBuf>,
    /// Font size in pixels.
    pub font_size_px: f32,
    /// Distance between line centers.
    pub line_height_px: f64,
    /// Text and filler color, `#rrggbb` or `#rrggbbaa`.
    pub text_color: String,
    /// Glyph address with a `{codepoints}` placeholder.
    pub glyph_url_template: String,
    /// Separator between hex code points in a glyph key.
    pub glyph_separator: String,
    /// In-memory glyph cache entries; `0` fetches every glyph occurrence.
    pub glyph_cache_capacity: usize,
    /// Timeout for each glyph or background download.
    pub http_timeout_ms: u64,
    /// Animated job defaults.
    pub video: VideoDefaults,
    /// Sticker re-encode settings.
    pub sticker: StickerQuality,
    /// Encoder executable.
    pub ffmpeg_path: PathBuf,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("temp_stickers"),
            canvas_size: 512,
            background_pool: Vec::new(),
            font_path: None,
            font_size_px: 40.0,
            line_height_px: 48.0,
            text_color: "#ffffff".to_string(),
            glyph_url_template: DEFAULT_GLYPH_URL_TEMPLATE.to_string(),
            glyph_separator: "-".to_string(),
            glyph_cache_capacity: 0,
            http_timeout_ms: 10_000,
            video: VideoDefaults::default(),
            sticker: StickerQuality::default(),
            ffmpeg_path: PathBuf::from("ffmpeg"),
        }
    }
}

impl StudioConfig {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> StickerResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| StickerError::validation(format!("parse config JSON: {e}")))
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> StickerResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StickerError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check every field a render job depends on.
    pub fn validate(&self) -> StickerResult<()> {
        if self.canvas_size == 0 || !self.canvas_size.is_multiple_of(2) {
            return Err(StickerError::validation(
                "canvas_size must be even and > 0 (required for yuv420p output)",
            ));
        }
        if self.canvas_size > u32::from(u16::MAX) {
            return Err(StickerError::validation("canvas_size exceeds 65535"));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(StickerError::validation(
                "font_size_px must be finite and > 0",
            ));
        }
        if !self.line_height_px.is_finite() || self.line_height_px <= 0.0 {
            return Err(StickerError::validation(
                "line_height_px must be finite and > 0",
            ));
        }
        Rgba8::from_hex(&self.text_color)?;
        if !self.glyph_url_template.contains(CODEPOINTS_PLACEHOLDER) {
            return Err(StickerError::validation(format!(
                "glyph_url_template must contain '{CODEPOINTS_PLACEHOLDER}'"
            )));
        }
        validate_duration(self.video.duration_secs, "video.duration_secs")?;
        Fps::whole(self.video.fps)?;
        if self.sticker.quality > 100 {
            return Err(StickerError::validation("sticker.quality must be in 0..=100"));
        }
        if !self.sticker.max_duration_secs.is_finite() || self.sticker.max_duration_secs <= 0.0 {
            return Err(StickerError::validation(
                "sticker.max_duration_secs must be finite and > 0",
            ));
        }
        Ok(())
    }

    /// Square canvas at `canvas_size`.
    pub fn canvas(&self) -> Canvas {
        Canvas::square(self.canvas_size)
    }

    /// Per-request HTTP timeout.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }
}

/// Reject a negative or non-finite clip duration.
pub fn validate_duration(secs: f64, what: &str) -> StickerResult<()> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(StickerError::validation(format!(
            "{what} must be finite and >= 0"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
