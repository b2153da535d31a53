use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use rand::Rng;

use crate::assets::decode::{DecodedImage, decode_image, decode_image_file};
use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{StickerError, StickerResult};
use crate::glyph::provider::http_get_bytes;
use crate::render::canvas::{ImagePaint, Painter};

/// Two-stop linear gradient running from the top-left to the bottom-right corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gradient {
    /// Color at the top-left corner.
    pub start: Rgba8,
    /// Color at the bottom-right corner.
    pub end: Rgba8,
}

impl Gradient {
    /// Used when the background pool is empty.
    pub const POOL_EMPTY: Self = Self {
        start: Rgba8::opaque(0x1a, 0x2a, 0x6c),
        end: Rgba8::opaque(0xb2, 0x1f, 0x1f),
    };

    /// Used when the chosen background cannot be loaded.
    pub const LOAD_FAILURE: Self = Self {
        start: Rgba8::opaque(0x0f, 0x20, 0x27),
        end: Rgba8::opaque(0x2c, 0x53, 0x64),
    };

    /// Rasterize the gradient at canvas resolution.
    pub fn rasterize(&self, canvas: Canvas) -> DecodedImage {
        let (w, h) = (canvas.width as usize, canvas.height as usize);
        let (wf, hf) = (f64::from(canvas.width), f64::from(canvas.height));
        let denom = (wf * wf + hf * hf).max(f64::EPSILON);
        let mut bytes = vec![0u8; w.saturating_mul(h).saturating_mul(4)];
        for y in 0..h {
            for x in 0..w {
                let t = ((x as f64 + 0.5) * wf + (y as f64 + 0.5) * hf) / denom;
                let c = self.start.lerp(self.end, t).premultiplied();
                let idx = (y * w + x) * 4;
                bytes[idx..idx + 4].copy_from_slice(&c);
            }
        }
        DecodedImage {
            width: canvas.width,
            height: canvas.height,
            rgba8_premul: Arc::new(bytes),
        }
    }
}

/// What a job's background was built from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackgroundKind {
    /// A pool entry (local path or URL) that loaded successfully.
    Image {
        /// The pool entry.
        source: String,
    },
    /// A gradient fallback.
    Gradient(Gradient),
}

/// Background chosen once per render job and reused for every frame.
#[derive(Clone)]
pub struct Background {
    kind: BackgroundKind,
    paint: ImagePaint,
}

impl Background {
    pub(crate) fn from_image(source: String, img: &DecodedImage) -> StickerResult<Self> {
        Ok(Self {
            kind: BackgroundKind::Image { source },
            paint: ImagePaint::from_decoded(img)?,
        })
    }

    /// Background filled with `gradient`.
    pub fn from_gradient(gradient: Gradient, canvas: Canvas) -> StickerResult<Self> {
        Ok(Self {
            kind: BackgroundKind::Gradient(gradient),
            paint: ImagePaint::from_decoded(&gradient.rasterize(canvas))?,
        })
    }

    /// What this background was built from.
    pub fn kind(&self) -> &BackgroundKind {
        &self.kind
    }

    /// Draw stretched over the whole canvas.
    pub(crate) fn paint(&self, painter: &mut Painter) {
        let rect = painter.canvas().rect();
        painter.draw_image(&self.paint, rect);
    }
}

/// Configured pool of background sources.
#[derive(Clone, Debug, Default)]
pub struct BackgroundPool {
    sources: Vec<String>,
}

impl BackgroundPool {
    /// Pool over local paths or `http(s)://` URLs.
    pub fn new(sources: Vec<String>) -> Self {
        Self { sources }
    }

    /// Pool over local files.
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self::new(
            paths
                .into_iter()
                .map(|p| p.as_ref().to_string_lossy().into_owned())
                .collect(),
        )
    }

    /// Number of sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Return `true` when the pool has no sources.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Uniformly random source, or `None` for an empty pool.
    pub fn pick_source<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        if self.sources.is_empty() {
            return None;
        }
        Some(self.sources[rng.gen_range(0..self.sources.len())].as_str())
    }

    /// Pick and load one background for a render job.
    ///
    /// A source that fails to load or cannot be painted falls back to
    /// [`Gradient::LOAD_FAILURE`], an empty pool to [`Gradient::POOL_EMPTY`]; only an unusable
    /// canvas is an error.
    pub fn select<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        agent: &ureq::Agent,
        canvas: Canvas,
    ) -> StickerResult<Background> {
        self.select_or(rng, agent, canvas, Gradient::POOL_EMPTY)
    }

    /// Like [`select`](Self::select), with `empty_pool` drawn when there is nothing to pick.
    pub fn select_or<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        agent: &ureq::Agent,
        canvas: Canvas,
        empty_pool: Gradient,
    ) -> StickerResult<Background> {
        let Some(source) = self.pick_source(rng) else {
            tracing::debug!("background pool empty, using gradient");
            return Background::from_gradient(empty_pool, canvas);
        };

        let loaded = load_source(source, agent)
            .and_then(|img| Background::from_image(source.to_string(), &img));
        match loaded {
            Ok(bg) => Ok(bg),
            Err(e) => {
                tracing::warn!(source, error = %e, "background load failed, using gradient");
                Background::from_gradient(Gradient::LOAD_FAILURE, canvas)
            }
        }
    }
}

fn load_source(source: &str, agent: &ureq::Agent) -> StickerResult<DecodedImage> {
    let lower = source.to_ascii_lowercase();
    let decoded = if lower.starts_with("http://") || lower.starts_with("https://") {
        let bytes = http_get_bytes(agent, source).map_err(StickerError::background)?;
        decode_image(&bytes)
    } else {
        decode_image_file(Path::new(source))
    };
    decoded.map_err(|e| StickerError::background(format!("'{source}': {e}")))
}

const BACKGROUND_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// List image files directly inside `dir`, sorted by path.
///
/// A missing directory yields an empty list.
pub fn scan_background_dir(dir: &Path) -> StickerResult<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("read background dir '{}'", dir.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("read background dir '{}'", dir.display()))?
            .path();
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| BACKGROUND_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        if is_image && path.is_file() {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/background.rs"]
mod tests;
