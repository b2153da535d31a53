use parking_lot::Mutex;

use crate::assets::background::Background;
use crate::foundation::core::{Canvas, Point, Rect, Rgba8};
use crate::foundation::error::StickerResult;
use crate::glyph::provider::GlyphProvider;
use crate::layout::compositor::{Compositor, LayoutFrame, LayoutTrace, TextStyle};
use crate::render::canvas::{FrameRGBA, Painter};
use crate::text::font::FontEngine;

/// Height of the darkened band behind the text.
pub const OVERLAY_BAND_PX: f64 = 140.0;
/// Opacity of the still sticker's band.
pub const STILL_OVERLAY_OPACITY: f64 = 0.35;
/// Horizontal padding of the still sticker's text block.
pub const STILL_PADDING_PX: f64 = 24.0;
/// Distance from the bottom edge to the first line center.
pub const STILL_TEXT_RISE_PX: f64 = 112.0;

/// Everything one render job draws with, borrowed for the job's lifetime.
pub(crate) struct Scene<'a> {
    pub(crate) canvas: Canvas,
    pub(crate) background: &'a Background,
    pub(crate) fonts: &'a Mutex<FontEngine>,
    pub(crate) glyphs: &'a dyn GlyphProvider,
    pub(crate) glyph_separator: &'a str,
    pub(crate) style: TextStyle,
}

impl Scene<'_> {
    pub(crate) fn compositor(&self) -> Compositor<'_> {
        Compositor::new(self.fonts, self.glyphs, self.glyph_separator, self.style)
    }

    /// Background plus the bottom band at `opacity`.
    pub(crate) fn paint_backdrop(&self, painter: &mut Painter, opacity: f64) {
        let w = f64::from(self.canvas.width);
        let h = f64::from(self.canvas.height);
        self.background.paint(painter);
        painter.fill_rect(
            Rect::new(0.0, h - OVERLAY_BAND_PX, w, h),
            Rgba8::black_with_opacity(opacity),
        );
    }
}

/// Rasterize the still sticker: background, band, then text anchored near the bottom.
pub(crate) fn render_still(
    scene: &Scene<'_>,
    text: &str,
) -> StickerResult<(FrameRGBA, LayoutTrace)> {
    let mut painter = Painter::new(scene.canvas)?;
    scene.paint_backdrop(&mut painter, STILL_OVERLAY_OPACITY);

    let w = f64::from(scene.canvas.width);
    let h = f64::from(scene.canvas.height);
    let frame = LayoutFrame {
        origin: Point::new(STILL_PADDING_PX, h - STILL_TEXT_RISE_PX),
        max_width: w - 2.0 * STILL_PADDING_PX,
    };
    let trace = scene.compositor().draw(&mut painter, text, frame)?;
    Ok((painter.finish(), trace))
}

#[cfg(test)]
#[path = "../../tests/unit/render/still.rs"]
mod tests;
