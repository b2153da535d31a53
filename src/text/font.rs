use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{StickerError, StickerResult};

/// Bold sans font used when no font file is configured.
static BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// A shaped single-line run of text with its advance box.
pub(crate) struct ShapedText {
    pub(crate) layout: parley::Layout<TextBrushRgba8>,
    /// Advance width, trailing whitespace included.
    pub(crate) width: f64,
    pub(crate) height: f64,
}

/// Font metrics and shaping for textual graphemes.
///
/// One font face is registered up front; Parley resolves every run against it.
pub struct FontEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl FontEngine {
    /// Engine over the bundled bold sans face.
    pub fn bundled() -> StickerResult<Self> {
        Self::from_bytes(BUNDLED_FONT.to_vec())
    }

    /// Engine over a font file on disk.
    pub fn from_path(path: &Path) -> StickerResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read font '{}'", path.display()))?;
        Self::from_bytes(bytes)
    }

    /// Engine over raw TrueType/OpenType bytes.
    pub fn from_bytes(font_bytes: Vec<u8>) -> StickerResult<Self> {
        let blob = vello_cpu::peniko::Blob::from(font_bytes);
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx.collection.register_fonts(blob.clone(), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            StickerError::validation("no font families registered from font bytes")
        })?;

        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| StickerError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font: vello_cpu::peniko::FontData::new(blob, 0),
        })
    }

    /// Family name of the registered face.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub(crate) fn font(&self) -> &vello_cpu::peniko::FontData {
        &self.font
    }

    /// Shape `text` as one unbroken line.
    pub(crate) fn shape(
        &mut self,
        text: &str,
        size_px: f32,
        color: Rgba8,
    ) -> StickerResult<ShapedText> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(StickerError::validation(
                "font size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8::from(
            color,
        )));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        Ok(ShapedText {
            width: f64::from(layout.full_width()),
            height: f64::from(layout.height()),
            layout,
        })
    }

    /// Advance width of `text` at `size_px`.
    pub fn measure(&mut self, text: &str, size_px: f32) -> StickerResult<f64> {
        Ok(self.shape(text, size_px, Rgba8::WHITE)?.width)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/font.rs"]
mod tests;
