use std::path::Path;
use std::sync::Arc;

use crate::assets::decode::DecodedImage;
use crate::foundation::core::{Affine, Canvas, Point, Rect, Rgba8};
use crate::foundation::error::{StickerError, StickerResult};
use crate::foundation::math::flatten_premul_over_bg;
use crate::text::font::ShapedText;

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Raw RGBA8 bytes at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Opaque RGBA8 copy with any residual alpha flattened over black.
    pub fn to_opaque_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = vec![0u8; self.data.len()];
        flatten_premul_over_bg(&mut out, &self.data, [0, 0, 0]);
        out
    }

    /// Encode as a lossless PNG at `path`.
    pub fn write_png(&self, path: &Path) -> StickerResult<()> {
        image::save_buffer_with_format(
            path,
            &self.to_opaque_rgba8(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| StickerError::io(format!("write png '{}': {e}", path.display())))
    }
}

/// A decoded image ready to be used as a `vello_cpu` paint.
#[derive(Clone)]
pub(crate) struct ImagePaint {
    paint: vello_cpu::Image,
    pub(crate) w: u32,
    pub(crate) h: u32,
}

impl ImagePaint {
    pub(crate) fn from_decoded(img: &DecodedImage) -> StickerResult<Self> {
        let pixmap = pixmap_from_premul_bytes(&img.rgba8_premul, img.width, img.height)?;
        Ok(Self {
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
            w: img.width,
            h: img.height,
        })
    }
}

/// Immediate-mode drawing surface for one frame.
///
/// Every draw call is pre-multiplied by a base transform, which the animated path uses for the
/// per-frame breathing scale.
pub(crate) struct Painter {
    ctx: vello_cpu::RenderContext,
    canvas: Canvas,
    base: Affine,
}

impl Painter {
    pub(crate) fn new(canvas: Canvas) -> StickerResult<Self> {
        let w: u16 = canvas
            .width
            .try_into()
            .map_err(|_| StickerError::validation("canvas width exceeds u16"))?;
        let h: u16 = canvas
            .height
            .try_into()
            .map_err(|_| StickerError::validation("canvas height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(StickerError::validation("canvas must be non-empty"));
        }
        Ok(Self {
            ctx: vello_cpu::RenderContext::new(w, h),
            canvas,
            base: Affine::IDENTITY,
        })
    }

    pub(crate) fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub(crate) fn set_base_transform(&mut self, base: Affine) {
        self.base = base;
    }

    pub(crate) fn reset_base_transform(&mut self) {
        self.base = Affine::IDENTITY;
    }

    pub(crate) fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.ctx.set_transform(affine_to_cpu(self.base));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    /// Draw `img` stretched into `dest`.
    pub(crate) fn draw_image(&mut self, img: &ImagePaint, dest: Rect) {
        if img.w == 0 || img.h == 0 {
            return;
        }
        let sx = dest.width() / f64::from(img.w);
        let sy = dest.height() / f64::from(img.h);
        let tr = self.base
            * Affine::translate((dest.x0, dest.y0))
            * Affine::scale_non_uniform(sx, sy);
        self.ctx.set_transform(affine_to_cpu(tr));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(img.paint.clone());
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(img.w),
            f64::from(img.h),
        ));
    }

    /// Draw a shaped run with its layout box's top-left corner at `origin`.
    pub(crate) fn draw_text(
        &mut self,
        font: &vello_cpu::peniko::FontData,
        shaped: &ShapedText,
        origin: Point,
    ) {
        let tr = self.base * Affine::translate((origin.x, origin.y));
        self.ctx.set_transform(affine_to_cpu(tr));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        for line in shaped.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    /// Rasterize everything drawn so far.
    pub(crate) fn finish(mut self) -> FrameRGBA {
        let w = self.ctx.width();
        let h = self.ctx.height();
        self.ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        self.ctx.render_to_pixmap(&mut pixmap);
        FrameRGBA {
            width: u32::from(w),
            height: u32::from(h),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> StickerResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| StickerError::validation("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| StickerError::validation("image height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(StickerError::validation("image byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
