use parking_lot::Mutex;

use crate::foundation::core::{Point, Rect, Rgba8};
use crate::foundation::error::StickerResult;
use crate::glyph::provider::{GlyphKey, GlyphProvider};
use crate::render::canvas::{ImagePaint, Painter};
use crate::text::classify::GlyphKind;
use crate::text::font::FontEngine;
use crate::text::segment::{classified, tokens};

/// Horizontal gap after every glyph bitmap or filler box.
pub const GLYPH_GAP_PX: f64 = 6.0;
/// Glyph bitmap edge length relative to the line height.
pub const GLYPH_SCALE: f64 = 0.95;
/// Edge length of the box drawn when a glyph cannot be resolved.
pub const FILLER_SIZE_PX: f64 = 18.0;
/// How far the filler box's top edge sits above the line's center.
const FILLER_RISE_PX: f64 = 12.0;

/// Styling shared by every unit of one layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub font_size_px: f32,
    /// Distance between consecutive line centers.
    pub line_height: f64,
    /// Text and filler color.
    pub color: Rgba8,
}

impl TextStyle {
    /// Edge length of a glyph bitmap: `floor(0.95 * line_height)`.
    pub fn glyph_size(&self) -> f64 {
        (self.line_height * GLYPH_SCALE).floor()
    }
}

/// Where a layout pass starts and how wide its lines may run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutFrame {
    /// Left edge and center of the first line.
    pub origin: Point,
    /// Maximum line width measured from `origin.x`.
    pub max_width: f64,
}

/// Pen position for one layout pass. Only ever moves right or down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutCursor {
    /// Current pen x.
    pub x: f64,
    /// Center of the current line.
    pub y: f64,
    line_height: f64,
    left: f64,
    right: f64,
}

impl LayoutCursor {
    /// Cursor at `frame.origin`.
    pub fn new(frame: LayoutFrame, line_height: f64) -> Self {
        Self {
            x: frame.origin.x,
            y: frame.origin.y,
            line_height,
            left: frame.origin.x,
            right: frame.origin.x + frame.max_width.max(0.0),
        }
    }

    /// Return `true` when nothing has been placed on the current line.
    pub fn at_line_start(&self) -> bool {
        self.x <= self.left
    }

    /// Return `true` when a unit `width` wide would cross the right edge.
    pub fn overflows(&self, width: f64) -> bool {
        self.x + width > self.right
    }

    /// Move to the start of the next line.
    pub fn wrap(&mut self) {
        self.x = self.left;
        self.y += self.line_height;
    }

    /// Position for a unit `width` wide, wrapping first when it would overflow.
    ///
    /// A unit wider than the whole line is placed at line start rather than wrapped again.
    /// Returns the position and whether a wrap happened.
    pub fn place(&mut self, width: f64) -> (Point, bool) {
        let wrapped = self.overflows(width) && !self.at_line_start();
        if wrapped {
            self.wrap();
        }
        (Point::new(self.x, self.y), wrapped)
    }

    /// Advance the pen horizontally.
    pub fn advance(&mut self, dx: f64) {
        self.x += dx;
    }
}

/// What a placed unit is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitKind {
    /// Font-rendered grapheme.
    Text,
    /// Resolved glyph bitmap.
    Glyph,
    /// Filler box for a glyph that could not be resolved.
    Filler,
    /// Inter-token space.
    Space,
}

/// One cursor step of a layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedUnit {
    /// Unit kind.
    pub kind: UnitKind,
    /// Pen x where the unit starts.
    pub x: f64,
    /// Line center the unit sits on.
    pub y: f64,
    /// Horizontal advance taken (0 for a space that wrapped instead).
    pub advance: f64,
    /// Whether the cursor wrapped just before this unit.
    pub wrapped: bool,
}

/// Ordered record of cursor movements in a layout pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutTrace {
    /// Units in placement order.
    pub units: Vec<PlacedUnit>,
}

impl LayoutTrace {
    /// Number of units of `kind`.
    pub fn count(&self, kind: UnitKind) -> usize {
        self.units.iter().filter(|u| u.kind == kind).count()
    }

    /// Number of lines that hold at least one non-space unit.
    pub fn line_count(&self) -> usize {
        let mut ys: Vec<f64> = self
            .units
            .iter()
            .filter(|u| u.kind != UnitKind::Space)
            .map(|u| u.y)
            .collect();
        ys.dedup();
        ys.len()
    }
}

/// Lays text out left to right with inline glyph bitmaps and draws it.
///
/// Wrapping may split a token: the check happens per unit, not per word. The font engine is
/// locked only while a run is shaped or measured, never across a glyph fetch.
pub(crate) struct Compositor<'a> {
    fonts: &'a Mutex<FontEngine>,
    font: vello_cpu::peniko::FontData,
    glyphs: &'a dyn GlyphProvider,
    glyph_separator: &'a str,
    style: TextStyle,
}

impl<'a> Compositor<'a> {
    pub(crate) fn new(
        fonts: &'a Mutex<FontEngine>,
        glyphs: &'a dyn GlyphProvider,
        glyph_separator: &'a str,
        style: TextStyle,
    ) -> Self {
        let font = fonts.lock().font().clone();
        Self {
            fonts,
            font,
            glyphs,
            glyph_separator,
            style,
        }
    }

    /// Lay out and draw `text` into `painter`.
    pub(crate) fn draw(
        &mut self,
        painter: &mut Painter,
        text: &str,
        frame: LayoutFrame,
    ) -> StickerResult<LayoutTrace> {
        let mut cursor = LayoutCursor::new(frame, self.style.line_height);
        let mut trace = LayoutTrace::default();
        let space_w = self.fonts.lock().measure(" ", self.style.font_size_px)?;

        for token in tokens(text) {
            for g in classified(token) {
                let unit = match g.kind {
                    GlyphKind::Textual => self.draw_textual(painter, &mut cursor, g.text)?,
                    GlyphKind::Pictographic => self.draw_pictographic(painter, &mut cursor, g.text),
                };
                trace.units.push(unit);
            }

            let (x, y) = (cursor.x, cursor.y);
            let wrapped = cursor.overflows(space_w);
            if wrapped {
                cursor.wrap();
            } else {
                cursor.advance(space_w);
            }
            trace.units.push(PlacedUnit {
                kind: UnitKind::Space,
                x,
                y,
                advance: if wrapped { 0.0 } else { space_w },
                wrapped,
            });
        }

        Ok(trace)
    }

    fn draw_textual(
        &mut self,
        painter: &mut Painter,
        cursor: &mut LayoutCursor,
        grapheme: &str,
    ) -> StickerResult<PlacedUnit> {
        let shaped = self
            .fonts
            .lock()
            .shape(grapheme, self.style.font_size_px, self.style.color)?;
        let (pos, wrapped) = cursor.place(shaped.width);
        // Center the run's line box on the cursor line.
        let top_left = Point::new(pos.x, pos.y - shaped.height / 2.0);
        painter.draw_text(&self.font, &shaped, top_left);
        cursor.advance(shaped.width);
        Ok(PlacedUnit {
            kind: UnitKind::Text,
            x: pos.x,
            y: pos.y,
            advance: shaped.width,
            wrapped,
        })
    }

    fn draw_pictographic(
        &mut self,
        painter: &mut Painter,
        cursor: &mut LayoutCursor,
        grapheme: &str,
    ) -> PlacedUnit {
        let key = GlyphKey::from_grapheme(grapheme, self.glyph_separator);
        let resolved = self
            .glyphs
            .fetch(&key)
            .and_then(|img| ImagePaint::from_decoded(&img));

        match resolved {
            Ok(paint) => {
                let size = self.style.glyph_size();
                let (pos, wrapped) = cursor.place(size);
                painter.draw_image(
                    &paint,
                    Rect::new(pos.x, pos.y - size / 2.0, pos.x + size, pos.y + size / 2.0),
                );
                cursor.advance(size + GLYPH_GAP_PX);
                PlacedUnit {
                    kind: UnitKind::Glyph,
                    x: pos.x,
                    y: pos.y,
                    advance: size + GLYPH_GAP_PX,
                    wrapped,
                }
            }
            Err(e) => {
                tracing::warn!(glyph = %key, error = %e, "glyph unavailable, drawing filler");
                let (pos, wrapped) = cursor.place(FILLER_SIZE_PX);
                let top = pos.y - FILLER_RISE_PX;
                painter.fill_rect(
                    Rect::new(pos.x, top, pos.x + FILLER_SIZE_PX, top + FILLER_SIZE_PX),
                    self.style.color,
                );
                cursor.advance(FILLER_SIZE_PX + GLYPH_GAP_PX);
                PlacedUnit {
                    kind: UnitKind::Filler,
                    x: pos.x,
                    y: pos.y,
                    advance: FILLER_SIZE_PX + GLYPH_GAP_PX,
                    wrapped,
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/compositor.rs"]
mod tests;
