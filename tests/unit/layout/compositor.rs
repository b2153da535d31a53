use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::foundation::core::Canvas;
use crate::foundation::error::StickerError;
use crate::glyph::provider::GlyphImage;

struct Stub {
    calls: AtomicUsize,
    ok: bool,
}

impl Stub {
    fn new(ok: bool) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            ok,
        }
    }
}

impl GlyphProvider for Stub {
    fn fetch(&self, _key: &GlyphKey) -> StickerResult<GlyphImage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.ok {
            return Err(StickerError::fetch("offline"));
        }
        Ok(GlyphImage {
            width: 2,
            height: 2,
            rgba8_premul: Arc::new([255u8, 200, 0, 255].repeat(4)),
        })
    }
}

fn style() -> TextStyle {
    TextStyle {
        font_size_px: 40.0,
        line_height: 48.0,
        color: Rgba8::WHITE,
    }
}

fn frame(max_width: f64) -> LayoutFrame {
    LayoutFrame {
        origin: Point::new(24.0, 400.0),
        max_width,
    }
}

fn run(text: &str, provider: &Stub, max_width: f64) -> LayoutTrace {
    let fonts = Mutex::new(FontEngine::bundled().unwrap());
    let mut painter = Painter::new(Canvas::square(512)).unwrap();
    let mut c = Compositor::new(&fonts, provider, "-", style());
    c.draw(&mut painter, text, frame(max_width)).unwrap()
}

#[test]
fn cursor_places_oversized_unit_at_line_start_then_wraps() {
    let mut cur = LayoutCursor::new(frame(10.0), 48.0);
    let (p0, w0) = cur.place(30.0);
    assert_eq!((p0, w0), (Point::new(24.0, 400.0), false));
    cur.advance(30.0);

    let (p1, w1) = cur.place(30.0);
    assert!(w1);
    assert_eq!(p1, Point::new(24.0, 448.0));
}

#[test]
fn ascii_text_never_touches_the_glyph_provider() {
    let stub = Stub::new(true);
    let trace = run("Hello there friends", &stub, 464.0);
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    assert_eq!(trace.count(UnitKind::Glyph), 0);
    assert_eq!(trace.count(UnitKind::Filler), 0);
    assert_eq!(trace.count(UnitKind::Text), 17);
    assert_eq!(trace.count(UnitKind::Space), 3);
}

#[test]
fn resolved_glyph_advances_by_size_plus_gap() {
    let stub = Stub::new(true);
    let trace = run("😀", &stub, 464.0);
    assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    let u = trace.units[0];
    assert_eq!(u.kind, UnitKind::Glyph);
    assert_eq!(u.advance, 45.0 + GLYPH_GAP_PX);
}

#[test]
fn failed_glyph_draws_filler_with_fixed_advance() {
    let stub = Stub::new(false);
    let trace = run("a😀b", &stub, 464.0);
    let kinds: Vec<UnitKind> = trace.units.iter().map(|u| u.kind).collect();
    assert_eq!(
        kinds,
        vec![
            UnitKind::Text,
            UnitKind::Filler,
            UnitKind::Text,
            UnitKind::Space
        ]
    );
    assert_eq!(trace.units[1].advance, FILLER_SIZE_PX + GLYPH_GAP_PX);
    assert_eq!(
        trace.units[2].x,
        trace.units[1].x + FILLER_SIZE_PX + GLYPH_GAP_PX
    );
}

#[test]
fn glyph_is_refetched_for_every_occurrence() {
    let stub = Stub::new(true);
    run("😀😀 😀", &stub, 464.0);
    assert_eq!(stub.calls.load(Ordering::SeqCst), 3);
}

#[test]
fn long_token_wraps_inside_the_word() {
    let stub = Stub::new(true);
    let trace = run("abcdefghijklmnopqrstuvwxyz", &stub, 200.0);
    assert!(trace.line_count() >= 3);
    let first_wrap = trace.units.iter().position(|u| u.wrapped).unwrap();
    assert!(first_wrap > 0);
    assert_eq!(trace.units[first_wrap].kind, UnitKind::Text);
    assert_eq!(trace.units[first_wrap].x, 24.0);
}

#[test]
fn space_that_overflows_wraps_instead_of_advancing() {
    let stub = Stub::new(true);
    let mut fonts = FontEngine::bundled().unwrap();
    let w = fonts.measure("a", 40.0).unwrap() + fonts.measure("b", 40.0).unwrap();
    // Room for "a" and "b" but not for the trailing space.
    let trace = run("ab cd", &stub, w + 1.0);
    let space = trace.units[2];
    assert_eq!(space.kind, UnitKind::Space);
    assert!(space.wrapped);
    assert_eq!(space.advance, 0.0);
    assert_eq!(trace.units[3].x, 24.0);
    assert_eq!(trace.units[3].y, 448.0);
}

#[test]
fn narrower_than_any_unit_terminates_one_unit_per_line() {
    let stub = Stub::new(true);
    let trace = run("abc", &stub, 1.0);
    let text: Vec<&PlacedUnit> = trace
        .units
        .iter()
        .filter(|u| u.kind == UnitKind::Text)
        .collect();
    assert_eq!(text.len(), 3);
    assert!(!text[0].wrapped);
    assert!(text[1].wrapped && text[2].wrapped);
    assert!(text.iter().all(|u| u.x == 24.0));
    assert_eq!(trace.line_count(), 3);
}

#[test]
fn layout_is_deterministic() {
    let stub = Stub::new(false);
    let a = run("hi 😀 there", &stub, 464.0);
    let b = run("hi 😀 there", &stub, 464.0);
    assert_eq!(a, b);
}

#[test]
fn glyph_size_floors() {
    assert_eq!(style().glyph_size(), 45.0);
}
