//! Thin drawing layer over `tiny_skia`. All shapes are anti-aliased and take
//! straight RGBA colours from the palette.

use image::RgbaImage;
use tiny_skia::{
    BlendMode, FillRule, LineCap, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform,
};

use crate::error::{IconError, Result};
use crate::layout::Circle;
use crate::palette::Rgba;

// Cubic Bezier handle length for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

fn paint_of(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.0, color.1, color.2, color.3);
    paint.anti_alias = true;
    paint
}

pub fn new_canvas(size: u32) -> Result<Pixmap> {
    Pixmap::new(size, size).ok_or(IconError::Draw("canvas has zero area"))
}

pub fn rounded_rect_path(left: f32, top: f32, right: f32, bottom: f32, radius: f32) -> Result<Path> {
    let r = radius.min((right - left) / 2.0).min((bottom - top) / 2.0).max(0.0);
    if r == 0.0 {
        let rect = Rect::from_ltrb(left, top, right, bottom).ok_or(IconError::Draw("empty rectangle"))?;
        return Ok(PathBuilder::from_rect(rect));
    }
    let k = r * KAPPA;
    let mut pb = PathBuilder::new();
    pb.move_to(left + r, top);
    pb.line_to(right - r, top);
    pb.cubic_to(right - r + k, top, right, top + r - k, right, top + r);
    pb.line_to(right, bottom - r);
    pb.cubic_to(right, bottom - r + k, right - r + k, bottom, right - r, bottom);
    pb.line_to(left + r, bottom);
    pb.cubic_to(left + r - k, bottom, left, bottom - r + k, left, bottom - r);
    pb.line_to(left, top + r);
    pb.cubic_to(left, top + r - k, left + r - k, top, left + r, top);
    pb.close();
    pb.finish().ok_or(IconError::Draw("empty rectangle"))
}

pub fn fill_rounded_rect(
    pixmap: &mut Pixmap,
    (left, top, right, bottom): (f32, f32, f32, f32),
    radius: f32,
    fill: Rgba,
) -> Result<()> {
    let path = rounded_rect_path(left, top, right, bottom, radius)?;
    pixmap.fill_path(&path, &paint_of(fill), FillRule::Winding, Transform::identity(), None);
    Ok(())
}

/// Filled circle with an optional `(colour, width)` outline drawn inside the
/// circle's bounds. A zero width draws no outline.
pub fn fill_circle(
    pixmap: &mut Pixmap,
    circle: Circle,
    fill: Rgba,
    outline: Option<(Rgba, f32)>,
) -> Result<()> {
    // from_circle accepts r = 0 and yields a path that fills nothing.
    let disc = |r: f32| {
        if !(r > 0.0 && r.is_finite()) {
            return Err(IconError::Draw("degenerate circle radius"));
        }
        PathBuilder::from_circle(circle.cx, circle.cy, r).ok_or(IconError::Draw("degenerate circle radius"))
    };
    let outer = disc(circle.r)?;
    match outline {
        Some((color, width)) if width > 0.0 => {
            pixmap.fill_path(&outer, &paint_of(color), FillRule::Winding, Transform::identity(), None);
            if circle.r > width {
                pixmap.fill_path(&disc(circle.r - width)?, &paint_of(fill), FillRule::Winding, Transform::identity(), None);
            }
        }
        _ => pixmap.fill_path(&outer, &paint_of(fill), FillRule::Winding, Transform::identity(), None),
    }
    Ok(())
}

/// Butt-capped segment. A zero-length segment has no extent and draws nothing.
pub fn line(pixmap: &mut Pixmap, from: (f32, f32), to: (f32, f32), width: f32, color: Rgba) -> Result<()> {
    if from == to {
        return Ok(());
    }
    let mut pb = PathBuilder::new();
    pb.move_to(from.0, from.1);
    pb.line_to(to.0, to.1);
    let path = pb.finish().ok_or(IconError::Draw("empty line segment"))?;
    let stroke = Stroke { width, line_cap: LineCap::Butt, ..Stroke::default() };
    pixmap.stroke_path(&path, &paint_of(color), &stroke, Transform::identity(), None);
    Ok(())
}

pub fn fill_path(pixmap: &mut Pixmap, path: &Path, transform: Transform, color: Rgba) {
    pixmap.fill_path(path, &paint_of(color), FillRule::Winding, transform, None);
}

/// White band `rows` tall whose opacity falls linearly from `max_alpha` to 0,
/// composited only where the canvas already has coverage.
pub fn soften_gradient(pixmap: &mut Pixmap, rows: u32, max_alpha: u8) {
    let width = pixmap.width() as f32;
    for y in 0..rows.min(pixmap.height()) {
        let alpha = (max_alpha as f32 * (1.0 - y as f32 / rows as f32)) as u8;
        if alpha == 0 {
            continue;
        }
        if let Some(row) = Rect::from_xywh(0.0, y as f32, width, 1.0) {
            pixmap.fill_rect(row, &overlay_paint(alpha), Transform::identity(), None);
        }
    }
}

/// `layers` uniform white overlays with linearly decaying opacity, folded into
/// one equivalent overlay and composited where the canvas has coverage.
pub fn soften_stacked(pixmap: &mut Pixmap, layers: u32, max_alpha: u8) {
    let alpha = stacked_alpha(layers, max_alpha);
    if alpha == 0 {
        return;
    }
    if let Some(all) = Rect::from_xywh(0.0, 0.0, pixmap.width() as f32, pixmap.height() as f32) {
        pixmap.fill_rect(all, &overlay_paint(alpha), Transform::identity(), None);
    }
}

/// Opacity of a single overlay equivalent to the whole stack.
pub fn stacked_alpha(layers: u32, max_alpha: u8) -> u8 {
    let remaining = (0..layers).fold(1.0f64, |acc, i| {
        let a = (max_alpha as f64 * (1.0 - i as f64 / layers as f64)).floor() / 255.0;
        acc * (1.0 - a)
    });
    ((1.0 - remaining) * 255.0).round() as u8
}

fn overlay_paint(alpha: u8) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(255, 255, 255, alpha);
    paint.blend_mode = BlendMode::SourceAtop;
    paint
}

/// Un-premultiplies the pixmap into an owned RGBA image.
pub fn into_rgba_image(pixmap: Pixmap) -> Result<RgbaImage> {
    let (w, h) = (pixmap.width(), pixmap.height());
    let mut raw = Vec::with_capacity((w * h * 4) as usize);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        raw.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(w, h, raw).ok_or(IconError::Draw("pixel buffer size mismatch"))
}
