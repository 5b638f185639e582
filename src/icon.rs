use image::RgbaImage;
use log::debug;
use serde::Serialize;
use tiny_skia::{Pixmap, Transform};

use crate::error::Result;
use crate::font::Font;
use crate::layout::{Badge, Corner, Layout, BADGES};
use crate::paint;
use crate::palette::PALETTE;

/// Peak opacity of the white softening overlay.
const SOFTENING_MAX_ALPHA: u8 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Softening {
    /// Top-down band, one overlay row per step.
    #[default]
    Gradient,
    /// Full-canvas overlays stacked on top of each other.
    Stacked,
}

impl std::str::FromStr for Softening {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gradient" => Ok(Softening::Gradient),
            "stacked" => Ok(Softening::Stacked),
            other => Err(format!("unknown softening mode '{}'", other)),
        }
    }
}

/// Background rectangle of a placed badge, in canvas pixels.
#[derive(Debug, Clone, Copy)]
pub struct BadgeBox {
    pub label: &'static str,
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

#[derive(Debug, Clone)]
pub struct IconComposer {
    font: Font,
    softening: Softening,
}

impl IconComposer {
    pub fn new(font: Font, softening: Softening) -> Self {
        Self { font, softening }
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    /// Renders the full icon at `size` x `size`. Same size and font give the same pixels.
    pub fn compose(&self, size: u32) -> Result<RgbaImage> {
        let layout = Layout::for_size(size)?;
        let mut canvas = paint::new_canvas(size)?;

        let s = size as f32;
        paint::fill_rounded_rect(&mut canvas, (0.0, 0.0, s, s), layout.corner_radius, PALETTE.background)?;
        match self.softening {
            Softening::Gradient => paint::soften_gradient(&mut canvas, layout.softening_rows, SOFTENING_MAX_ALPHA),
            Softening::Stacked => paint::soften_stacked(&mut canvas, layout.softening_rows, SOFTENING_MAX_ALPHA),
        }

        paint::fill_circle(
            &mut canvas,
            layout.plate,
            PALETTE.white,
            Some((PALETTE.outline_dark, layout.plate_stroke)),
        )?;
        for item in &layout.food {
            paint::fill_circle(&mut canvas, item.disc, item.fill, None)?;
        }

        for node in &layout.nodes {
            paint::fill_circle(&mut canvas, *node, PALETTE.highlight, Some((PALETTE.white, layout.node_stroke)))?;
        }
        // Connectors go on top of the node circles.
        for pair in layout.nodes.windows(2) {
            paint::line(
                &mut canvas,
                (pair[0].cx, pair[0].cy),
                (pair[1].cx, pair[1].cy),
                layout.connector_width,
                PALETTE.white,
            )?;
        }

        for badge in BADGES.iter() {
            self.draw_badge(&mut canvas, &layout, badge)?;
        }

        debug!("composed {}x{} icon with {} font", size, size, self.font.describe());
        paint::into_rgba_image(canvas)
    }

    /// Background rectangles of both badges at `size`, in `BADGES` order.
    pub fn badge_boxes(&self, size: u32) -> Result<Vec<BadgeBox>> {
        let layout = Layout::for_size(size)?;
        Ok(BADGES.iter().map(|b| self.place_badge(&layout, b).0).collect())
    }

    /// Badge box plus the translation that puts the text's ink box at its anchor.
    fn place_badge(&self, layout: &Layout, badge: &Badge) -> (BadgeBox, Transform) {
        let ink = self.font.measure(badge.label, layout.font_px);
        let (ax, ay) = layout.badge_anchor(badge.anchor);
        let text_left = match badge.anchor {
            Corner::BottomLeft => ax,
            Corner::BottomRight => ax - ink.width,
        };
        let pad = layout.badge_padding;
        let bbox = BadgeBox {
            label: badge.label,
            left: text_left - pad,
            top: ay - pad,
            right: text_left + ink.width + pad,
            bottom: ay + ink.height + pad,
        };
        (bbox, Transform::from_translate(text_left - ink.left, ay - ink.top))
    }

    fn draw_badge(&self, canvas: &mut Pixmap, layout: &Layout, badge: &Badge) -> Result<()> {
        let (bbox, to_anchor) = self.place_badge(layout, badge);
        // Text too small to rasterise leaves nothing to frame.
        if bbox.right <= bbox.left || bbox.bottom <= bbox.top {
            return Ok(());
        }
        paint::fill_rounded_rect(
            canvas,
            (bbox.left, bbox.top, bbox.right, bbox.bottom),
            layout.badge_radius,
            badge.fill,
        )?;
        if let Some(text) = self.font.text_path(badge.label, layout.font_px) {
            paint::fill_path(canvas, &text, to_anchor, PALETTE.white);
        }
        Ok(())
    }
}

impl Default for IconComposer {
    fn default() -> Self {
        Self::new(Font::Builtin, Softening::default())
    }
}
