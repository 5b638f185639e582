use crate::error::{IconError, Result};
use crate::palette::{PALETTE, Rgba};

/// Below 28 px the floored disc and node radii reach zero; they are kept as
/// half-pixel dots instead.
const MIN_DOT_RADIUS: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub cx: f32,
    pub cy: f32,
    pub r: f32,
}

impl Circle {
    pub fn left(&self) -> f32 { self.cx - self.r }
    pub fn top(&self) -> f32 { self.cy - self.r }
    pub fn right(&self) -> f32 { self.cx + self.r }
    pub fn bottom(&self) -> f32 { self.cy + self.r }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    BottomLeft,
    BottomRight,
}

/// Label, fill and the corner the label is anchored to.
#[derive(Debug, Clone, Copy)]
pub struct Badge {
    pub label: &'static str,
    pub fill: Rgba,
    pub anchor: Corner,
}

pub const BADGES: [Badge; 2] = [
    Badge { label: "AI", fill: PALETTE.highlight, anchor: Corner::BottomLeft },
    Badge { label: "Cal", fill: PALETTE.accent, anchor: Corner::BottomRight },
];

#[derive(Debug, Clone, Copy)]
pub struct FoodItem {
    pub disc: Circle,
    pub fill: Rgba,
}

/// Every size-derived quantity of the icon. Text metrics are not included;
/// they depend on the resolved font and live in `icon::IconComposer::badge_boxes`.
#[derive(Debug, Clone)]
pub struct Layout {
    pub size: u32,
    pub corner_radius: f32,
    pub plate: Circle,
    pub plate_stroke: f32,
    pub food_radius: f32,
    pub food: [FoodItem; 3],
    pub node_size: f32,
    pub nodes: [Circle; 3],
    pub node_stroke: f32,
    pub connector_width: f32,
    pub font_px: f32,
    pub badge_padding: f32,
    pub badge_radius: f32,
    /// Rows covered by the softening overlay.
    pub softening_rows: u32,
}

impl Layout {
    pub fn for_size(size: u32) -> Result<Self> {
        if size == 0 {
            return Err(IconError::InvalidInput("icon size must be positive".to_string()));
        }
        let s = size as f32;
        let cx = (size / 2) as f32;
        let cy = cx;

        let plate_radius = s / 3.5;
        let food_radius = (plate_radius / 4.0).floor();
        let disc_r = (food_radius / 2.0).floor().max(MIN_DOT_RADIUS);
        let disc = |x: f32, y: f32| Circle { cx: x, cy: y, r: disc_r };
        let food = [
            FoodItem {
                disc: disc(cx - (plate_radius / 2.5).floor(), cy - (plate_radius / 3.0).floor()),
                fill: PALETTE.accent,
            },
            FoodItem {
                disc: disc(cx + (plate_radius / 3.0).floor(), cy - (plate_radius / 4.0).floor()),
                fill: PALETTE.highlight,
            },
            FoodItem {
                disc: disc(cx, cy + (plate_radius / 3.0).floor()),
                fill: PALETTE.amber,
            },
        ];

        let node_size = (size / 12) as f32;
        let node_r = ((size / 12 / 2) as f32).max(MIN_DOT_RADIUS);
        let node = |x: u32, y: u32| Circle { cx: x as f32, cy: y as f32, r: node_r };
        let nodes = [
            node(size - size / 6, size / 6),
            node(size - size / 8, size / 4),
            node(size - size / 4, size / 8),
        ];

        Ok(Self {
            size,
            corner_radius: (size / 8) as f32,
            plate: Circle { cx, cy, r: plate_radius },
            plate_stroke: (size / 80) as f32,
            food_radius,
            food,
            node_size,
            nodes,
            node_stroke: (size / 200) as f32,
            connector_width: ((size / 150) as f32).max(1.0),
            font_px: ((size / 8) as f32).max(1.0),
            badge_padding: (size / 40) as f32,
            badge_radius: (size / 60) as f32,
            softening_rows: size / 4,
        })
    }

    /// Top-left (BottomLeft) or top-right (BottomRight) corner of a badge's text ink box.
    pub fn badge_anchor(&self, corner: Corner) -> (f32, f32) {
        let s = self.size;
        let y = (s - s / 4) as f32;
        match corner {
            Corner::BottomLeft => ((s / 8) as f32, y),
            Corner::BottomRight => ((s - s / 8) as f32, y),
        }
    }

    pub fn all_circles(&self) -> impl Iterator<Item = Circle> + '_ {
        std::iter::once(self.plate)
            .chain(self.food.iter().map(|f| f.disc))
            .chain(self.nodes.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ICON_SIZES;

    #[test]
    fn rejects_zero_size() {
        assert!(matches!(Layout::for_size(0), Err(IconError::InvalidInput(_))));
    }

    #[test]
    fn tiny_sizes_keep_visible_dots() {
        for size in [1, 8, 27] {
            let l = Layout::for_size(size).unwrap();
            assert!(l.all_circles().all(|c| c.r > 0.0), "zero radius at {}", size);
            assert!(l.font_px >= 1.0);
            assert!(l.connector_width >= 1.0);
        }
        assert_eq!(Layout::for_size(27).unwrap().food[0].disc.r, 0.5);
        assert_eq!(Layout::for_size(28).unwrap().food[0].disc.r, 1.0);
        assert_eq!(Layout::for_size(16).unwrap().nodes[0].r, 0.5);
        assert_eq!(Layout::for_size(24).unwrap().nodes[0].r, 1.0);
    }

    #[test]
    fn matches_reference_geometry_at_180() {
        let l = Layout::for_size(180).unwrap();
        assert_eq!(l.corner_radius, 22.0);
        assert_eq!((l.plate.cx, l.plate.cy), (90.0, 90.0));
        assert!((l.plate.r - 51.428_57).abs() < 1e-3);
        assert_eq!(l.plate_stroke, 2.0);
        assert_eq!(l.food_radius, 12.0);
        assert_eq!(l.food[0].disc, Circle { cx: 70.0, cy: 73.0, r: 6.0 });
        assert_eq!(l.food[1].disc, Circle { cx: 107.0, cy: 78.0, r: 6.0 });
        assert_eq!(l.food[2].disc, Circle { cx: 90.0, cy: 107.0, r: 6.0 });
        assert_eq!(l.node_size, 15.0);
        assert_eq!(l.nodes[0], Circle { cx: 150.0, cy: 30.0, r: 7.0 });
        assert_eq!(l.nodes[1], Circle { cx: 158.0, cy: 45.0, r: 7.0 });
        assert_eq!(l.nodes[2], Circle { cx: 135.0, cy: 22.0, r: 7.0 });
        assert_eq!(l.connector_width, 1.0);
        assert_eq!(l.badge_anchor(Corner::BottomLeft), (22.0, 135.0));
        assert_eq!(l.badge_anchor(Corner::BottomRight), (158.0, 135.0));
    }

    #[test]
    fn radii_scale_linearly() {
        let base = Layout::for_size(1024).unwrap();
        for &(_, size) in ICON_SIZES.iter() {
            let l = Layout::for_size(size).unwrap();
            let k = size as f32 / 1024.0;
            assert!((l.plate.r - base.plate.r * k).abs() <= 1.0, "plate at {}", size);
            assert!((l.food_radius - base.food_radius * k).abs() <= 1.0, "food at {}", size);
            assert!((l.node_size - base.node_size * k).abs() <= 1.0, "node at {}", size);
        }
    }

    #[test]
    fn shapes_stay_inside_canvas() {
        for &(_, size) in ICON_SIZES.iter() {
            let l = Layout::for_size(size).unwrap();
            let s = size as f32;
            for c in l.all_circles() {
                assert!(c.left() >= 0.0 && c.top() >= 0.0, "{:?} at {}", c, size);
                assert!(c.right() <= s && c.bottom() <= s, "{:?} at {}", c, size);
            }
        }
    }
}
