//! Minimal built-in stroke font used when no outline font can be loaded.
//!
//! Glyphs are polylines on a 4x6 grid (y down, cap height 6). Lowercase
//! letters are drawn as small capitals with x-height 4 on the same baseline.

use tiny_skia::{LineCap, LineJoin, Path, PathBuilder, Stroke};

type Polyline = &'static [(u8, u8)];

const GRID_W: f32 = 4.0;
const CAP_H: f32 = 6.0;
const X_H: f32 = 4.0;
const ADVANCE: f32 = GRID_W + 1.5;
/// Grid units per em; cap height ends up at 0.75 em.
const UNITS_PER_EM: f32 = 8.0;

const O_RING: Polyline = &[(1, 0), (3, 0), (4, 1), (4, 5), (3, 6), (1, 6), (0, 5), (0, 1), (1, 0)];
const P_BOWL: Polyline = &[(0, 6), (0, 0), (3, 0), (4, 1), (4, 2), (3, 3), (0, 3)];
const TOFU: &[Polyline] = &[&[(0, 0), (4, 0), (4, 6), (0, 6), (0, 0)]];

fn glyph(c: char) -> &'static [Polyline] {
    match c {
        'A' => &[&[(0, 6), (0, 2), (2, 0), (4, 2), (4, 6)], &[(0, 4), (4, 4)]],
        'B' => &[
            &[(0, 0), (0, 6), (3, 6), (4, 5), (4, 4), (3, 3), (0, 3)],
            &[(0, 0), (3, 0), (4, 1), (4, 2), (3, 3)],
        ],
        'C' => &[&[(4, 1), (3, 0), (1, 0), (0, 1), (0, 5), (1, 6), (3, 6), (4, 5)]],
        'D' => &[&[(0, 0), (0, 6), (2, 6), (4, 4), (4, 2), (2, 0), (0, 0)]],
        'E' => &[&[(4, 0), (0, 0), (0, 6), (4, 6)], &[(0, 3), (3, 3)]],
        'F' => &[&[(4, 0), (0, 0), (0, 6)], &[(0, 3), (3, 3)]],
        'G' => &[&[(4, 1), (3, 0), (1, 0), (0, 1), (0, 5), (1, 6), (3, 6), (4, 5), (4, 3), (2, 3)]],
        'H' => &[&[(0, 0), (0, 6)], &[(4, 0), (4, 6)], &[(0, 3), (4, 3)]],
        'I' => &[&[(1, 0), (3, 0)], &[(2, 0), (2, 6)], &[(1, 6), (3, 6)]],
        'J' => &[&[(4, 0), (4, 5), (3, 6), (1, 6), (0, 5)]],
        'K' => &[&[(0, 0), (0, 6)], &[(4, 0), (0, 4)], &[(1, 3), (4, 6)]],
        'L' => &[&[(0, 0), (0, 6), (4, 6)]],
        'M' => &[&[(0, 6), (0, 0), (2, 3), (4, 0), (4, 6)]],
        'N' => &[&[(0, 6), (0, 0), (4, 6), (4, 0)]],
        'O' => &[O_RING],
        'P' => &[P_BOWL],
        'Q' => &[O_RING, &[(2, 4), (4, 6)]],
        'R' => &[P_BOWL, &[(2, 3), (4, 6)]],
        'S' => &[&[
            (4, 1), (3, 0), (1, 0), (0, 1), (0, 2), (1, 3), (3, 3),
            (4, 4), (4, 5), (3, 6), (1, 6), (0, 5),
        ]],
        'T' => &[&[(0, 0), (4, 0)], &[(2, 0), (2, 6)]],
        'U' => &[&[(0, 0), (0, 5), (1, 6), (3, 6), (4, 5), (4, 0)]],
        'V' => &[&[(0, 0), (2, 6), (4, 0)]],
        'W' => &[&[(0, 0), (1, 6), (2, 3), (3, 6), (4, 0)]],
        'X' => &[&[(0, 0), (4, 6)], &[(4, 0), (0, 6)]],
        'Y' => &[&[(0, 0), (2, 3), (4, 0)], &[(2, 3), (2, 6)]],
        'Z' => &[&[(0, 0), (4, 0), (0, 6), (4, 6)]],
        '0' => &[O_RING, &[(3, 1), (1, 5)]],
        '1' => &[&[(1, 1), (2, 0), (2, 6)], &[(1, 6), (3, 6)]],
        '2' => &[&[(0, 1), (1, 0), (3, 0), (4, 1), (4, 2), (0, 6), (4, 6)]],
        '3' => &[
            &[(0, 1), (1, 0), (3, 0), (4, 1), (4, 2), (3, 3), (4, 4), (4, 5), (3, 6), (1, 6), (0, 5)],
            &[(1, 3), (3, 3)],
        ],
        '4' => &[&[(3, 6), (3, 0), (0, 4), (4, 4)]],
        '5' => &[&[(4, 0), (0, 0), (0, 3), (3, 3), (4, 4), (4, 5), (3, 6), (0, 6)]],
        '6' => &[&[(3, 0), (1, 0), (0, 1), (0, 5), (1, 6), (3, 6), (4, 5), (4, 4), (3, 3), (0, 3)]],
        '7' => &[&[(0, 0), (4, 0), (1, 6)]],
        '8' => &[
            &[(1, 0), (3, 0), (4, 1), (4, 2), (3, 3), (1, 3), (0, 2), (0, 1), (1, 0)],
            &[(1, 3), (3, 3), (4, 4), (4, 5), (3, 6), (1, 6), (0, 5), (0, 4), (1, 3)],
        ],
        '9' => &[&[(4, 3), (1, 3), (0, 2), (0, 1), (1, 0), (3, 0), (4, 1), (4, 5), (3, 6), (1, 6)]],
        ' ' => &[],
        _ => TOFU,
    }
}

/// Outline of `text` at `px` pixels per em, origin at the top of the cap
/// height. Returns `None` when the text has no visible strokes.
pub fn text_path(text: &str, px: f32) -> Option<Path> {
    let unit = px / UNITS_PER_EM;
    let mut pb = PathBuilder::new();
    let mut pen_x = 0.0;
    for ch in text.chars() {
        let small = ch.is_lowercase();
        let upper = ch.to_uppercase().next().unwrap_or(ch);
        // Small capitals: squash vertically towards the baseline.
        let (y_scale, y_shift) = if small { (X_H / CAP_H, CAP_H - X_H) } else { (1.0, 0.0) };
        for line in glyph(upper) {
            for (i, &(gx, gy)) in line.iter().enumerate() {
                let x = (pen_x + gx as f32) * unit;
                let y = (y_shift + gy as f32 * y_scale) * unit;
                if i == 0 {
                    pb.move_to(x, y);
                } else {
                    pb.line_to(x, y);
                }
            }
        }
        pen_x += ADVANCE;
    }
    let skeleton = pb.finish()?;
    let stroke = Stroke {
        width: unit * 0.9,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };
    skeleton.stroke(&stroke, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_has_no_path() {
        assert!(text_path("", 20.0).is_none());
        assert!(text_path("   ", 20.0).is_none());
    }

    #[test]
    fn width_grows_with_length() {
        let ai = text_path("AI", 40.0).unwrap().bounds();
        let cal = text_path("Cal", 40.0).unwrap().bounds();
        assert!(cal.width() > ai.width());
        // Cap height is 0.75 em plus the stroke.
        assert!(ai.height() > 29.0 && ai.height() < 36.0, "got {}", ai.height());
    }

    #[test]
    fn lowercase_sits_on_the_baseline() {
        let upper = text_path("C", 40.0).unwrap().bounds();
        let lower = text_path("c", 40.0).unwrap().bounds();
        assert!((upper.bottom() - lower.bottom()).abs() < 0.5);
        assert!(lower.top() > upper.top());
    }
}
