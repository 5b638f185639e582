use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use tiny_skia::PathBuilder;

use crate::glyphs;

/// Scanned once per process; scanning system font directories is slow.
static SYSTEM_FONTS: Lazy<fontdb::Database> = Lazy::new(|| {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    debug!("system font database: {} faces", db.len());
    // fontdb maps the generic sans-serif family to "Arial", which most Linux
    // systems do not ship.
    let generic = [fontdb::Family::SansSerif];
    if db.query(&fontdb::Query { families: &generic, ..fontdb::Query::default() }).is_none() {
        let names = db.faces().flat_map(|f| f.families.iter().map(|(n, _)| n.as_str()));
        if let Some(family) = pick_sans_family(names).map(str::to_string) {
            debug!("generic sans-serif family set to '{}'", family);
            db.set_sans_serif_family(family);
        }
    }
    db
});

/// Shortest installed family name that looks like a plain sans face.
fn pick_sans_family<'a>(names: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    names
        .filter(|n| n.contains("Sans") && !n.contains("Mono") && !n.contains("Serif"))
        .min_by_key(|n| n.len())
}

/// What the caller asked for.
#[derive(Debug, Clone)]
pub struct FontSpec {
    pub path: Option<PathBuf>,
    pub family: String,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self { path: None, family: "Helvetica".to_string() }
    }
}

/// Raw font file contents plus the face index inside a collection.
#[derive(Clone)]
pub struct OutlineFont {
    name: String,
    data: Vec<u8>,
    index: u32,
}

impl fmt::Debug for OutlineFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutlineFont")
            .field("name", &self.name)
            .field("index", &self.index)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl OutlineFont {
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>, index: u32) -> Option<Self> {
        // Reject anything ttf-parser cannot read up front.
        ttf_parser::Face::parse(&data, index).ok()?;
        Some(Self { name: name.into(), data, index })
    }

    pub fn from_file(path: &Path) -> Option<Self> {
        let data = match std::fs::read(path) {
            Ok(d) => d,
            Err(e) => {
                warn!("cannot read font {}: {}", path.display(), e);
                return None;
            }
        };
        let font = Self::from_bytes(path.display().to_string(), data, 0);
        if font.is_none() {
            warn!("{} is not a usable TrueType/OpenType font", path.display());
        }
        font
    }

    pub fn from_system(family: &str) -> Option<Self> {
        Self::from_db(&SYSTEM_FONTS, family)
    }

    /// `family`, or the database's generic sans-serif face when it is missing.
    fn from_db(db: &fontdb::Database, family: &str) -> Option<Self> {
        let families = [fontdb::Family::Name(family), fontdb::Family::SansSerif];
        let query = fontdb::Query { families: &families, ..fontdb::Query::default() };
        let id = db.query(&query)?;
        let name = db
            .face(id)
            .and_then(|f| f.families.first().map(|(n, _)| n.clone()))
            .unwrap_or_else(|| family.to_string());
        let (data, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
        Self::from_bytes(name, data, index)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn text_path(&self, text: &str, px: f32) -> Option<tiny_skia::Path> {
        let face = ttf_parser::Face::parse(&self.data, self.index).ok()?;
        let scale = px / face.units_per_em() as f32;
        let ascender = face.ascender() as f32 * scale;
        let mut outline = GlyphOutline { pb: PathBuilder::new(), scale, dx: 0.0, baseline: ascender };
        for ch in text.chars() {
            let Some(gid) = face.glyph_index(ch) else { continue };
            face.outline_glyph(gid, &mut outline);
            outline.dx += face.glyph_hor_advance(gid).unwrap_or(0) as f32 * scale;
        }
        outline.pb.finish()
    }
}

/// Collects glyph outlines into one path, flipping font units (y up) into
/// pixel space (y down) with the ascender line at y = 0.
struct GlyphOutline {
    pb: PathBuilder,
    scale: f32,
    dx: f32,
    baseline: f32,
}

impl GlyphOutline {
    fn pt(&self, x: f32, y: f32) -> (f32, f32) {
        (self.dx + x * self.scale, self.baseline - y * self.scale)
    }
}

impl ttf_parser::OutlineBuilder for GlyphOutline {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.pt(x, y);
        self.pb.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.pt(x, y);
        self.pb.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.pt(x1, y1);
        let (x, y) = self.pt(x, y);
        self.pb.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.pt(x1, y1);
        let (x2, y2) = self.pt(x2, y2);
        let (x, y) = self.pt(x, y);
        self.pb.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.pb.close();
    }
}

#[derive(Debug, Clone)]
pub enum Font {
    Outline(OutlineFont),
    Builtin,
}

impl Font {
    /// Explicit file, then the named system family, then the built-in stroke font.
    /// Never fails; the outcome is logged and available through `describe`.
    pub fn resolve(spec: &FontSpec) -> Self {
        Self::resolve_in(&SYSTEM_FONTS, spec)
    }

    fn resolve_in(db: &fontdb::Database, spec: &FontSpec) -> Self {
        if let Some(path) = &spec.path {
            if let Some(font) = OutlineFont::from_file(path) {
                info!("using font file {}", path.display());
                return Font::Outline(font);
            }
        }
        match OutlineFont::from_db(db, &spec.family) {
            Some(font) => {
                if font.name() != spec.family {
                    warn!("font family '{}' not installed, substituting '{}'", spec.family, font.name());
                } else {
                    info!("using system font '{}'", font.name());
                }
                Font::Outline(font)
            }
            None => {
                warn!("no system font available, falling back to the built-in stroke font");
                Font::Builtin
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Font::Outline(f) => f.name().to_string(),
            Font::Builtin => "built-in".to_string(),
        }
    }

    pub fn text_path(&self, text: &str, px: f32) -> Option<tiny_skia::Path> {
        match self {
            Font::Outline(f) => f.text_path(text, px),
            Font::Builtin => glyphs::text_path(text, px),
        }
    }

    /// Ink bounding box of `text` relative to the text origin; text without
    /// visible glyphs measures as an empty box at the origin.
    pub fn measure(&self, text: &str, px: f32) -> InkBox {
        match self.text_path(text, px) {
            Some(path) => {
                let b = path.bounds();
                InkBox { left: b.left(), top: b.top(), width: b.width(), height: b.height() }
            }
            None => InkBox::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InkBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_font_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.ttf");
        std::fs::write(&bogus, b"not a font").unwrap();
        assert!(OutlineFont::from_file(&bogus).is_none());
        assert!(OutlineFont::from_file(&dir.path().join("missing.ttf")).is_none());
    }

    #[test]
    fn builtin_measure_is_stable() {
        let a = Font::Builtin.measure("AI", 22.0);
        let b = Font::Builtin.measure("AI", 22.0);
        assert_eq!(a, b);
        assert!(a.width > 0.0 && a.height > 0.0);
    }

    #[test]
    fn empty_text_measures_zero() {
        let r = Font::Builtin.measure("", 22.0);
        assert_eq!(r, InkBox::default());
    }

    #[test]
    fn builtin_describes_itself() {
        assert_eq!(Font::Builtin.describe(), "built-in");
    }

    #[test]
    fn empty_database_resolves_to_builtin() {
        let db = fontdb::Database::new();
        assert!(matches!(Font::resolve_in(&db, &FontSpec::default()), Font::Builtin));
        let spec = FontSpec { path: Some(PathBuf::from("/nonexistent/font.ttf")), family: "Inter".into() };
        assert!(matches!(Font::resolve_in(&db, &spec), Font::Builtin));
    }

    #[test]
    fn bad_font_file_falls_through_to_family() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.ttf");
        std::fs::write(&bogus, b"not a font").unwrap();
        let family = "Helvetica".to_string();
        let with_file = Font::resolve(&FontSpec { path: Some(bogus), family: family.clone() });
        let without = Font::resolve(&FontSpec { path: None, family });
        assert_eq!(with_file.describe(), without.describe());
    }

    #[test]
    fn installed_family_is_reported_by_name() {
        let names = SYSTEM_FONTS.faces().flat_map(|f| f.families.iter().map(|(n, _)| n.as_str()));
        let Some(family) = pick_sans_family(names).map(str::to_string) else {
            return;
        };
        let font = Font::resolve(&FontSpec { path: None, family: family.clone() });
        assert_eq!(font.describe(), family);
        assert!(font.measure("AI", 20.0).width > 0.0);
    }

    #[test]
    fn any_installed_sans_face_backs_the_default() {
        let names = SYSTEM_FONTS.faces().flat_map(|f| f.families.iter().map(|(n, _)| n.as_str()));
        if pick_sans_family(names).is_some() {
            assert!(matches!(Font::resolve(&FontSpec::default()), Font::Outline(_)));
        }
    }

    #[test]
    fn sans_family_pick_prefers_plain_faces() {
        let names = ["DejaVu Sans Mono", "DejaVu Serif", "DejaVu Sans Condensed", "DejaVu Sans", "Liberation Serif"];
        assert_eq!(pick_sans_family(names.into_iter()), Some("DejaVu Sans"));
        assert_eq!(pick_sans_family(["Liberation Serif", "Noto Mono"].into_iter()), None);
    }
}
