/// Straight (non-premultiplied) RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba(r, g, b, 255)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Rgba,
    pub accent: Rgba,
    pub highlight: Rgba,
    pub white: Rgba,
    pub outline_dark: Rgba,
    pub amber: Rgba,
}

pub const PALETTE: Palette = Palette {
    background: Rgba::opaque(74, 144, 226),
    accent: Rgba::opaque(255, 107, 107),
    highlight: Rgba::opaque(138, 201, 38),
    white: Rgba::opaque(255, 255, 255),
    outline_dark: Rgba::opaque(45, 90, 150),
    amber: Rgba::opaque(255, 193, 7),
};
