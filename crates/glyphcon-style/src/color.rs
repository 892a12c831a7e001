#![forbid(unsafe_code)]

//! RGB color values and the fixed SGR palette.
//!
//! ANSI translation only ever matches colors *exactly* against this palette;
//! there is no nearest-color search. Colors that are not palette members
//! simply do not participate in SGR conversion.

/// RGB color (opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rgb {
    /// Red channel (0–255).
    pub r: u8,
    /// Green channel (0–255).
    pub g: u8,
    /// Blue channel (0–255).
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The 8 normal-intensity SGR colors, indexed by ones digit (30–37 / 40–47).
pub const NORMAL_PALETTE: [Rgb; 8] = [
    Rgb::new(0, 0, 0),       // black
    Rgb::new(178, 0, 0),     // red
    Rgb::new(0, 178, 0),     // green
    Rgb::new(178, 178, 0),   // yellow
    Rgb::new(46, 46, 178),   // blue
    Rgb::new(178, 0, 178),   // magenta
    Rgb::new(0, 178, 178),   // cyan
    Rgb::new(182, 182, 182), // white
];

/// The 8 intense ("bright", SGR 1) colors, same index scheme.
pub const INTENSE_PALETTE: [Rgb; 8] = [
    Rgb::new(89, 89, 89),    // bright black
    Rgb::new(255, 0, 0),     // bright red
    Rgb::new(0, 255, 0),     // bright green
    Rgb::new(255, 255, 0),   // bright yellow
    Rgb::new(66, 66, 255),   // bright blue
    Rgb::new(255, 0, 255),   // bright magenta
    Rgb::new(0, 255, 255),   // bright cyan
    Rgb::new(255, 255, 255), // bright white
];

/// Find `color` in the normal palette, returning its index (0–7).
#[must_use]
pub fn normal_index(color: Rgb) -> Option<usize> {
    NORMAL_PALETTE.iter().position(|&c| c == color)
}

/// Find `color` in the intense palette, returning its index (0–7).
#[must_use]
pub fn intense_index(color: Rgb) -> Option<usize> {
    INTENSE_PALETTE.iter().position(|&c| c == color)
}

/// The palette color for a ones-digit index (0–7), honoring intensity.
///
/// Returns `None` for indices outside the palette.
#[must_use]
pub fn color_for_index(index: usize, bright: bool) -> Option<Rgb> {
    if bright {
        INTENSE_PALETTE.get(index).copied()
    } else {
        NORMAL_PALETTE.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_are_disjoint_by_index() {
        for i in 0..8 {
            assert_ne!(NORMAL_PALETTE[i], INTENSE_PALETTE[i], "index {i}");
        }
    }

    #[test]
    fn normal_lookup_round_trips() {
        for (i, &color) in NORMAL_PALETTE.iter().enumerate() {
            assert_eq!(normal_index(color), Some(i));
        }
    }

    #[test]
    fn intense_lookup_round_trips() {
        for (i, &color) in INTENSE_PALETTE.iter().enumerate() {
            assert_eq!(intense_index(color), Some(i));
        }
    }

    #[test]
    fn color_for_index_selects_palette() {
        assert_eq!(color_for_index(1, false), Some(Rgb::new(178, 0, 0)));
        assert_eq!(color_for_index(1, true), Some(Rgb::new(255, 0, 0)));
        assert_eq!(color_for_index(8, false), None);
    }

    #[test]
    fn off_palette_color_matches_nothing() {
        let teal = Rgb::new(0, 128, 128);
        assert_eq!(normal_index(teal), None);
        assert_eq!(intense_index(teal), None);
    }

    #[test]
    fn rgb_display_is_hex() {
        assert_eq!(Rgb::new(255, 0, 10).to_string(), "#ff000a");
    }
}
