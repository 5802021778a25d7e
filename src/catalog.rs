//! Static piece catalog: seven named shape templates with fixed colours.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Colour with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("invalid hex colour: {0}")]
    InvalidHex(String),
    #[error("invalid rgba() colour: {0}")]
    InvalidRgba(String),
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Composite `self` over an opaque background; the result is opaque.
    pub fn over(self, bg: Self) -> Self {
        let a = u16::from(self.a);
        let mix = |fg: u8, bg: u8| ((u16::from(fg) * a + u16::from(bg) * (255 - a) + 127) / 255) as u8;
        Self::rgb(mix(self.r, bg.r), mix(self.g, bg.g), mix(self.b, bg.b))
    }
}

/// Accepts `#RRGGBB`, `#RGB` and `rgba(r, g, b, a)` with `a` in `0.0..=1.0`.
impl FromStr for Rgba {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(body) = s.strip_prefix("rgba(").and_then(|b| b.strip_suffix(')')) {
            return parse_rgba_body(body).ok_or_else(|| ColorError::InvalidRgba(s.to_string()));
        }
        parse_hex(s).ok_or_else(|| ColorError::InvalidHex(s.to_string()))
    }
}

fn parse_rgba_body(body: &str) -> Option<Rgba> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    let [r, g, b, a] = parts.as_slice() else {
        return None;
    };
    let alpha: f32 = a.parse().ok()?;
    if !(0.0..=1.0).contains(&alpha) {
        return None;
    }
    Some(Rgba {
        r: r.parse().ok()?,
        g: g.parse().ok()?,
        b: b.parse().ok()?,
        a: (alpha * 255.0).round() as u8,
    })
}

fn parse_hex(s: &str) -> Option<Rgba> {
    let s = s.strip_prefix('#').unwrap_or(s);
    if !s.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&s[range], 16).ok();
    match s.len() {
        6 => Some(Rgba::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        3 => Some(Rgba::rgb(channel(0..1)? * 17, channel(1..2)? * 17, channel(2..3)? * 17)),
        _ => None,
    }
}

/// One catalog entry. `mask` rows are top to bottom; non-zero marks an occupied cell.
#[derive(Debug)]
pub struct ShapeTemplate {
    pub name: &'static str,
    pub color: Rgba,
    pub mask: &'static [&'static [u8]],
}

pub const CATALOG: [ShapeTemplate; 7] = [
    ShapeTemplate {
        name: "I",
        color: Rgba::rgb(244, 67, 54),
        mask: &[&[1], &[1], &[1], &[1]],
    },
    ShapeTemplate {
        name: "O",
        color: Rgba::rgb(191, 54, 12),
        mask: &[&[1, 1], &[1, 1]],
    },
    ShapeTemplate {
        name: "T",
        color: Rgba::rgb(0, 150, 136),
        mask: &[&[1, 1, 1], &[0, 1, 0]],
    },
    ShapeTemplate {
        name: "L",
        color: Rgba::rgb(63, 81, 181),
        mask: &[&[1, 1, 1], &[1, 0, 0]],
    },
    ShapeTemplate {
        name: "J",
        color: Rgba::rgb(47, 127, 51),
        mask: &[&[1, 1, 1], &[0, 0, 1]],
    },
    ShapeTemplate {
        name: "Z",
        color: Rgba::rgb(233, 30, 99),
        mask: &[&[1, 1, 0], &[0, 1, 1]],
    },
    ShapeTemplate {
        name: "S",
        color: Rgba::rgb(175, 180, 43),
        mask: &[&[0, 1, 1], &[1, 1, 0]],
    },
];

/// Which part of the catalog random generation draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogRange {
    /// First `N - 1` entries: the last shape never appears. Default play
    /// behaviour.
    #[default]
    Legacy,
    /// All `N` entries.
    Full,
}

impl CatalogRange {
    pub fn count(self) -> usize {
        match self {
            Self::Legacy => CATALOG.len() - 1,
            Self::Full => CATALOG.len(),
        }
    }

    pub fn shapes(self) -> &'static [ShapeTemplate] {
        &CATALOG[..self.count()]
    }
}

impl fmt::Display for CatalogRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy ({} of {} shapes)", self.count(), CATALOG.len()),
            Self::Full => write!(f, "full ({} shapes)", self.count()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shape_has_four_cells_and_rectangular_mask() {
        for shape in &CATALOG {
            let cells: usize = shape.mask.iter().flat_map(|row| row.iter()).filter(|&&v| v != 0).count();
            assert_eq!(cells, 4, "shape {}", shape.name);
            assert!(shape.mask.iter().all(|row| row.len() == shape.mask[0].len()), "shape {}", shape.name);
        }
    }

    #[test]
    fn legacy_range_drops_last_shape() {
        assert_eq!(CatalogRange::Legacy.shapes().len(), 6);
        assert!(CatalogRange::Legacy.shapes().iter().all(|s| s.name != "S"));
        assert_eq!(CatalogRange::Full.shapes().len(), 7);
    }

    #[test]
    fn parses_rgba_literal() {
        let c: Rgba = "rgba(244, 67, 54, 1)".parse().unwrap();
        assert_eq!(c, Rgba::rgb(244, 67, 54));
        let half: Rgba = "rgba(10, 20, 30, 0.5)".parse().unwrap();
        assert_eq!(half.a, 128);
    }

    #[test]
    fn parses_hex() {
        assert_eq!("#98C379".parse::<Rgba>().unwrap(), Rgba::rgb(0x98, 0xC3, 0x79));
        assert_eq!("#FFF".parse::<Rgba>().unwrap(), Rgba::rgb(255, 255, 255));
        assert!(matches!("#12".parse::<Rgba>(), Err(ColorError::InvalidHex(_))));
        assert!(matches!("rgba(1, 2, 3)".parse::<Rgba>(), Err(ColorError::InvalidRgba(_))));
    }

    #[test]
    fn half_alpha_blends_toward_background() {
        let c = Rgba::rgb(200, 0, 100).with_alpha(128).over(Rgba::rgb(0, 0, 0));
        assert_eq!(c, Rgba::rgb(100, 0, 50));
        let opaque = Rgba::rgb(1, 2, 3).over(Rgba::rgb(90, 90, 90));
        assert_eq!(opaque, Rgba::rgb(1, 2, 3));
    }
}
