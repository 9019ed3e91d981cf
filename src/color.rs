//! Color handling for flow graph edges.
//!
//! Countries are assigned colors by position in an ordered palette; the
//! institution→author half of each flow reuses the country color blended
//! halfway toward white so both hops read as one ribbon.

use crate::error::{BiblioflowError, Result};

/// Default dashboard palette (dark blue through orange).
pub const DEFAULT_PALETTE: &[&str] = &[
    "#003f5b", "#2b4b7d", "#5f5195", "#98509d", "#cc4c91", "#f25375", "#ff6f4e", "#ff9913",
];

/// An RGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse a `#rrggbb` hex string.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(BiblioflowError::Color(format!(
                "expected #rrggbb, got {:?}",
                hex
            )));
        }
        let channel = |range: std::ops::Range<usize>| -> Result<u8> {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|e| BiblioflowError::Color(format!("bad hex digits in {:?}: {}", hex, e)))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Blend this color toward white by `factor` (0.0 = unchanged, 1.0 = white).
    ///
    /// Each channel is interpolated independently; `factor = 0.5` averages the
    /// channel with 255.
    pub fn lighten(self, factor: f64) -> Self {
        let blend = |c: u8| -> u8 {
            let v = f64::from(c) + (255.0 - f64::from(c)) * factor;
            v.round().clamp(0.0, 255.0) as u8
        };
        Self {
            r: blend(self.r),
            g: blend(self.g),
            b: blend(self.b),
        }
    }

    /// CSS-style `rgb(r, g, b)` string as consumed by the renderer.
    pub fn to_rgb_string(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// An ordered list of colors, one per distinct country.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Build a palette from hex strings, validating every entry up front.
    pub fn from_hex(hex_colors: &[&str]) -> Result<Self> {
        let colors = hex_colors
            .iter()
            .map(|h| Rgb::from_hex(h))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { colors })
    }

    /// The default dashboard palette.
    pub fn dashboard() -> Self {
        // DEFAULT_PALETTE entries are all well-formed hex literals
        Self::from_hex(DEFAULT_PALETTE).unwrap_or(Self { colors: Vec::new() })
    }

    /// Number of colors available.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// True when the palette supplies no colors.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `index`, or `None` past the end. Callers validate the distinct
    /// country count against [`Palette::len`] before assigning positions.
    pub fn color_at(&self, index: usize) -> Option<Rgb> {
        self.colors.get(index).copied()
    }
}
