//! Hex color parsing for solid background fills

use crate::error::{PixeliftError, Result};
use serde::{Deserialize, Serialize};

/// A solid RGB fill color with 8-bit components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRgb {
    /// Red component
    pub r: u8,
    /// Green component
    pub g: u8,
    /// Blue component
    pub b: u8,
}

impl ColorRgb {
    /// Create a color from its components
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Opaque white, the conventional default background fill
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Components as an array in RGB order
    #[must_use]
    pub const fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl std::fmt::Display for ColorRgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Parse a `RRGGBB` hex color string, with an optional leading `#`.
///
/// The remaining string must be exactly 6 hex digits; anything else is a
/// [`PixeliftError::InvalidColorFormat`] input error. The white default used
/// when no color is supplied is a caller policy and is not applied here.
///
/// # Errors
///
/// Returns [`PixeliftError::InvalidColorFormat`] for wrong length or
/// non-hexadecimal characters.
pub fn parse_hex_color(input: &str) -> Result<ColorRgb> {
    let hex = input.strip_prefix('#').unwrap_or(input);

    if hex.len() != 6 {
        return Err(PixeliftError::invalid_color(format!(
            "expected 6 hex digits, got {} in '{}'",
            hex.len(),
            input
        )));
    }

    // from_str_radix tolerates a leading '+', so digits are checked up front
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(PixeliftError::invalid_color(format!(
            "'{}' contains non-hexadecimal characters",
            input
        )));
    }

    let component = |range: std::ops::Range<usize>| -> Result<u8> {
        let group = hex.get(range).ok_or_else(|| {
            PixeliftError::invalid_color(format!("'{}' is not valid ASCII hex", input))
        })?;
        u8::from_str_radix(group, 16).map_err(|_| {
            PixeliftError::invalid_color(format!("'{}' is not a hex byte in '{}'", group, input))
        })
    };

    Ok(ColorRgb::new(
        component(0..2)?,
        component(2..4)?,
        component(4..6)?,
    ))
}
