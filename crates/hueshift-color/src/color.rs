//! The [`Color`] value type.
//!
//! A `Color` is an sRGB triplet with 8 bits per channel. Its canonical text
//! form is a lower-case, zero-padded `#rrggbb` string, which is also what it
//! serializes to. Parsing accepts either case and an optional leading `#`:
//!
//! ```rust
//! use hueshift_color::Color;
//!
//! let accent: Color = "#10B981".parse().unwrap();
//! assert_eq!(accent.to_string(), "#10b981");
//! assert_eq!(accent.rgb(), (0x10, 0xb9, 0x81));
//!
//! assert!("#fff".parse::<Color>().is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ColorError, Result};
use crate::hsl::{self, Hsl};

/// An sRGB color with three 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
}

impl Color {
    /// Pure black, `#000000`.
    pub const BLACK: Color = Color::from_rgb(0, 0, 0);
    /// Pure white, `#ffffff`.
    pub const WHITE: Color = Color::from_rgb(255, 255, 255);

    /// Creates a color from its channel values.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a 6-digit hex color, with or without the leading `#`.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidColorFormat`] for anything other than
    /// exactly six hex digits. Shorthand (`#fff`) and alpha (`#rrggbbaa`)
    /// forms are rejected.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if hex.len() != 6 {
            return Err(ColorError::invalid(input, "expected 6 hex digits"));
        }
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::invalid(input, "non-hex character"));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| ColorError::invalid(input, "non-hex character"))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Returns the `(r, g, b)` channel values.
    pub fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Sum of the three channels. Grows with lightness for a fixed hue.
    pub fn channel_sum(&self) -> u16 {
        self.r as u16 + self.g as u16 + self.b as u16
    }

    /// Returns the lower-case `#rrggbb` form.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Converts to hue/saturation/lightness.
    pub fn to_hsl(&self) -> Hsl {
        Hsl::from_color(*self)
    }

    /// Shifts lightness by `percent` points. See [`adjust`](crate::adjust).
    pub fn adjust(&self, percent: f64) -> Color {
        hsl::adjust(*self, percent)
    }

    /// Raises lightness by `percent` points.
    pub fn lighten(&self, percent: f64) -> Color {
        self.adjust(percent.abs())
    }

    /// Lowers lightness by `percent` points.
    pub fn darken(&self, percent: f64) -> Color {
        self.adjust(-percent.abs())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Color {
    type Error = ColorError;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::from_rgb(r, g, b)
    }
}
