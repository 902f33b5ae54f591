//! Accent-derived palettes.
//!
//! A [`ThemePalette`] is never stored. It is recomputed from the accent color
//! whenever the accent changes, using a fixed set of [`PaletteOffsets`].

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::hsl::adjust;

/// Lightness shifts, in percentage points, used to derive the palette.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteOffsets {
    /// Shift for the `dark` variant (hover/active states).
    pub dark: f64,
    /// Shift for the `light` variant.
    pub light: f64,
    /// Shift for the `lighter` variant (backgrounds).
    pub lighter: f64,
}

impl Default for PaletteOffsets {
    fn default() -> Self {
        Self {
            dark: -15.0,
            light: 35.0,
            lighter: 40.0,
        }
    }
}

/// The four colors derived from an accent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePalette {
    pub primary: Color,
    pub primary_dark: Color,
    pub primary_light: Color,
    pub primary_lighter: Color,
}

impl ThemePalette {
    /// Derives a palette from `accent` with the default offsets.
    ///
    /// ```rust
    /// use hueshift_color::{Color, ThemePalette};
    ///
    /// let palette = ThemePalette::from_accent(Color::parse("#10b981").unwrap());
    /// assert_eq!(palette.primary_dark.to_string(), "#0a7350");
    /// assert_eq!(palette.primary_lighter.to_string(), "#9ef7d9");
    /// ```
    pub fn from_accent(accent: Color) -> Self {
        Self::derive(accent, &PaletteOffsets::default())
    }

    /// Derives a palette from `accent` with custom offsets.
    pub fn derive(accent: Color, offsets: &PaletteOffsets) -> Self {
        Self {
            primary: accent,
            primary_dark: adjust(accent, offsets.dark),
            primary_light: adjust(accent, offsets.light),
            primary_lighter: adjust(accent, offsets.lighter),
        }
    }

    /// The palette entries in application order: primary, dark, light, lighter.
    pub fn entries(&self) -> [Color; 4] {
        [
            self.primary,
            self.primary_dark,
            self.primary_light,
            self.primary_lighter,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_offsets() {
        let offsets = PaletteOffsets::default();
        assert_eq!(offsets.dark, -15.0);
        assert_eq!(offsets.light, 35.0);
        assert_eq!(offsets.lighter, 40.0);
    }

    #[test]
    fn test_palette_from_sky() {
        let palette = ThemePalette::from_accent(Color::parse("#3b82f6").unwrap());
        assert_eq!(palette.primary.to_string(), "#3b82f6");
        assert_eq!(palette.primary_dark.to_string(), "#0a59da");
        assert_eq!(palette.primary_light.to_string(), "#e6effe");
        assert_eq!(palette.primary_lighter.to_string(), "#fefeff");
    }

    #[test]
    fn test_palette_custom_offsets() {
        let offsets = PaletteOffsets {
            dark: -100.0,
            light: 0.0,
            lighter: 100.0,
        };
        let accent = Color::parse("#f59e0b").unwrap();
        let palette = ThemePalette::derive(accent, &offsets);
        assert_eq!(
            palette.entries(),
            [accent, Color::BLACK, accent, Color::WHITE]
        );
    }

    #[test]
    fn test_offsets_deserialize_partial() {
        let offsets: PaletteOffsets = serde_json::from_str(r#"{"dark": -20}"#).unwrap();
        assert_eq!(offsets.dark, -20.0);
        assert_eq!(offsets.light, 35.0);
    }
}
