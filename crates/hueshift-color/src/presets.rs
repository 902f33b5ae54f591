//! Built-in accent presets.

use crate::color::Color;
use crate::hsl::adjust;

/// Lightness shift applied to the second stop of a preset's preview gradient.
pub const PREVIEW_SHADE: f64 = -10.0;

/// A named accent color offered to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccentPreset {
    pub name: &'static str,
    pub description: &'static str,
    pub color: Color,
}

impl AccentPreset {
    /// The two gradient stops used to preview this preset.
    pub fn preview(&self) -> (Color, Color) {
        (self.color, adjust(self.color, PREVIEW_SHADE))
    }
}

const PRESETS: [AccentPreset; 5] = [
    AccentPreset {
        name: "emerald",
        description: "Default theme",
        color: Color::from_rgb(0x10, 0xb9, 0x81),
    },
    AccentPreset {
        name: "sky",
        description: "Fresh and bright",
        color: Color::from_rgb(0x3b, 0x82, 0xf6),
    },
    AccentPreset {
        name: "violet",
        description: "Elegant and mysterious",
        color: Color::from_rgb(0x8b, 0x5c, 0xf6),
    },
    AccentPreset {
        name: "amber",
        description: "Warm and lively",
        color: Color::from_rgb(0xf5, 0x9e, 0x0b),
    },
    AccentPreset {
        name: "rose",
        description: "Soft and romantic",
        color: Color::from_rgb(0xec, 0x48, 0x99),
    },
];

/// The default accent, `#10b981`.
pub const DEFAULT_ACCENT: Color = PRESETS[0].color;

/// All presets, default first.
pub fn presets() -> &'static [AccentPreset] {
    &PRESETS
}

/// Looks up a preset by name, ignoring case.
pub fn preset(name: &str) -> Option<&'static AccentPreset> {
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accent() {
        assert_eq!(DEFAULT_ACCENT.to_string(), "#10b981");
        assert_eq!(presets()[0].name, "emerald");
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(preset("Sky").unwrap().color.to_string(), "#3b82f6");
        assert!(preset("teal").is_none());
    }

    #[test]
    fn test_preview_gradient() {
        let (from, to) = preset("emerald").unwrap().preview();
        assert_eq!(from.to_string(), "#10b981");
        assert_eq!(to.to_string(), "#0c8a60");
    }

    #[test]
    fn test_presets_unique() {
        let mut names: Vec<_> = presets().iter().map(|p| p.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 5);
    }
}
