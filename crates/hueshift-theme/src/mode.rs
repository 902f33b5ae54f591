//! Theme modes and their resolution.
//!
//! Users pick one of three [`ThemeMode`]s. `Auto` is a preference, not a
//! display state: before anything is drawn it is resolved against the host's
//! ambient light/dark preference into a [`ResolvedMode`].
//!
//! ```rust
//! use hueshift_theme::{resolve_effective_mode, ResolvedMode, ThemeMode};
//!
//! assert_eq!(resolve_effective_mode(ThemeMode::Auto, true), ResolvedMode::Dark);
//! assert_eq!(resolve_effective_mode(ThemeMode::Light, true), ResolvedMode::Light);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ThemeError;

/// The user's selected theme mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Always light.
    #[default]
    Light,
    /// Always dark.
    Dark,
    /// Follow the host's ambient preference.
    Auto,
}

impl ThemeMode {
    /// All modes, in menu order.
    pub const ALL: [ThemeMode; 3] = [ThemeMode::Light, ThemeMode::Dark, ThemeMode::Auto];

    /// The persisted spelling of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::Auto => "auto",
        }
    }

    /// Resolves this mode against the ambient preference.
    pub fn resolve(self, ambient_is_dark: bool) -> ResolvedMode {
        resolve_effective_mode(self, ambient_is_dark)
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = ThemeError;

    /// Parses `light`, `dark` or `auto`, ignoring case and surrounding space.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            "auto" => Ok(ThemeMode::Auto),
            _ => Err(ThemeError::UnknownThemeMode(s.to_string())),
        }
    }
}

/// The concrete mode applied to the rendering context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedMode {
    /// Light background, dark text.
    Light,
    /// Dark background, light text.
    Dark,
}

impl ResolvedMode {
    /// The value written to the display attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolvedMode::Light => "light",
            ResolvedMode::Dark => "dark",
        }
    }

    /// The indicator glyph shown on the mode toggle.
    pub fn icon(&self) -> &'static str {
        match self {
            ResolvedMode::Light => "☀️",
            ResolvedMode::Dark => "🌙",
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, ResolvedMode::Dark)
    }
}

impl fmt::Display for ResolvedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ResolvedMode> for ThemeMode {
    fn from(mode: ResolvedMode) -> Self {
        match mode {
            ResolvedMode::Light => ThemeMode::Light,
            ResolvedMode::Dark => ThemeMode::Dark,
        }
    }
}

/// Resolves `mode` to the state that should actually be displayed.
///
/// `Light` and `Dark` pass through unchanged; `Auto` becomes `Dark` when the
/// ambient preference is dark and `Light` otherwise.
pub fn resolve_effective_mode(mode: ThemeMode, ambient_is_dark: bool) -> ResolvedMode {
    match mode {
        ThemeMode::Light => ResolvedMode::Light,
        ThemeMode::Dark => ResolvedMode::Dark,
        ThemeMode::Auto if ambient_is_dark => ResolvedMode::Dark,
        ThemeMode::Auto => ResolvedMode::Light,
    }
}
