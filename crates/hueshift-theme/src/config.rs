//! Manager configuration.
//!
//! Every field has a default matching the stock site setup, so a config file
//! only needs to name what it changes:
//!
//! ```yaml
//! accent_key: brandColor
//! default_mode: auto
//! offsets:
//!   dark: -20
//! ```

use std::path::Path;

use hueshift_color::{Color, PaletteOffsets, DEFAULT_ACCENT};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ThemeError};
use crate::mode::ThemeMode;

/// Names of the four custom properties the palette is written to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteProperties {
    pub primary: String,
    pub primary_dark: String,
    pub primary_light: String,
    pub primary_lighter: String,
}

impl Default for PaletteProperties {
    fn default() -> Self {
        Self {
            primary: "--primary".into(),
            primary_dark: "--primary-dark".into(),
            primary_light: "--primary-light".into(),
            primary_lighter: "--primary-lighter".into(),
        }
    }
}

impl PaletteProperties {
    /// The property names in palette order: primary, dark, light, lighter.
    pub fn names(&self) -> [&str; 4] {
        [
            &self.primary,
            &self.primary_dark,
            &self.primary_light,
            &self.primary_lighter,
        ]
    }
}

/// Configuration for a [`ThemeStateManager`](crate::ThemeStateManager).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Store key holding the raw theme mode.
    pub mode_key: String,
    /// Store key holding the accent color.
    pub accent_key: String,
    /// Mode used when nothing usable is persisted.
    pub default_mode: ThemeMode,
    /// Accent used when nothing usable is persisted.
    pub default_accent: Color,
    /// Lightness shifts for the derived palette.
    pub offsets: PaletteOffsets,
    /// Attribute receiving the resolved mode.
    pub mode_attribute: String,
    /// Custom properties receiving the palette.
    pub properties: PaletteProperties,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            mode_key: "themeMode".into(),
            accent_key: "primaryColor".into(),
            default_mode: ThemeMode::Light,
            default_accent: DEFAULT_ACCENT,
            offsets: PaletteOffsets::default(),
            mode_attribute: "data-theme".into(),
            properties: PaletteProperties::default(),
        }
    }
}

impl ThemeConfig {
    /// Parses a config from YAML and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::Config`] for malformed YAML or invalid values and
    /// [`ThemeError::Color`] for a malformed `default_accent`.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        if let Some(accent) = raw_accent(yaml) {
            Color::parse(&accent)?;
        }
        let config: ThemeConfig =
            serde_yaml::from_str(yaml).map_err(|e| ThemeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ThemeError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// Checks that keys and names are usable.
    pub fn validate(&self) -> Result<()> {
        if self.mode_key.is_empty() || self.accent_key.is_empty() {
            return Err(ThemeError::Config("storage keys must not be empty".into()));
        }
        if self.mode_key == self.accent_key {
            return Err(ThemeError::Config(format!(
                "mode_key and accent_key must differ (both '{}')",
                self.mode_key
            )));
        }
        if self.mode_attribute.is_empty() {
            return Err(ThemeError::Config("mode_attribute must not be empty".into()));
        }
        let names = self.properties.names();
        for (i, name) in names.iter().enumerate() {
            if !name.starts_with("--") {
                return Err(ThemeError::Config(format!(
                    "custom property '{}' must start with '--'",
                    name
                )));
            }
            if names[..i].contains(name) {
                return Err(ThemeError::Config(format!(
                    "custom property '{}' is used twice",
                    name
                )));
            }
        }
        let offsets = [self.offsets.dark, self.offsets.light, self.offsets.lighter];
        if offsets.iter().any(|o| !o.is_finite()) {
            return Err(ThemeError::Config("palette offsets must be finite".into()));
        }
        Ok(())
    }
}

/// Pulls the raw `default_accent` scalar out of a YAML document.
fn raw_accent(yaml: &str) -> Option<String> {
    let doc: serde_yaml::Value = serde_yaml::from_str(yaml).ok()?;
    doc.get("default_accent")?.as_str().map(str::to_string)
}
