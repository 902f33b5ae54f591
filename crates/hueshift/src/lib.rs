//! # hueshift - Accent Palettes and Theme Settings
//!
//! One dependency for the whole stack:
//!
//! - [`color`]: hex colors, HSL lightness shifts, accent palettes and presets
//! - [`theme`]: light/dark/auto theme state with persisted settings
//! - [`cli`]: the `hueshift` command-line front end
//!
//! The most used types are re-exported at the root.
//!
//! ```rust
//! use hueshift::{adjust, Color, ThemePalette};
//!
//! let accent = Color::parse("#10b981").unwrap();
//! assert_eq!(adjust(accent, 35.0).to_hex(), "#87f5d0");
//! assert_eq!(ThemePalette::from_accent(accent).primary_dark.to_hex(), "#0a7350");
//! ```

pub use hueshift_color as color;
pub use hueshift_theme as theme;

pub use hueshift_color::{
    adjust, preset, presets, AccentPreset, Color, ColorError, Hsl, PaletteOffsets, ThemePalette,
    DEFAULT_ACCENT,
};
pub use hueshift_theme::{
    resolve_effective_mode, AmbientPreference, CssVariables, FileStore, KeyValueStore,
    ManualAmbient, MemoryStore, Persistence, RenderTarget, ResolvedMode, StoreError,
    SystemAmbient, ThemeConfig, ThemeError, ThemeMode, ThemeStateManager,
};

pub mod cli;
