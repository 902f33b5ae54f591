//! # hueshift-color - Accent Colors and Lightness Tints
//!
//! `hueshift-color` holds the color math behind hueshift's theming: a strict
//! sRGB [`Color`] type, HSL conversion, and the lightness-only [`adjust`]
//! operation used to derive tints and shades of an accent.
//!
//! ## Core Concepts
//!
//! - [`Color`]: 8-bit sRGB triplet, canonically `#rrggbb` (lower-case)
//! - [`Hsl`]: hue/saturation/lightness view of a color
//! - [`adjust`]: shift lightness by a signed percentage, keeping hue and saturation
//! - [`ThemePalette`]: the four colors derived from an accent
//! - [`presets`]: the built-in accent choices
//!
//! ## Quick Start
//!
//! ```rust
//! use hueshift_color::{adjust, Color, ThemePalette};
//!
//! let accent = Color::parse("#3b82f6").unwrap();
//!
//! // Darken for hover states, lighten for washes.
//! let hover = adjust(accent, -15.0);
//! assert_eq!(hover.to_string(), "#0a59da");
//!
//! let palette = ThemePalette::from_accent(accent);
//! assert_eq!(palette.primary, accent);
//! assert_eq!(palette.primary_dark, hover);
//! ```
//!
//! ## Error Handling
//!
//! Malformed input never produces a color. [`Color::parse`] returns
//! [`ColorError::InvalidColorFormat`] for anything that is not six hex digits,
//! and every operation on a parsed `Color` is total.

mod color;
mod error;
mod hsl;
mod palette;
mod presets;
pub mod terminal;

pub use color::Color;
pub use error::{ColorError, Result};
pub use hsl::{adjust, Hsl};
pub use palette::{PaletteOffsets, ThemePalette};
pub use presets::{preset, presets, AccentPreset, DEFAULT_ACCENT, PREVIEW_SHADE};
