//! # hueshift-theme - Theme State with Persisted Settings
//!
//! `hueshift-theme` manages a light/dark/auto theme mode and an accent color:
//! it resolves `Auto` against the host's ambient preference, derives the
//! accent palette, writes the result to a rendering context, and persists
//! both settings through a key/value store.
//!
//! ## Core Concepts
//!
//! - [`ThemeStateManager`]: owns the settings and applies them
//! - [`ThemeMode`] / [`ResolvedMode`]: the selected mode and what is displayed
//! - [`KeyValueStore`]: where settings persist ([`MemoryStore`], [`FileStore`])
//! - [`RenderTarget`]: where presentation state goes ([`CssVariables`])
//! - [`AmbientPreference`]: the host's light/dark signal ([`SystemAmbient`])
//! - [`ThemeConfig`]: keys, defaults and property names
//!
//! ## Quick Start
//!
//! ```rust
//! use hueshift_theme::{CssVariables, ManualAmbient, MemoryStore, ThemeStateManager};
//!
//! let store = MemoryStore::new();
//! let mut manager = ThemeStateManager::new(store, CssVariables::new(), ManualAmbient::light());
//! manager.initialize();
//!
//! manager.set_accent_str("#3b82f6").unwrap();
//! assert_eq!(manager.target().property("--primary-dark"), Some("#0a59da"));
//! ```
//!
//! ## Testing
//!
//! Every collaborator has an in-memory implementation, so behavior can be
//! exercised without a browser, a filesystem or an OS theme:
//!
//! ```rust
//! use hueshift_theme::{
//!     ManualAmbient, MemoryStore, RecordingTarget, ThemeMode, ThemeStateManager,
//! };
//!
//! let tab_a = MemoryStore::new();
//! let tab_b = tab_a.instance();
//!
//! let mut a = ThemeStateManager::new(tab_a, RecordingTarget::new(), ManualAmbient::light());
//! let mut b = ThemeStateManager::new(tab_b, RecordingTarget::new(), ManualAmbient::light());
//! a.initialize();
//! b.initialize();
//!
//! a.set_mode(ThemeMode::Dark);
//! b.sync();
//! assert_eq!(b.target().attribute("data-theme"), Some("dark"));
//! ```

mod ambient;
mod config;
mod error;
mod manager;
mod mode;
mod store;
mod target;

pub use ambient::{AmbientPreference, ManualAmbient, SchemeDetector, SubscriptionId, SystemAmbient};
pub use config::{PaletteProperties, ThemeConfig};
pub use error::{Result, StoreError, ThemeError};
pub use manager::{Persistence, ThemeStateManager};
pub use mode::{resolve_effective_mode, ResolvedMode, ThemeMode};
pub use store::{
    decode_value, encode_value, FileStore, KeyValueStore, MemoryStore, StorageEvent,
    UnavailableStore,
};
pub use target::{CssVariables, RecordingTarget, RenderCall, RenderTarget};

// Color types used throughout the public API.
pub use hueshift_color::{Color, ColorError, PaletteOffsets, ThemePalette};
