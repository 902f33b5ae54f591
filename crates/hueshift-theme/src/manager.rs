//! The theme state manager.
//!
//! [`ThemeStateManager`] owns the selected [`ThemeMode`] and accent
//! [`Color`] for the lifetime of an application instance. Its collaborators
//! are passed in at construction:
//!
//! - a [`KeyValueStore`] where both settings persist
//! - a [`RenderTarget`] that receives the resolved mode and palette
//! - an [`AmbientPreference`] used to resolve `Auto`
//!
//! ## Failure Semantics
//!
//! Storage is best effort. Every store failure is logged at `warn` and
//! absorbed: reads fall back to the configured defaults and writes report
//! [`Persistence::Skipped`]. Applying a valid mode or color to the render
//! target always succeeds, with or without storage.
//!
//! ## Events
//!
//! The manager is single-threaded and event driven. Ambient changes and
//! writes made by other instances queue up until the host calls
//! [`sync`](ThemeStateManager::sync), which applies them in arrival order.
//! Hosts that deliver events themselves can call
//! [`handle_ambient_change`](ThemeStateManager::handle_ambient_change) and
//! [`handle_storage_event`](ThemeStateManager::handle_storage_event) directly.
//!
//! ```rust
//! use hueshift_theme::{
//!     ManualAmbient, MemoryStore, RecordingTarget, ThemeMode, ThemeStateManager,
//! };
//!
//! let mut manager =
//!     ThemeStateManager::new(MemoryStore::new(), RecordingTarget::new(), ManualAmbient::dark());
//! manager.initialize();
//! assert_eq!(manager.target().attribute("data-theme"), Some("light"));
//!
//! manager.set_mode(ThemeMode::Auto);
//! assert_eq!(manager.target().attribute("data-theme"), Some("dark"));
//! ```

use std::sync::mpsc::{self, Receiver};

use hueshift_color::{Color, ThemePalette};

use crate::ambient::{AmbientPreference, SubscriptionId};
use crate::config::ThemeConfig;
use crate::error::Result;
use crate::mode::{resolve_effective_mode, ResolvedMode, ThemeMode};
use crate::store::{decode_value, encode_value, KeyValueStore, StorageEvent};
use crate::target::RenderTarget;

/// Whether a settings change reached the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    /// The new value was written.
    Saved,
    /// The store failed; the change is applied but will not survive a reload.
    Skipped,
}

impl Persistence {
    pub fn is_saved(&self) -> bool {
        matches!(self, Persistence::Saved)
    }
}

/// Owns theme mode and accent color, applies them, and keeps them persisted.
pub struct ThemeStateManager<S, R, A>
where
    S: KeyValueStore,
    R: RenderTarget,
    A: AmbientPreference,
{
    store: S,
    target: R,
    ambient: A,
    config: ThemeConfig,
    mode: ThemeMode,
    resolved: ResolvedMode,
    accent: Color,
    palette: ThemePalette,
    ambient_rx: Receiver<bool>,
    subscription: SubscriptionId,
}

impl<S, R, A> ThemeStateManager<S, R, A>
where
    S: KeyValueStore,
    R: RenderTarget,
    A: AmbientPreference,
{
    /// Creates a manager with the default [`ThemeConfig`].
    ///
    /// Nothing is read or applied until [`initialize`](Self::initialize).
    pub fn new(store: S, target: R, ambient: A) -> Self {
        Self::build(store, target, ambient, ThemeConfig::default())
    }

    /// Creates a manager with a custom config.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::Config`](crate::ThemeError::Config) if the config
    /// does not validate.
    pub fn with_config(store: S, target: R, ambient: A, config: ThemeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(store, target, ambient, config))
    }

    fn build(store: S, target: R, ambient: A, config: ThemeConfig) -> Self {
        let (tx, ambient_rx) = mpsc::channel();
        let subscription = ambient.subscribe(tx);
        let mode = config.default_mode;
        let accent = config.default_accent;

        Self {
            resolved: resolve_effective_mode(mode, ambient.prefers_dark()),
            palette: ThemePalette::derive(accent, &config.offsets),
            store,
            target,
            ambient,
            config,
            mode,
            accent,
            ambient_rx,
            subscription,
        }
    }

    // ========== Lifecycle ==========

    /// Loads persisted settings and applies them.
    ///
    /// Missing, unreadable or invalid values fall back to the configured
    /// defaults. Calling this again re-reads the store and re-applies.
    pub fn initialize(&mut self) {
        self.mode = self.load_mode();
        self.accent = self.load_accent();
        tracing::debug!(mode = %self.mode, accent = %self.accent, "initializing theme");

        self.apply_mode(self.ambient.prefers_dark());
        self.apply_accent();
    }

    // ========== Mode ==========

    /// Selects a mode, applies its resolution, and persists the raw mode.
    ///
    /// `Auto` is persisted as `auto`, not as whatever it resolved to.
    pub fn set_mode(&mut self, mode: ThemeMode) -> Persistence {
        self.mode = mode;
        self.apply_mode(self.ambient.prefers_dark());
        self.persist(&self.config.mode_key, mode.as_str())
    }

    /// Parses and selects a mode.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::UnknownThemeMode`](crate::ThemeError::UnknownThemeMode)
    /// without changing any state if `mode` is not `light`, `dark` or `auto`.
    pub fn set_mode_str(&mut self, mode: &str) -> Result<Persistence> {
        let mode: ThemeMode = mode.parse()?;
        Ok(self.set_mode(mode))
    }

    /// The selected mode, possibly `Auto`.
    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    /// The mode currently applied to the render target.
    pub fn resolved_mode(&self) -> ResolvedMode {
        self.resolved
    }

    // ========== Accent ==========

    /// Selects an accent, applies the derived palette, and persists the accent.
    pub fn set_accent_color(&mut self, color: Color) -> Persistence {
        self.accent = color;
        self.apply_accent();
        self.persist(&self.config.accent_key, &color.to_hex())
    }

    /// Parses and selects an accent.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::Color`](crate::ThemeError::Color) without changing
    /// any state if `color` is not a `#rrggbb` hex color.
    pub fn set_accent_str(&mut self, color: &str) -> Result<Persistence> {
        let color = Color::parse(color)?;
        Ok(self.set_accent_color(color))
    }

    pub fn accent(&self) -> Color {
        self.accent
    }

    /// The palette derived from the current accent.
    pub fn palette(&self) -> &ThemePalette {
        &self.palette
    }

    // ========== Events ==========

    /// Reacts to an ambient preference change.
    ///
    /// Only `Auto` is affected; explicit `Light`/`Dark` selections stay put.
    pub fn handle_ambient_change(&mut self, is_dark: bool) {
        tracing::trace!(dark = is_dark, mode = %self.mode, "ambient preference changed");
        if self.mode == ThemeMode::Auto {
            self.apply_mode(is_dark);
        }
    }

    /// Applies a setting written by another instance.
    ///
    /// A removed value restores the default. The value is applied but not
    /// written back, since it is already in the store. Returns `true` if the
    /// event concerned one of this manager's keys.
    pub fn handle_storage_event(&mut self, event: &StorageEvent) -> bool {
        if event.key == self.config.mode_key {
            self.mode = match &event.new_value {
                Some(raw) => self.decode_mode(raw),
                None => self.config.default_mode,
            };
            tracing::debug!(mode = %self.mode, "mode changed by another instance");
            self.apply_mode(self.ambient.prefers_dark());
            true
        } else if event.key == self.config.accent_key {
            self.accent = match &event.new_value {
                Some(raw) => self.decode_accent(raw),
                None => self.config.default_accent,
            };
            tracing::debug!(accent = %self.accent, "accent changed by another instance");
            self.apply_accent();
            true
        } else {
            tracing::debug!(key = %event.key, "ignoring unrelated storage event");
            false
        }
    }

    /// Processes queued ambient notifications, then storage events.
    ///
    /// Returns the number of events handled.
    pub fn sync(&mut self) -> usize {
        let ambient: Vec<bool> = self.ambient_rx.try_iter().collect();
        for is_dark in &ambient {
            self.handle_ambient_change(*is_dark);
        }

        let events = self.store.drain_events();
        for event in &events {
            self.handle_storage_event(event);
        }

        ambient.len() + events.len()
    }

    // ========== Collaborators ==========

    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn target(&self) -> &R {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut R {
        &mut self.target
    }

    pub fn ambient(&self) -> &A {
        &self.ambient
    }

    // ========== Internals ==========

    fn apply_mode(&mut self, ambient_is_dark: bool) {
        self.resolved = resolve_effective_mode(self.mode, ambient_is_dark);
        tracing::debug!(mode = %self.mode, resolved = %self.resolved, "applying theme mode");
        self.target
            .set_attribute(&self.config.mode_attribute, self.resolved.as_str());
    }

    fn apply_accent(&mut self) {
        self.palette = ThemePalette::derive(self.accent, &self.config.offsets);
        tracing::debug!(accent = %self.accent, "applying accent palette");
        for (name, color) in self
            .config
            .properties
            .names()
            .into_iter()
            .zip(self.palette.entries())
        {
            self.target.set_property(name, &color.to_hex());
        }
    }

    fn persist(&self, key: &str, value: &str) -> Persistence {
        match self.store.set(key, &encode_value(value)) {
            Ok(()) => Persistence::Saved,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to persist theme setting");
                Persistence::Skipped
            }
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value.map(|raw| decode_value(&raw)),
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read theme setting, using default");
                None
            }
        }
    }

    fn load_mode(&self) -> ThemeMode {
        match self.read(&self.config.mode_key) {
            Some(value) => self.parse_mode(&value),
            None => self.config.default_mode,
        }
    }

    fn load_accent(&self) -> Color {
        match self.read(&self.config.accent_key) {
            Some(value) => self.parse_accent(&value),
            None => self.config.default_accent,
        }
    }

    fn decode_mode(&self, raw: &str) -> ThemeMode {
        self.parse_mode(&decode_value(raw))
    }

    fn decode_accent(&self, raw: &str) -> Color {
        self.parse_accent(&decode_value(raw))
    }

    fn parse_mode(&self, value: &str) -> ThemeMode {
        value.parse().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "stored theme mode is invalid, using default");
            self.config.default_mode
        })
    }

    fn parse_accent(&self, value: &str) -> Color {
        Color::parse(value).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "stored accent color is invalid, using default");
            self.config.default_accent
        })
    }
}

impl<S, R, A> Drop for ThemeStateManager<S, R, A>
where
    S: KeyValueStore,
    R: RenderTarget,
    A: AmbientPreference,
{
    fn drop(&mut self) {
        self.ambient.unsubscribe(self.subscription);
    }
}

impl<S, R, A> std::fmt::Debug for ThemeStateManager<S, R, A>
where
    S: KeyValueStore,
    R: RenderTarget,
    A: AmbientPreference,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeStateManager")
            .field("mode", &self.mode)
            .field("resolved", &self.resolved)
            .field("accent", &self.accent)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ambient::ManualAmbient;
    use crate::store::{MemoryStore, UnavailableStore};
    use crate::target::{RecordingTarget, RenderCall};
    use crate::ThemeError;

    type TestManager = ThemeStateManager<MemoryStore, RecordingTarget, ManualAmbient>;

    fn manager_with(store: MemoryStore, ambient: ManualAmbient) -> TestManager {
        ThemeStateManager::new(store, RecordingTarget::new(), ambient)
    }

    #[test]
    fn test_initialize_defaults_on_empty_store() {
        let mut m = manager_with(MemoryStore::new(), ManualAmbient::dark());
        m.initialize();

        assert_eq!(m.mode(), ThemeMode::Light);
        assert_eq!(m.resolved_mode(), ResolvedMode::Light);
        assert_eq!(m.accent().to_string(), "#10b981");
        assert_eq!(m.target().attribute("data-theme"), Some("light"));
        assert_eq!(m.target().property("--primary"), Some("#10b981"));
        assert_eq!(m.target().property("--primary-dark"), Some("#0a7350"));
        assert_eq!(m.target().property("--primary-light"), Some("#87f5d0"));
        assert_eq!(m.target().property("--primary-lighter"), Some("#9ef7d9"));
        assert!(m.store().is_empty(), "initialize must not write");
    }

    #[test]
    fn test_initialize_write_order() {
        let mut m = manager_with(MemoryStore::new(), ManualAmbient::light());
        m.initialize();

        let names: Vec<&str> = m
            .target()
            .calls()
            .iter()
            .map(|c| match c {
                RenderCall::Attribute { name, .. } | RenderCall::Property { name, .. } => {
                    name.as_str()
                }
            })
            .collect();
        assert_eq!(
            names,
            ["data-theme", "--primary", "--primary-dark", "--primary-light", "--primary-lighter"]
        );
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let store = MemoryStore::with_values([("themeMode", "\"dark\"")]);
        let mut m = manager_with(store, ManualAmbient::light());
        m.initialize();
        let first: Vec<RenderCall> = m.target().calls().to_vec();

        m.target_mut().clear();
        m.initialize();
        assert_eq!(m.target().calls(), first.as_slice());
    }

    #[test]
    fn test_initialize_reads_encoded_and_raw_values() {
        let store = MemoryStore::with_values([
            ("themeMode", "\"auto\""),
            ("primaryColor", "#F59E0B"),
        ]);
        let mut m = manager_with(store, ManualAmbient::dark());
        m.initialize();

        assert_eq!(m.mode(), ThemeMode::Auto);
        assert_eq!(m.resolved_mode(), ResolvedMode::Dark);
        assert_eq!(m.accent().to_string(), "#f59e0b");
    }

    #[test]
    fn test_initialize_invalid_stored_values_fall_back() {
        let store = MemoryStore::with_values([
            ("themeMode", "\"sepia\""),
            ("primaryColor", "\"blue\""),
        ]);
        let mut m = manager_with(store, ManualAmbient::light());
        m.initialize();

        assert_eq!(m.mode(), ThemeMode::Light);
        assert_eq!(m.accent().to_string(), "#10b981");
    }

    #[test]
    fn test_set_mode_persists_raw_auto() {
        let mut m = manager_with(MemoryStore::new(), ManualAmbient::dark());
        m.initialize();

        assert_eq!(m.set_mode(ThemeMode::Auto), Persistence::Saved);
        assert_eq!(m.resolved_mode(), ResolvedMode::Dark);
        assert_eq!(m.target().attribute("data-theme"), Some("dark"));
        assert_eq!(
            m.store().get("themeMode").unwrap().as_deref(),
            Some("\"auto\"")
        );
    }

    #[test]
    fn test_set_mode_str_rejects_unknown() {
        let mut m = manager_with(MemoryStore::new(), ManualAmbient::light());
        m.initialize();
        let calls_before = m.target().calls().len();

        let err = m.set_mode_str("midnight").unwrap_err();
        assert!(matches!(err, ThemeError::UnknownThemeMode(_)));
        assert_eq!(m.mode(), ThemeMode::Light);
        assert_eq!(m.target().calls().len(), calls_before);
        assert!(m.store().is_empty());

        assert_eq!(m.set_mode_str("DARK").unwrap(), Persistence::Saved);
        assert_eq!(m.mode(), ThemeMode::Dark);
    }

    #[test]
    fn test_set_accent_updates_palette_and_store() {
        let mut m = manager_with(MemoryStore::new(), ManualAmbient::light());
        m.initialize();

        let accent = Color::parse("#3b82f6").unwrap();
        assert!(m.set_accent_color(accent).is_saved());

        assert_eq!(m.palette().primary_dark.to_string(), "#0a59da");
        assert_eq!(m.target().property("--primary"), Some("#3b82f6"));
        assert_eq!(m.target().property("--primary-lighter"), Some("#fefeff"));
        assert_eq!(
            m.store().get("primaryColor").unwrap().as_deref(),
            Some("\"#3b82f6\"")
        );
    }

    #[test]
    fn test_set_accent_str_rejects_malformed() {
        let mut m = manager_with(MemoryStore::new(), ManualAmbient::light());
        m.initialize();

        let err = m.set_accent_str("#12345").unwrap_err();
        assert!(matches!(err, ThemeError::Color(_)));
        assert_eq!(m.accent().to_string(), "#10b981");
        assert!(m.store().is_empty());
    }

    #[test]
    fn test_last_accent_wins() {
        let mut m = manager_with(MemoryStore::new(), ManualAmbient::light());
        m.initialize();

        m.set_accent_str("#8b5cf6").unwrap();
        m.set_accent_str("#ec4899").unwrap();

        assert_eq!(m.target().property("--primary"), Some("#ec4899"));
        assert_eq!(
            m.store().get("primaryColor").unwrap().as_deref(),
            Some("\"#ec4899\"")
        );
    }

    #[test]
    fn test_unavailable_store_still_applies() {
        let mut m = ThemeStateManager::new(
            UnavailableStore::new(),
            RecordingTarget::new(),
            ManualAmbient::light(),
        );
        m.initialize();
        assert_eq!(m.accent().to_string(), "#10b981");
        assert_eq!(m.mode(), ThemeMode::Light);

        assert_eq!(m.set_mode(ThemeMode::Dark), Persistence::Skipped);
        assert_eq!(m.target().attribute("data-theme"), Some("dark"));

        let color = Color::parse("#f59e0b").unwrap();
        assert_eq!(m.set_accent_color(color), Persistence::Skipped);
        assert_eq!(m.target().property("--primary"), Some("#f59e0b"));
    }

    #[test]
    fn test_ambient_change_only_affects_auto() {
        let ambient = ManualAmbient::light();
        let mut m = manager_with(MemoryStore::new(), ambient.clone());
        m.initialize();

        m.set_mode(ThemeMode::Light);
        ambient.set_dark(true);
        assert_eq!(m.sync(), 1);
        assert_eq!(m.resolved_mode(), ResolvedMode::Light);

        m.set_mode(ThemeMode::Auto);
        assert_eq!(m.resolved_mode(), ResolvedMode::Dark);

        ambient.set_dark(false);
        m.sync();
        assert_eq!(m.resolved_mode(), ResolvedMode::Light);
        assert_eq!(m.target().attribute("data-theme"), Some("light"));
        assert_eq!(m.mode(), ThemeMode::Auto);
    }

    #[test]
    fn test_ambient_change_does_not_persist() {
        let ambient = ManualAmbient::light();
        let mut m = manager_with(MemoryStore::new(), ambient.clone());
        m.initialize();
        m.set_mode(ThemeMode::Auto);

        m.handle_ambient_change(true);
        assert_eq!(
            m.store().get("themeMode").unwrap().as_deref(),
            Some("\"auto\"")
        );
    }

    #[test]
    fn test_storage_events() {
        let mut m = manager_with(MemoryStore::new(), ManualAmbient::light());
        m.initialize();

        assert!(m.handle_storage_event(&StorageEvent::new("themeMode", Some("\"dark\"".into()))));
        assert_eq!(m.target().attribute("data-theme"), Some("dark"));

        assert!(m.handle_storage_event(&StorageEvent::new(
            "primaryColor",
            Some("\"#8b5cf6\"".into())
        )));
        assert_eq!(m.target().property("--primary"), Some("#8b5cf6"));

        assert!(m.handle_storage_event(&StorageEvent::new("themeMode", None)));
        assert_eq!(m.mode(), ThemeMode::Light);

        assert!(m.handle_storage_event(&StorageEvent::new("primaryColor", None)));
        assert_eq!(m.accent().to_string(), "#10b981");

        assert!(!m.handle_storage_event(&StorageEvent::new("fontSize", Some("16".into()))));
        assert!(m.store().is_empty(), "synced values are not written back");
    }

    #[test]
    fn test_custom_config() {
        let config = ThemeConfig {
            mode_key: "mode".into(),
            accent_key: "accent".into(),
            default_mode: ThemeMode::Auto,
            mode_attribute: "data-scheme".into(),
            ..ThemeConfig::default()
        };
        let mut m = ThemeStateManager::with_config(
            MemoryStore::new(),
            RecordingTarget::new(),
            ManualAmbient::dark(),
            config,
        )
        .unwrap();
        m.initialize();
        assert_eq!(m.target().attribute("data-scheme"), Some("dark"));

        m.set_mode(ThemeMode::Light);
        assert_eq!(m.store().get("mode").unwrap().as_deref(), Some("\"light\""));
        assert_eq!(m.store().get("themeMode").unwrap(), None);
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let config = ThemeConfig {
            accent_key: String::new(),
            ..ThemeConfig::default()
        };
        let result = ThemeStateManager::with_config(
            MemoryStore::new(),
            RecordingTarget::new(),
            ManualAmbient::light(),
            config,
        );
        assert!(matches!(result, Err(ThemeError::Config(_))));
    }

    #[test]
    fn test_drop_unsubscribes() {
        let ambient = ManualAmbient::light();
        {
            let _m = manager_with(MemoryStore::new(), ambient.clone());
            assert_eq!(ambient.subscriber_count(), 1);
        }
        assert_eq!(ambient.subscriber_count(), 0);
    }
}
