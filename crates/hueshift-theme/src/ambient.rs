//! Ambient light/dark preference sources.
//!
//! An [`AmbientPreference`] answers "does the host prefer dark?" and notifies
//! subscribers when that answer changes. Only `Auto` mode cares about it.
//!
//! - [`SystemAmbient`] asks the OS via `dark-light`
//! - [`ManualAmbient`] is driven by hand, for tests and forced overrides

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use dark_light::Mode as OsMode;

/// Handle returned by [`AmbientPreference::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A source of the host's light/dark preference.
pub trait AmbientPreference: Send + Sync {
    /// The current preference.
    fn prefers_dark(&self) -> bool;

    /// Registers `listener` to receive the new value on every change.
    fn subscribe(&self, listener: Sender<bool>) -> SubscriptionId;

    /// Stops notifications for `id`. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}

/// Subscriber bookkeeping shared by the ambient sources.
#[derive(Debug, Default)]
struct Listeners {
    entries: Mutex<Vec<(SubscriptionId, Sender<bool>)>>,
    next_id: AtomicU64,
}

impl Listeners {
    fn add(&self, listener: Sender<bool>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((id, listener));
        }
        id
    }

    fn remove(&self, id: SubscriptionId) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.retain(|(entry, _)| *entry != id);
        }
    }

    fn notify(&self, is_dark: bool) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.retain(|(_, tx)| tx.send(is_dark).is_ok());
        }
    }

    fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }
}

// === ManualAmbient ===

#[derive(Debug, Default)]
struct ManualInner {
    dark: AtomicBool,
    listeners: Listeners,
}

/// An ambient preference set by hand.
///
/// Clones share state, so a test can keep one handle to flip the preference
/// while the manager holds another.
#[derive(Debug, Clone, Default)]
pub struct ManualAmbient {
    inner: Arc<ManualInner>,
}

impl ManualAmbient {
    pub fn new(dark: bool) -> Self {
        let ambient = Self::default();
        ambient.inner.dark.store(dark, Ordering::SeqCst);
        ambient
    }

    pub fn light() -> Self {
        Self::new(false)
    }

    pub fn dark() -> Self {
        Self::new(true)
    }

    /// Changes the preference, notifying subscribers if it actually changed.
    pub fn set_dark(&self, dark: bool) {
        let previous = self.inner.dark.swap(dark, Ordering::SeqCst);
        if previous != dark {
            self.inner.listeners.notify(dark);
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.len()
    }
}

impl AmbientPreference for ManualAmbient {
    fn prefers_dark(&self) -> bool {
        self.inner.dark.load(Ordering::SeqCst)
    }

    fn subscribe(&self, listener: Sender<bool>) -> SubscriptionId {
        self.inner.listeners.add(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.listeners.remove(id)
    }
}

// === SystemAmbient ===

/// Function used to query the OS preference. Returns `true` for dark.
pub type SchemeDetector = fn() -> bool;

/// The OS light/dark preference.
///
/// The preference is detected once on construction and cached; call
/// [`refresh`](SystemAmbient::refresh) to re-query the OS (for example on a
/// timer or window-focus event) and notify subscribers of a change.
#[derive(Debug)]
pub struct SystemAmbient {
    detector: SchemeDetector,
    dark: AtomicBool,
    listeners: Listeners,
}

impl SystemAmbient {
    /// Detects the OS preference with `dark-light`.
    pub fn new() -> Self {
        Self::with_detector(os_prefers_dark)
    }

    /// Uses a custom detector instead of querying the OS.
    pub fn with_detector(detector: SchemeDetector) -> Self {
        Self {
            detector,
            dark: AtomicBool::new(detector()),
            listeners: Listeners::default(),
        }
    }

    /// Re-queries the detector. Returns `true` if the preference changed.
    pub fn refresh(&self) -> bool {
        let now = (self.detector)();
        let previous = self.dark.swap(now, Ordering::SeqCst);
        if previous != now {
            tracing::debug!(dark = now, "system color scheme changed");
            self.listeners.notify(now);
            true
        } else {
            false
        }
    }
}

impl Default for SystemAmbient {
    fn default() -> Self {
        Self::new()
    }
}

impl AmbientPreference for SystemAmbient {
    fn prefers_dark(&self) -> bool {
        self.dark.load(Ordering::SeqCst)
    }

    fn subscribe(&self, listener: Sender<bool>) -> SubscriptionId {
        self.listeners.add(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.remove(id)
    }
}

/// Asks the OS through `dark-light`. Unknown or failed detection means light.
fn os_prefers_dark() -> bool {
    match dark_light::detect() {
        Ok(OsMode::Dark) => true,
        Ok(OsMode::Light) => false,
        Ok(_) => {
            tracing::debug!("OS reports no color scheme preference, using light");
            false
        }
        Err(e) => {
            tracing::warn!(error = ?e, "color scheme detection failed, using light");
            false
        }
    }
}

impl<A: AmbientPreference + ?Sized> AmbientPreference for Box<A> {
    fn prefers_dark(&self) -> bool {
        (**self).prefers_dark()
    }

    fn subscribe(&self, listener: Sender<bool>) -> SubscriptionId {
        (**self).subscribe(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        (**self).unsubscribe(id)
    }
}
