//! Key/value store contract and implementations.
//!
//! The manager persists two strings and nothing else, so the store contract
//! is deliberately narrow: [`get`](KeyValueStore::get),
//! [`set`](KeyValueStore::set) and [`remove`](KeyValueStore::remove), plus
//! [`drain_events`](KeyValueStore::drain_events) for learning about writes
//! made by *other* instances sharing the same backing data.
//!
//! Implementations:
//!
//! - [`MemoryStore`]: in-process, shareable between instances (one handle per
//!   simulated tab), with change notifications between handles
//! - [`FileStore`]: a JSON object on disk, for the command-line front end
//! - [`UnavailableStore`]: fails every call, standing in for disabled storage
//!
//! Values are stored as JSON string literals; see [`encode_value`] and
//! [`decode_value`].

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use crate::error::StoreError;

/// A change to a store key made through another handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// The key that changed.
    pub key: String,
    /// The new raw value, or `None` if the key was removed.
    pub new_value: Option<String>,
}

impl StorageEvent {
    pub fn new(key: impl Into<String>, new_value: Option<String>) -> Self {
        Self {
            key: key.into(),
            new_value,
        }
    }
}

/// Abstraction over a string key/value store.
pub trait KeyValueStore: Send + Sync {
    /// Reads a raw value. `Ok(None)` means the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes a raw value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Deletes a key. Deleting an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Returns writes made by other handles since the last call, oldest first.
    ///
    /// Stores that cannot observe other writers return nothing.
    fn drain_events(&self) -> Vec<StorageEvent> {
        Vec::new()
    }
}

/// Encodes a value for storage as a JSON string literal.
pub fn encode_value(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Decodes a stored value.
///
/// JSON string literals are unwrapped; anything else is returned as-is so
/// values written by older, unencoded clients still load.
pub fn decode_value(raw: &str) -> String {
    match serde_json::from_str::<String>(raw) {
        Ok(value) => value,
        Err(_) => raw.to_string(),
    }
}

// === MemoryStore ===

#[derive(Default)]
struct SharedMemory {
    values: HashMap<String, String>,
    listeners: Vec<(usize, Sender<StorageEvent>)>,
    next_id: usize,
}

impl SharedMemory {
    fn register(&mut self) -> (usize, Receiver<StorageEvent>) {
        let (tx, rx) = mpsc::channel();
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, tx));
        (id, rx)
    }

    fn notify_others(&mut self, writer: usize, event: StorageEvent) {
        // Handles that were dropped without cleanup fall out here.
        self.listeners
            .retain(|(id, tx)| *id == writer || tx.send(event.clone()).is_ok());
    }
}

/// An in-memory store whose handles share the same data.
///
/// Each handle is one "instance" of the application. A write through one
/// handle is visible to every handle's `get` immediately and is reported by
/// `drain_events` on every *other* handle, mirroring cross-tab storage events.
///
/// ```rust
/// use hueshift_theme::{KeyValueStore, MemoryStore};
///
/// let tab_a = MemoryStore::new();
/// let tab_b = tab_a.instance();
///
/// tab_a.set("themeMode", "\"dark\"").unwrap();
/// assert_eq!(tab_b.get("themeMode").unwrap().as_deref(), Some("\"dark\""));
/// assert_eq!(tab_b.drain_events().len(), 1);
/// assert!(tab_a.drain_events().is_empty());
/// ```
pub struct MemoryStore {
    id: usize,
    shared: Arc<Mutex<SharedMemory>>,
    events: Mutex<Receiver<StorageEvent>>,
}

impl MemoryStore {
    /// Creates a fresh, empty store and its first handle.
    pub fn new() -> Self {
        let shared = Arc::new(Mutex::new(SharedMemory::default()));
        Self::attach(shared)
    }

    /// Creates a store pre-populated with raw values.
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        if let Ok(mut shared) = store.shared.lock() {
            shared
                .values
                .extend(values.into_iter().map(|(k, v)| (k.into(), v.into())));
        }
        store
    }

    /// Opens another handle onto the same data.
    pub fn instance(&self) -> Self {
        Self::attach(Arc::clone(&self.shared))
    }

    fn attach(shared: Arc<Mutex<SharedMemory>>) -> Self {
        let (id, rx) = match shared.lock() {
            Ok(mut guard) => guard.register(),
            Err(poisoned) => poisoned.into_inner().register(),
        };
        Self {
            id,
            shared,
            events: Mutex::new(rx),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, SharedMemory>, StoreError> {
        self.shared
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }

    /// Removes every key, notifying other handles for each.
    pub fn clear(&self) -> Result<(), StoreError> {
        let mut shared = self.lock()?;
        let keys: Vec<String> = shared.values.drain().map(|(k, _)| k).collect();
        for key in keys {
            shared.notify_others(self.id, StorageEvent::new(key, None));
        }
        Ok(())
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.lock().map(|s| s.values.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("id", &self.id)
            .field("len", &self.len())
            .finish()
    }
}

impl Drop for MemoryStore {
    fn drop(&mut self) {
        if let Ok(mut shared) = self.shared.lock() {
            shared.listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut shared = self.lock()?;
        let previous = shared.values.insert(key.to_string(), value.to_string());
        if previous.as_deref() != Some(value) {
            shared.notify_others(self.id, StorageEvent::new(key, Some(value.to_string())));
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut shared = self.lock()?;
        if shared.values.remove(key).is_some() {
            shared.notify_others(self.id, StorageEvent::new(key, None));
        }
        Ok(())
    }

    fn drain_events(&self) -> Vec<StorageEvent> {
        match self.events.lock() {
            Ok(rx) => rx.try_iter().collect(),
            Err(_) => Vec::new(),
        }
    }
}

// === FileStore ===

/// A store persisted as a JSON object in a single file.
///
/// Every operation re-reads the file, so writes from other processes are
/// picked up. Writes go to a temporary file in the same directory which is
/// then renamed over the original. A missing file reads as empty.
///
/// Each write holds an exclusive advisory lock on a `<path>.lock` sidecar
/// for the whole read, modify and rename, so concurrent writers of
/// different keys never drop each other's values.
///
/// `drain_events` reports keys whose value differs from what this handle
/// last wrote or observed, which is how one process learns that another
/// changed the settings.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    seen: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Opens the store at `path`, reading the current contents as the baseline
    /// for change detection.
    ///
    /// Opening never fails. An unreadable or corrupt file is logged and
    /// surfaces as an error from the individual operations instead, which
    /// the manager degrades to defaults.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let seen = read_map(&path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "cannot read store file, starting empty");
            HashMap::new()
        });
        Self {
            path,
            seen: Mutex::new(seen),
        }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes every key.
    pub fn clear(&self) -> Result<(), StoreError> {
        let _lock = lock_exclusive(&self.path)?;
        write_map(&self.path, &HashMap::new())?;
        if let Ok(mut seen) = self.seen.lock() {
            seen.clear();
        }
        Ok(())
    }

    fn remember(&self, key: &str, value: Option<&str>) {
        if let Ok(mut seen) = self.seen.lock() {
            match value {
                Some(v) => seen.insert(key.to_string(), v.to_string()),
                None => seen.remove(key),
            };
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(read_map(&self.path)?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _lock = lock_exclusive(&self.path)?;
        let mut map = read_map(&self.path)?;
        map.insert(key.to_string(), value.to_string());
        write_map(&self.path, &map)?;
        self.remember(key, Some(value));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _lock = lock_exclusive(&self.path)?;
        let mut map = read_map(&self.path)?;
        if map.remove(key).is_some() {
            write_map(&self.path, &map)?;
        }
        self.remember(key, None);
        Ok(())
    }

    fn drain_events(&self) -> Vec<StorageEvent> {
        let current = match read_map(&self.path) {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cannot poll store file");
                return Vec::new();
            }
        };
        let Ok(mut seen) = self.seen.lock() else {
            return Vec::new();
        };

        let mut events: Vec<StorageEvent> = current
            .iter()
            .filter(|(k, v)| seen.get(*k) != Some(*v))
            .map(|(k, v)| StorageEvent::new(k.clone(), Some(v.clone())))
            .collect();
        events.extend(
            seen.keys()
                .filter(|k| !current.contains_key(*k))
                .map(|k| StorageEvent::new(k.clone(), None)),
        );
        events.sort_by(|a, b| a.key.cmp(&b.key));

        *seen = current;
        events
    }
}

fn read_map(path: &Path) -> Result<HashMap<String, String>, StoreError> {
    match std::fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => Ok(HashMap::new()),
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
        Err(e) => Err(e.into()),
    }
}

fn parent_dir(path: &Path) -> Result<&Path, StoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    Ok(dir)
}

/// Takes the writer lock for `path`. Released when the returned file drops.
///
/// The data file itself is replaced on every write, so the lock lives on a
/// sidecar that is never renamed.
fn lock_exclusive(path: &Path) -> Result<File, StoreError> {
    parent_dir(path)?;
    let mut lock_path = OsString::from(path.as_os_str());
    lock_path.push(".lock");

    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(PathBuf::from(lock_path))?;
    fs4::fs_std::FileExt::lock_exclusive(&file)?;
    Ok(file)
}

fn write_map(path: &Path, map: &HashMap<String, String>) -> Result<(), StoreError> {
    let dir = parent_dir(path)?;

    // Sorted keys keep the file diff-friendly.
    let sorted: std::collections::BTreeMap<_, _> = map.iter().collect();
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, &sorted)?;
    tmp.write_all(b"\n")?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}

// === UnavailableStore ===

/// A store that fails every operation.
///
/// Models storage that is disabled or throws on access, so callers can
/// verify that theme application degrades gracefully.
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new() -> Self {
        Self::with_reason("storage is disabled")
    }

    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for UnavailableStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable(self.reason.clone()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable(self.reason.clone()))
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable(self.reason.clone()))
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn drain_events(&self) -> Vec<StorageEvent> {
        (**self).drain_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_encode_decode() {
        assert_eq!(encode_value("dark"), "\"dark\"");
        assert_eq!(decode_value("\"dark\""), "dark");
        assert_eq!(decode_value("dark"), "dark");
        assert_eq!(decode_value(&encode_value("a \"quoted\" value")), "a \"quoted\" value");
    }

    #[test]
    fn test_memory_get_set_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.len(), 1);

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        store.remove("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_events_go_to_other_handles() {
        let a = MemoryStore::new();
        let b = a.instance();
        let c = b.instance();

        a.set("themeMode", "\"dark\"").unwrap();
        a.set("themeMode", "\"auto\"").unwrap();

        assert!(a.drain_events().is_empty());
        let events = b.drain_events();
        assert_eq!(
            events,
            vec![
                StorageEvent::new("themeMode", Some("\"dark\"".into())),
                StorageEvent::new("themeMode", Some("\"auto\"".into())),
            ]
        );
        assert_eq!(c.drain_events().len(), 2);
        assert!(b.drain_events().is_empty());
    }

    #[test]
    fn test_memory_unchanged_value_is_not_reported() {
        let a = MemoryStore::new();
        let b = a.instance();

        a.set("themeMode", "\"dark\"").unwrap();
        a.set("themeMode", "\"dark\"").unwrap();
        assert_eq!(b.drain_events().len(), 1);

        b.set("themeMode", "\"dark\"").unwrap();
        assert!(a.drain_events().is_empty());
    }

    #[test]
    fn test_memory_remove_and_clear_notify() {
        let a = MemoryStore::with_values([("x", "1"), ("y", "2")]);
        let b = a.instance();

        a.remove("x").unwrap();
        a.remove("missing").unwrap();
        assert_eq!(b.drain_events(), vec![StorageEvent::new("x", None)]);

        b.clear().unwrap();
        assert_eq!(a.drain_events(), vec![StorageEvent::new("y", None)]);
        assert!(a.is_empty());
    }

    #[test]
    fn test_memory_dropped_handle_is_unregistered() {
        let a = MemoryStore::new();
        {
            let _b = a.instance();
        }
        a.set("k", "v").unwrap();
        assert_eq!(a.shared.lock().unwrap().listeners.len(), 1);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let store = FileStore::open(&path);
        assert_eq!(store.get("themeMode").unwrap(), None);

        store.set("themeMode", "\"dark\"").unwrap();
        store.set("primaryColor", "\"#3b82f6\"").unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("themeMode").unwrap().as_deref(), Some("\"dark\""));
        assert_eq!(
            reopened.get("primaryColor").unwrap().as_deref(),
            Some("\"#3b82f6\"")
        );

        reopened.remove("themeMode").unwrap();
        assert_eq!(store.get("themeMode").unwrap(), None);
    }

    #[test]
    fn test_file_store_detects_external_writes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        let a = FileStore::open(&path);
        let b = FileStore::open(&path);

        a.set("themeMode", "\"dark\"").unwrap();
        assert!(a.drain_events().is_empty());
        assert_eq!(
            b.drain_events(),
            vec![StorageEvent::new("themeMode", Some("\"dark\"".into()))]
        );
        assert!(b.drain_events().is_empty());

        a.remove("themeMode").unwrap();
        assert_eq!(b.drain_events(), vec![StorageEvent::new("themeMode", None)]);
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ truncated").unwrap();

        let store = FileStore::open(&path);
        assert!(matches!(store.get("themeMode"), Err(StoreError::Corrupt(_))));
        assert!(matches!(store.set("themeMode", "\"dark\""), Err(StoreError::Corrupt(_))));
        assert!(store.drain_events().is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ truncated");
    }

    #[test]
    fn test_file_store_concurrent_writers_keep_every_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        std::thread::scope(|scope| {
            for writer in ["a", "b"] {
                let path = &path;
                scope.spawn(move || {
                    let store = FileStore::open(path);
                    for i in 0..100 {
                        store.set(&format!("{writer}{i}"), "1").unwrap();
                    }
                });
            }
        });

        let map = read_map(&path).unwrap();
        assert_eq!(map.len(), 200);
        assert!(map.contains_key("a99") && map.contains_key("b0"));
    }

    #[test]
    fn test_file_store_clear() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("s.json"));
        store.set("a", "1").unwrap();
        store.clear().unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        assert!(store.drain_events().is_empty());
    }

    #[test]
    fn test_unavailable_store_always_fails() {
        let store = UnavailableStore::with_reason("quota exceeded");
        assert!(matches!(store.get("k"), Err(StoreError::Unavailable(_))));
        assert!(store.set("k", "v").is_err());
        assert!(store.remove("k").is_err());
        assert!(store.drain_events().is_empty());
        assert!(store.get("k").unwrap_err().to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_boxed_store_delegates() {
        let store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
