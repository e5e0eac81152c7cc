//! Keyed per-player state with per-key locks.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// A map of independently locked slots.
///
/// The outer `RwLock` guards only slot lookup and insertion. Work on one
/// key holds that key's `Mutex` alone, so unrelated keys never contend.
pub struct KeyedStore<K, V> {
    slots: RwLock<HashMap<K, Arc<Mutex<V>>>>,
}

impl<K: Eq + Hash + Clone, V> Default for KeyedStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone, V> KeyedStore<K, V> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { slots: RwLock::new(HashMap::new()) }
    }

    /// Creates a store pre-populated with values.
    pub fn from_entries(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k, Arc::new(Mutex::new(v))))
            .collect();
        Self { slots: RwLock::new(map) }
    }

    /// Returns the slot for a key, creating it with `init` if absent.
    pub fn slot(&self, key: &K, init: impl FnOnce() -> V) -> Arc<Mutex<V>> {
        if let Some(slot) = self.slots.read().get(key) {
            return Arc::clone(slot);
        }
        let mut slots = self.slots.write();
        Arc::clone(
            slots
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(init()))),
        )
    }

    /// Runs `f` with exclusive access to a key's value, creating it if absent.
    pub fn with<R>(&self, key: &K, init: impl FnOnce() -> V, f: impl FnOnce(&mut V) -> R) -> R {
        let slot = self.slot(key, init);
        let mut guard = slot.lock();
        f(&mut guard)
    }

    /// Runs `f` on an existing value. Returns `None` if the key is absent.
    pub fn with_existing<R>(&self, key: &K, f: impl FnOnce(&mut V) -> R) -> Option<R> {
        let slot = self.slots.read().get(key).map(Arc::clone)?;
        let mut guard = slot.lock();
        Some(f(&mut guard))
    }

    /// Removes a key.
    pub fn remove(&self, key: &K) -> bool {
        self.slots.write().remove(key).is_some()
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// True if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }

    /// Clones out every entry. Each slot is locked briefly in turn.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(K, V)>
    where
        V: Clone,
    {
        let slots: Vec<(K, Arc<Mutex<V>>)> = self
            .slots
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), Arc::clone(v)))
            .collect();
        slots.into_iter().map(|(k, v)| (k, v.lock().clone())).collect()
    }
}

impl<K, V> std::fmt::Debug for KeyedStore<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedStore")
            .field("keys", &self.slots.read().len())
            .finish()
    }
}
