//! Backing store abstraction for settings
//!
//! The host owns persistence: where values live (registry, property list,
//! XML file, browser storage) and how a flush reaches disk is entirely its
//! business. This module only names the capability set the façade needs.
//!
//! # Two-phase writes
//!
//! Writes land in the store's working set. They become durable only after
//! [`PrefStore::save`]. [`MemoryStore`] models this explicitly so callers can
//! observe what a host restart would lose.

use std::collections::HashMap;
use tracing::debug;

/// Errors raised by a backing store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Host backend reported a failure
    #[error("settings backend error: {0}")]
    Backend(String),

    /// IO error while reading or flushing the store
    #[error("settings store IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Create a backend error from any message
    pub fn backend<S: Into<String>>(msg: S) -> Self {
        Self::Backend(msg.into())
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Host-provided string key-value store
///
/// Every value is a string. Implementations decide whether `set_raw`,
/// `delete_key` and `delete_all` are durable on their own; callers must
/// assume they are not until [`save`](PrefStore::save) returns.
pub trait PrefStore {
    /// Get the raw string stored under `key`, or `None` if absent
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set_raw(&mut self, key: &str, value: &str) -> StoreResult<()>;

    /// Check whether `key` has a value
    fn has_key(&self, key: &str) -> StoreResult<bool>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete_key(&mut self, key: &str) -> StoreResult<()>;

    /// Remove every key
    fn delete_all(&mut self) -> StoreResult<()>;

    /// Persist all pending changes
    fn save(&mut self) -> StoreResult<()>;
}

impl<S: PrefStore + ?Sized> PrefStore for &mut S {
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get_raw(key)
    }

    fn set_raw(&mut self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set_raw(key, value)
    }

    fn has_key(&self, key: &str) -> StoreResult<bool> {
        (**self).has_key(key)
    }

    fn delete_key(&mut self, key: &str) -> StoreResult<()> {
        (**self).delete_key(key)
    }

    fn delete_all(&mut self) -> StoreResult<()> {
        (**self).delete_all()
    }

    fn save(&mut self) -> StoreResult<()> {
        (**self).save()
    }
}

impl<S: PrefStore + ?Sized> PrefStore for Box<S> {
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get_raw(key)
    }

    fn set_raw(&mut self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set_raw(key, value)
    }

    fn has_key(&self, key: &str) -> StoreResult<bool> {
        (**self).has_key(key)
    }

    fn delete_key(&mut self, key: &str) -> StoreResult<()> {
        (**self).delete_key(key)
    }

    fn delete_all(&mut self) -> StoreResult<()> {
        (**self).delete_all()
    }

    fn save(&mut self) -> StoreResult<()> {
        (**self).save()
    }
}

/// In-memory store with an explicit saved snapshot
///
/// `live` is what reads see. `saved` is what survived the last
/// [`save`](PrefStore::save). Useful as a stand-in for the host store in
/// tests and headless tools.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    live: HashMap<String, String>,
    saved: HashMap<String, String>,
    save_count: usize,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose entries are already saved
    pub fn with_saved<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let saved: HashMap<String, String> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            live: saved.clone(),
            saved,
            save_count: 0,
        }
    }

    /// Value under `key` as of the last save
    pub fn saved(&self, key: &str) -> Option<&str> {
        self.saved.get(key).map(String::as_str)
    }

    /// True if the working set differs from the saved snapshot
    pub fn is_dirty(&self) -> bool {
        self.live != self.saved
    }

    /// Number of times `save` has been called
    pub fn save_count(&self) -> usize {
        self.save_count
    }

    /// Number of keys in the working set
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// True if the working set has no keys
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Keys in the working set, sorted
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.live.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Drop unsaved changes, as a host restart without flush would.
    /// Returns true if anything was lost.
    pub fn discard_unsaved(&mut self) -> bool {
        let lost = self.is_dirty();
        if lost {
            debug!(
                "Discarding unsaved settings ({} live, {} saved)",
                self.live.len(),
                self.saved.len()
            );
            self.live = self.saved.clone();
        }
        lost
    }
}

impl PrefStore for MemoryStore {
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.live.get(key).cloned())
    }

    fn set_raw(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.live.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn has_key(&self, key: &str) -> StoreResult<bool> {
        Ok(self.live.contains_key(key))
    }

    fn delete_key(&mut self, key: &str) -> StoreResult<()> {
        self.live.remove(key);
        Ok(())
    }

    fn delete_all(&mut self) -> StoreResult<()> {
        self.live.clear();
        Ok(())
    }

    fn save(&mut self) -> StoreResult<()> {
        self.saved = self.live.clone();
        self.save_count += 1;
        Ok(())
    }
}
