//! Typed accessor façade
//!
//! [`Prefs`] wraps a [`PrefStore`] and offers typed get/put on top of its
//! string-only interface. Reads never fail: a missing key, a malformed
//! stored string or a store read error all yield the caller's default.
//! Writes return errors from the store.
//!
//! ```rust
//! use prefkit::{Flush, MemoryStore, Prefs};
//!
//! # fn main() -> prefkit::PrefsResult<()> {
//! let mut prefs = Prefs::new(MemoryStore::new());
//! prefs.put_int("level", 5, Flush::Defer)?;
//! assert_eq!(prefs.get_int("level", -1), 5);
//! assert_eq!(prefs.get_int("missing", -1), -1);
//!
//! prefs.put_string("level", "abc", Flush::Now)?;
//! assert_eq!(prefs.get_int("level", -1), -1);
//! # Ok(())
//! # }
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::PrefsConfig;
use crate::error::PrefsResult;
use crate::store::PrefStore;
use crate::value::PrefValue;

/// Whether a mutation should be followed by a flush to durable storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flush {
    /// Leave the change in the store's working set
    #[default]
    Defer,
    /// Call [`PrefStore::save`] right after the change
    Now,
}

impl Flush {
    /// True for [`Flush::Now`]
    pub fn is_now(self) -> bool {
        matches!(self, Flush::Now)
    }
}

impl From<bool> for Flush {
    fn from(also_save: bool) -> Self {
        if also_save {
            Flush::Now
        } else {
            Flush::Defer
        }
    }
}

/// Typed settings over a string key-value store
pub struct Prefs<S> {
    store: S,
    config: PrefsConfig,
}

impl<S: PrefStore> Prefs<S> {
    /// Wrap a store with the default config
    pub fn new(store: S) -> Self {
        Self::with_config(store, PrefsConfig::default())
    }

    /// Wrap a store with an explicit config
    pub fn with_config(store: S, config: PrefsConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn config(&self) -> &PrefsConfig {
        &self.config
    }

    /// Unwrap the underlying store
    pub fn into_inner(self) -> S {
        self.store
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Read `key` as `T`, or `default` if it is absent or malformed
    pub fn get<T: PrefValue>(&self, key: &str, default: T) -> T {
        let Some(raw) = self.raw(key) else {
            return default;
        };
        match T::parse_pref(&raw) {
            Some(value) => value,
            None => {
                self.report_malformed(key, T::TYPE_NAME);
                default
            }
        }
    }

    /// Read `key` as `T`, or `T::default()`
    pub fn get_or_default<T: PrefValue + Default>(&self, key: &str) -> T {
        self.get(key, T::default())
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key, default)
    }

    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        self.get(key, default)
    }

    pub fn get_long(&self, key: &str, default: i64) -> i64 {
        self.get(key, default)
    }

    pub fn get_float(&self, key: &str, default: f32) -> f32 {
        self.get(key, default)
    }

    pub fn get_double(&self, key: &str, default: f64) -> f64 {
        self.get(key, default)
    }

    /// Stored string for `key`, if any
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.raw(key)
    }

    /// Stored string for `key`, or `default`
    pub fn get_string_or(&self, key: &str, default: &str) -> String {
        self.raw(key).unwrap_or_else(|| default.to_string())
    }

    /// Deserialize the JSON object stored under `key`
    ///
    /// Returns `Ok(None)` if the key is absent. Malformed JSON is reported
    /// as [`PrefsError::Json`](crate::PrefsError::Json), exactly as
    /// serde_json rejects it.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> PrefsResult<Option<T>> {
        match self.store.get_raw(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn contains_key(&self, key: &str) -> PrefsResult<bool> {
        Ok(self.store.has_key(key)?)
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    /// Store `value` under `key` in its string form
    pub fn put<T: PrefValue>(&mut self, key: &str, value: &T, flush: Flush) -> PrefsResult<()> {
        self.put_string(key, &value.format_pref(), flush)
    }

    pub fn put_bool(&mut self, key: &str, value: bool, flush: Flush) -> PrefsResult<()> {
        self.put(key, &value, flush)
    }

    pub fn put_int(&mut self, key: &str, value: i32, flush: Flush) -> PrefsResult<()> {
        self.put(key, &value, flush)
    }

    pub fn put_long(&mut self, key: &str, value: i64, flush: Flush) -> PrefsResult<()> {
        self.put(key, &value, flush)
    }

    pub fn put_float(&mut self, key: &str, value: f32, flush: Flush) -> PrefsResult<()> {
        self.put(key, &value, flush)
    }

    pub fn put_double(&mut self, key: &str, value: f64, flush: Flush) -> PrefsResult<()> {
        self.put(key, &value, flush)
    }

    pub fn put_string(&mut self, key: &str, value: &str, flush: Flush) -> PrefsResult<()> {
        self.store.set_raw(key, value)?;
        debug!("Stored setting {}", key);
        self.flush_if(flush)
    }

    /// Serialize `value` to JSON and store it under `key`
    pub fn put_json<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
        flush: Flush,
    ) -> PrefsResult<()> {
        let json = serde_json::to_string(value)?;
        self.put_string(key, &json, flush)
    }

    pub fn delete_key(&mut self, key: &str, flush: Flush) -> PrefsResult<()> {
        self.store.delete_key(key)?;
        debug!("Deleted setting {}", key);
        self.flush_if(flush)
    }

    /// Remove every setting
    pub fn clear(&mut self, flush: Flush) -> PrefsResult<()> {
        self.store.delete_all()?;
        debug!("Cleared all settings");
        self.flush_if(flush)
    }

    /// Force pending changes to durable storage
    ///
    /// Until this runs (directly or via [`Flush::Now`]) writes may live only
    /// in the store's memory.
    pub fn save(&mut self) -> PrefsResult<()> {
        self.store.save()?;
        debug!("Flushed settings to backing store");
        Ok(())
    }

    fn flush_if(&mut self, flush: Flush) -> PrefsResult<()> {
        if flush.is_now() || self.config.always_flush {
            self.save()
        } else {
            Ok(())
        }
    }

    fn raw(&self, key: &str) -> Option<String> {
        match self.store.get_raw(key) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to read setting {}: {}. Using default.", key, e);
                None
            }
        }
    }

    // Values are not logged; settings may hold tokens.
    fn report_malformed(&self, key: &str, type_name: &str) {
        if self.config.warn_on_malformed {
            warn!("Setting {} is not a valid {}. Using default.", key, type_name);
        } else {
            debug!("Setting {} is not a valid {}. Using default.", key, type_name);
        }
    }
}

impl<S: PrefStore + Default> Default for Prefs<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreError, StoreResult};
    use crate::PrefsError;
    use serde::Deserialize;
    use tracing_test::traced_test;

    /// Store whose every call fails
    struct BrokenStore;

    impl PrefStore for BrokenStore {
        fn get_raw(&self, _key: &str) -> StoreResult<Option<String>> {
            Err(StoreError::backend("unavailable"))
        }
        fn set_raw(&mut self, _key: &str, _value: &str) -> StoreResult<()> {
            Err(StoreError::backend("unavailable"))
        }
        fn has_key(&self, _key: &str) -> StoreResult<bool> {
            Err(StoreError::backend("unavailable"))
        }
        fn delete_key(&mut self, _key: &str) -> StoreResult<()> {
            Err(StoreError::backend("unavailable"))
        }
        fn delete_all(&mut self) -> StoreResult<()> {
            Err(StoreError::backend("unavailable"))
        }
        fn save(&mut self) -> StoreResult<()> {
            Err(StoreError::backend("unavailable"))
        }
    }

    fn prefs() -> Prefs<MemoryStore> {
        Prefs::new(MemoryStore::new())
    }

    // =========================================================================
    // Typed reads
    // =========================================================================

    #[test]
    fn int_roundtrip_and_defaults() {
        let mut prefs = prefs();
        prefs.put_int("level", 5, Flush::Defer).expect("put");

        assert_eq!(prefs.get_int("level", -1), 5);
        assert_eq!(prefs.get_int("missing", -1), -1);
    }

    #[test]
    fn malformed_value_returns_default() {
        let mut prefs = prefs();
        prefs.put_string("level", "abc", Flush::Defer).expect("put");

        assert_eq!(prefs.get_int("level", -1), -1);
        assert_eq!(prefs.get_long("level", -2), -2);
        assert_eq!(prefs.get_double("level", 0.5), 0.5);
        assert!(prefs.get_bool("level", true));
        assert_eq!(prefs.get_string("level").as_deref(), Some("abc"));
    }

    #[test]
    fn float_written_by_old_build_reads_as_double() {
        let mut prefs = prefs();
        prefs.put_float("height", 172.5, Flush::Defer).expect("put");
        assert_eq!(prefs.get_double("height", 0.0), 172.5);
    }

    #[test]
    fn legacy_capitalized_bool_reads() {
        let prefs = Prefs::new(MemoryStore::with_saved([("sound", "True")]));
        assert!(prefs.get_bool("sound", false));
    }

    #[test]
    fn get_or_default_uses_type_default() {
        let prefs = prefs();
        assert_eq!(prefs.get_or_default::<i64>("missing"), 0);
        assert!(!prefs.get_or_default::<bool>("missing"));
        assert_eq!(prefs.get_or_default::<f32>("missing"), 0.0);
    }

    #[test]
    fn get_string_or_falls_back() {
        let mut prefs = prefs();
        assert_eq!(prefs.get_string_or("name", "guest"), "guest");
        prefs.put_string("name", "ada", Flush::Defer).expect("put");
        assert_eq!(prefs.get_string_or("name", "guest"), "ada");
    }

    // =========================================================================
    // Delete / clear
    // =========================================================================

    #[test]
    fn delete_key_removes_value() {
        let mut prefs = prefs();
        prefs.put_bool("tutorial_done", true, Flush::Defer).expect("put");
        assert!(prefs.contains_key("tutorial_done").expect("contains"));

        prefs.delete_key("tutorial_done", Flush::Defer).expect("delete");
        assert!(!prefs.contains_key("tutorial_done").expect("contains"));
        assert!(!prefs.get_bool("tutorial_done", false));
    }

    #[test]
    fn clear_removes_all_keys() {
        let mut prefs = prefs();
        prefs.put_int("a", 1, Flush::Defer).expect("put");
        prefs.put_long("b", 2, Flush::Defer).expect("put");

        prefs.clear(Flush::Now).expect("clear");
        assert!(!prefs.contains_key("a").expect("contains"));
        assert!(!prefs.contains_key("b").expect("contains"));
        assert!(prefs.store().is_empty());
        assert_eq!(prefs.store().save_count(), 1);
    }

    // =========================================================================
    // Flush semantics
    // =========================================================================

    #[test]
    fn deferred_write_is_lost_without_save() {
        let mut prefs = prefs();
        prefs.put_int("coins", 10, Flush::Defer).expect("put");
        assert_eq!(prefs.store().save_count(), 0);

        prefs.store_mut().discard_unsaved();
        assert_eq!(prefs.get_int("coins", 0), 0);
    }

    #[test]
    fn flush_now_survives_discard() {
        let mut prefs = prefs();
        prefs.put_int("coins", 10, Flush::Now).expect("put");
        assert_eq!(prefs.store().save_count(), 1);

        prefs.store_mut().discard_unsaved();
        assert_eq!(prefs.get_int("coins", 0), 10);
    }

    #[test]
    fn explicit_save_persists_batched_writes() {
        let mut prefs = prefs();
        prefs.put_int("a", 1, Flush::Defer).expect("put");
        prefs.put_int("b", 2, Flush::Defer).expect("put");
        prefs.save().expect("save");

        let store = prefs.into_inner();
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.saved("a"), Some("1"));
        assert_eq!(store.saved("b"), Some("2"));
    }

    #[test]
    fn always_flush_overrides_defer() {
        let config = PrefsConfig {
            always_flush: true,
            ..PrefsConfig::default()
        };
        let mut prefs = Prefs::with_config(MemoryStore::new(), config);
        prefs.put_int("a", 1, Flush::Defer).expect("put");
        prefs.delete_key("a", Flush::Defer).expect("delete");
        assert_eq!(prefs.store().save_count(), 2);
    }

    #[test]
    fn flush_from_bool() {
        assert_eq!(Flush::from(true), Flush::Now);
        assert_eq!(Flush::from(false), Flush::Defer);
        assert_eq!(Flush::default(), Flush::Defer);
    }

    // =========================================================================
    // JSON objects
    // =========================================================================

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Loadout {
        name: String,
        slots: Vec<u8>,
    }

    #[test]
    fn json_roundtrip() {
        let mut prefs = prefs();
        let loadout = Loadout {
            name: "sniper".to_string(),
            slots: vec![1, 4, 9],
        };
        prefs.put_json("loadout", &loadout, Flush::Defer).expect("put");

        let read: Option<Loadout> = prefs.get_json("loadout").expect("get");
        assert_eq!(read, Some(loadout));
    }

    #[test]
    fn json_absent_is_none() {
        let prefs = prefs();
        let read: Option<Loadout> = prefs.get_json("loadout").expect("get");
        assert_eq!(read, None);
    }

    #[test]
    fn json_malformed_is_error() {
        let mut prefs = prefs();
        prefs.put_string("loadout", "{not json", Flush::Defer).expect("put");
        let err = prefs.get_json::<Loadout>("loadout").unwrap_err();
        assert!(matches!(err, PrefsError::Json(_)));
    }

    // =========================================================================
    // Store failures
    // =========================================================================

    #[test]
    fn store_read_failure_returns_default() {
        let prefs = Prefs::new(BrokenStore);
        assert_eq!(prefs.get_int("level", 7), 7);
        assert_eq!(prefs.get_string("name"), None);
    }

    #[test]
    fn store_write_failure_propagates() {
        let mut prefs = Prefs::new(BrokenStore);
        let err = prefs.put_int("level", 1, Flush::Defer).unwrap_err();
        assert!(matches!(err, PrefsError::Store(_)));
        assert!(prefs.contains_key("level").is_err());
        assert!(prefs.get_json::<Loadout>("loadout").is_err());
    }

    // =========================================================================
    // Logging
    // =========================================================================

    #[test]
    #[traced_test]
    fn malformed_value_is_logged_without_its_content() {
        let mut prefs = prefs();
        prefs.put_string("level", "secret-token", Flush::Defer).expect("put");
        prefs.get_int("level", 0);

        assert!(logs_contain("Setting level is not a valid int"));
        assert!(!logs_contain("secret-token"));
    }
}
