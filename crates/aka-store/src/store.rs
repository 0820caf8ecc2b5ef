use std::collections::HashMap;
use std::fmt;

use aka_key::{CanonicalKey, Key};
use serde_json::Value;
use tracing::debug;

use crate::backing::RecordMap;
use crate::config::StoreConfig;
use crate::record::RecordRef;

/// Backing map used by [`KeyedStore::new`].
pub type DefaultRecordMap = HashMap<CanonicalKey, RecordRef>;

/// In-memory keyed record store.
///
/// Every operation canonicalizes its key first, then works on the shared
/// record bound to that canonical key. Mutating operations return `&mut Self`
/// so calls can be chained:
///
/// ```
/// use aka_store::KeyedStore;
/// use serde_json::json;
///
/// let mut store = KeyedStore::new();
/// store.set("a", json!({"x": 1})).save("a", json!({"y": 2}));
/// assert_eq!(store.find("a"), Some(json!({"x": 1, "y": 2})));
/// ```
pub struct KeyedStore<M: RecordMap = DefaultRecordMap> {
    pub(crate) records: M,
    pub(crate) config: StoreConfig,
}

impl KeyedStore {
    /// Create a new empty store with its own backing map.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create a new empty store with the given configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        Self::with_backing_and_config(DefaultRecordMap::new(), config)
    }
}

impl Default for KeyedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RecordMap> KeyedStore<M> {
    /// Create a store over a caller-supplied backing map.
    ///
    /// Entries already in `map` are live records of the new store.
    pub fn with_backing(map: M) -> Self {
        Self::with_backing_and_config(map, StoreConfig::default())
    }

    pub fn with_backing_and_config(map: M, config: StoreConfig) -> Self {
        Self {
            records: map,
            config,
        }
    }

    /// The backing map, for inspection.
    pub fn backing(&self) -> &M {
        &self.records
    }

    /// Consume the store and return its backing map.
    pub fn into_backing(self) -> M {
        self.records
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Value operations
    // -----------------------------------------------------------------------

    /// Look up the value bound to `key`.
    ///
    /// Returns `None` when no record exists or its value is empty (see
    /// [`aka_key::is_truthy`]). The returned value is an owned deep copy;
    /// mutating it never affects the store.
    pub fn find(&self, key: impl Into<Key>) -> Option<Value> {
        let key = key.into().canonical();
        self.records.get(&key).and_then(RecordRef::snapshot)
    }

    /// Merge-update the value bound to `key`.
    ///
    /// Object members of `partial` overwrite same-named members of the
    /// current value and other members are kept. An empty or missing value
    /// is simply set to `partial`.
    pub fn save(&mut self, key: impl Into<Key>, partial: Value) -> &mut Self {
        let key = key.into().canonical();
        match self.records.get(&key) {
            Some(record) => record.merge(partial),
            None => self.create(key, RecordRef::new(partial)),
        }
        self
    }

    /// Replace the value bound to `key` wholesale.
    pub fn set(&mut self, key: impl Into<Key>, value: Value) -> &mut Self {
        let key = key.into().canonical();
        match self.records.get(&key) {
            Some(record) => record.replace(value),
            None => self.create(key, RecordRef::new(value)),
        }
        self
    }

    /// Tombstone the value bound to `key`.
    ///
    /// The key mapping and every alias sharing the record stay in place.
    /// Deleting a key that was never written does nothing.
    pub fn delete(&mut self, key: impl Into<Key>) -> &mut Self {
        let key = key.into().canonical();
        if let Some(record) = self.records.get(&key) {
            record.tombstone();
            debug!(key = %key, "tombstoned record");
        }
        self
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    /// Number of key mappings, aliases included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns `true` if `key` is bound to a record, even an empty one.
    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        self.records.contains_key(&key.into().canonical())
    }

    /// Shared handle to the record bound to `key`.
    pub fn record(&self, key: impl Into<Key>) -> Option<RecordRef> {
        self.records.get(&key.into().canonical()).cloned()
    }

    /// Returns `true` if both keys are bound to the identical record.
    pub fn same_record(&self, a: impl Into<Key>, b: impl Into<Key>) -> bool {
        match (
            self.records.get(&a.into().canonical()),
            self.records.get(&b.into().canonical()),
        ) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    pub(crate) fn create(&mut self, key: CanonicalKey, record: RecordRef) {
        debug!(key = %key, "created record");
        self.records.insert(key, record);
    }
}

impl<M: RecordMap> fmt::Debug for KeyedStore<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedStore")
            .field("key_count", &self.records.len())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aka_key::canonicalize;
    use proptest::prelude::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn ck(raw: Value) -> CanonicalKey {
        canonicalize(&raw)
    }

    /// Store over a pre-populated map, like a harness injecting state.
    fn store_with(entries: &[(Value, Value)]) -> KeyedStore {
        let mut map = DefaultRecordMap::new();
        for (k, v) in entries {
            map.insert(ck(k.clone()), RecordRef::new(v.clone()));
        }
        KeyedStore::with_backing(map)
    }

    fn stored(store: &KeyedStore, raw: Value) -> Option<Value> {
        store
            .backing()
            .get(&ck(raw))
            .map(|r| r.value().unwrap_or(Value::Null))
    }

    // -----------------------------------------------------------------------
    // find
    // -----------------------------------------------------------------------

    #[test]
    fn find_existing_value() {
        let store = store_with(&[(json!("a"), json!({"foo": "bar"}))]);
        assert_eq!(store.find("a"), Some(json!({"foo": "bar"})));
    }

    #[test]
    fn find_with_object_key_ignores_member_order() {
        let store = store_with(&[(json!({"a": 1, "b": 2}), json!({"foo": "bar"}))]);
        assert_eq!(store.find(json!({"b": 2, "a": 1})), Some(json!({"foo": "bar"})));
    }

    #[test]
    fn find_missing_returns_none_without_creating() {
        let store = KeyedStore::new();
        assert_eq!(store.find("never-set"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn find_falsy_value_returns_none() {
        let store = store_with(&[(json!("zero"), json!(0)), (json!("empty"), json!(""))]);
        assert_eq!(store.find("zero"), None);
        assert_eq!(store.find("empty"), None);
    }

    #[test]
    fn find_returns_independent_copy() {
        let mut store = KeyedStore::new();
        store.set("k", json!({"list": [1, 2], "inner": {"x": 1}}));

        let mut copy = store.find("k").unwrap();
        copy["inner"]["x"] = json!(99);
        copy["list"].as_array_mut().unwrap().push(json!(3));

        assert_eq!(store.find("k"), Some(json!({"list": [1, 2], "inner": {"x": 1}})));
    }

    #[test]
    fn numeric_and_string_keys_share_identity() {
        let mut store = KeyedStore::new();
        store.set(42, json!("answer"));
        assert_eq!(store.find("42"), Some(json!("answer")));
    }

    #[test]
    fn large_float_and_integer_keys_share_identity() {
        let mut store = KeyedStore::new();
        store.set(10_000_000_000_000_000u64, json!("big"));
        assert_eq!(store.find(1e16), Some(json!("big")));
    }

    // -----------------------------------------------------------------------
    // save
    // -----------------------------------------------------------------------

    #[test]
    fn save_creates_new_value() {
        let mut store = KeyedStore::new();
        store.save("a", json!({"foo": "bar"}));
        assert_eq!(stored(&store, json!("a")), Some(json!({"foo": "bar"})));
    }

    #[test]
    fn save_with_object_key() {
        let mut store = KeyedStore::new();
        store.save(json!({"a": 1, "b": 2}), json!({"foo": "bar"}));
        assert_eq!(stored(&store, json!({"b": 2, "a": 1})), Some(json!({"foo": "bar"})));
    }

    #[test]
    fn save_merges_into_existing_value() {
        let mut store = store_with(&[(json!("a"), json!({"foo": "bar", "ball": "baz"}))]);
        store.save("a", json!({"foo": "flub", "nar": "whal"}));
        assert_eq!(
            stored(&store, json!("a")),
            Some(json!({"foo": "flub", "ball": "baz", "nar": "whal"}))
        );
    }

    #[test]
    fn save_after_set_merges() {
        let mut store = KeyedStore::new();
        store.set("k", json!({"a": 1, "b": 2})).save("k", json!({"b": 3, "c": 4}));
        assert_eq!(store.find("k"), Some(json!({"a": 1, "b": 3, "c": 4})));
    }

    #[test]
    fn save_after_delete_sets_fresh_value() {
        let mut store = KeyedStore::new();
        store
            .set("k", json!({"old": true}))
            .delete("k")
            .save("k", json!({"new": true}));
        assert_eq!(store.find("k"), Some(json!({"new": true})));
    }

    #[test]
    fn save_array_keeps_existing_members() {
        let mut store = KeyedStore::new();
        store.set("k", json!({"keep": 1})).save("k", json!([9]));
        assert_eq!(store.find("k"), Some(json!({"keep": 1, "0": 9})));
    }

    #[test]
    fn save_into_truthy_scalar_keeps_scalar() {
        let mut store = KeyedStore::new();
        store.set("k", json!("text")).save("k", json!({"a": 1}));
        assert_eq!(store.find("k"), Some(json!("text")));
    }

    // -----------------------------------------------------------------------
    // set
    // -----------------------------------------------------------------------

    #[test]
    fn set_creates_new_value() {
        let mut store = KeyedStore::new();
        store.set("a", json!({"foo": "bar"}));
        assert_eq!(stored(&store, json!("a")), Some(json!({"foo": "bar"})));
    }

    #[test]
    fn set_with_object_key() {
        let mut store = KeyedStore::new();
        store.set(json!({"a": 1, "b": 2}), json!({"foo": "bar"}));
        assert_eq!(stored(&store, json!({"b": 2, "a": 1})), Some(json!({"foo": "bar"})));
    }

    #[test]
    fn set_replaces_existing_value() {
        let mut store = store_with(&[(json!("a"), json!({"foo": "bar"}))]);
        store.set("a", json!({"ball": "baz"}));
        assert_eq!(stored(&store, json!("a")), Some(json!({"ball": "baz"})));
    }

    #[test]
    fn record_handle_survives_writes_through_aliases() {
        let mut store = KeyedStore::new();
        store.set("a", json!({"v": 1}));
        store.secondary_key("a", "b").unwrap();

        let handle = store.record("b").unwrap();
        let before = handle.value();
        store.save("a", json!({"w": 2})).set("b", json!({"v": 3})).delete("a");

        assert_eq!(before, Some(json!({"v": 1})));
        assert_eq!(handle.value(), None);
    }

    #[test]
    fn set_keeps_record_identity() {
        let mut store = KeyedStore::new();
        store.set("a", json!(1));
        let before = store.record("a").unwrap();
        store.set("a", json!(2));
        assert!(before.ptr_eq(&store.record("a").unwrap()));
    }

    // -----------------------------------------------------------------------
    // delete
    // -----------------------------------------------------------------------

    #[test]
    fn delete_tombstones_value() {
        let mut store = store_with(&[(json!("a"), json!({"foo": "bar"}))]);
        store.delete("a");
        assert_eq!(stored(&store, json!("a")), Some(Value::Null));
        assert!(store.contains_key("a"));
        assert_eq!(store.find("a"), None);
    }

    #[test]
    fn delete_with_object_key() {
        let mut store = store_with(&[(json!({"a": 1, "b": 2}), json!({"foo": "bar"}))]);
        store.delete(json!({"b": 2, "a": 1}));
        assert_eq!(stored(&store, json!({"a": 1, "b": 2})), Some(Value::Null));
    }

    #[test]
    fn delete_missing_key_creates_nothing() {
        let mut store = KeyedStore::new();
        store.delete("a");
        assert!(!store.contains_key("a"));
        assert!(store.is_empty());
    }

    // -----------------------------------------------------------------------
    // Construction and backing
    // -----------------------------------------------------------------------

    #[test]
    fn stores_do_not_share_state() {
        let mut first = KeyedStore::new();
        first.set("a", json!(1));
        let second = KeyedStore::default();
        assert_eq!(second.find("a"), None);
    }

    #[test]
    fn btree_backing_works() {
        let mut store = KeyedStore::with_backing(BTreeMap::<CanonicalKey, RecordRef>::new());
        store.set("b", json!(2)).set("a", json!(1));
        let keys: Vec<String> = store
            .into_backing()
            .into_keys()
            .map(CanonicalKey::into_string)
            .collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn config_is_kept() {
        let store = KeyedStore::with_config(StoreConfig::eager());
        assert_eq!(store.config(), &StoreConfig::eager());
    }

    #[test]
    fn debug_format() {
        let mut store = KeyedStore::new();
        store.set("x", json!(1));
        let debug = format!("{store:?}");
        assert!(debug.contains("KeyedStore"));
        assert!(debug.contains("key_count"));
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    fn small_object() -> impl Strategy<Value = Value> {
        prop::collection::btree_map("[a-d]{1,2}", any::<i32>(), 1..5)
            .prop_map(|m| json!(m))
    }

    proptest! {
        #[test]
        fn set_then_find_round_trips(key in "[a-z]{1,8}", value in small_object()) {
            let mut store = KeyedStore::new();
            store.set(key.as_str(), value.clone());
            prop_assert_eq!(store.find(key.as_str()), Some(value));
        }

        #[test]
        fn mutating_found_value_never_leaks(key in "[a-z]{1,8}", value in small_object()) {
            let mut store = KeyedStore::new();
            store.set(key.as_str(), value.clone());
            if let Some(Value::Object(mut found)) = store.find(key.as_str()) {
                found.clear();
            }
            prop_assert_eq!(store.find(key.as_str()), Some(value));
        }

        #[test]
        fn save_overrides_only_given_members(base in small_object(), patch in small_object()) {
            let mut store = KeyedStore::new();
            store.set("k", base.clone()).save("k", patch.clone());
            let found = store.find("k").unwrap();
            for (name, v) in patch.as_object().unwrap() {
                prop_assert_eq!(&found[name.as_str()], v);
            }
            for (name, v) in base.as_object().unwrap() {
                if !patch.as_object().unwrap().contains_key(name) {
                    prop_assert_eq!(&found[name.as_str()], v);
                }
            }
        }
    }
}
