//! Secondary-key binding.
//!
//! [`KeyedStore::secondary_key`] makes extra keys resolve to the record of a
//! primary key. Afterwards every read and write through any of the keys sees
//! the same value, and a tombstone through one of them empties the record
//! for all of them without unbinding anything.

use aka_key::{CanonicalKey, Key};
use serde_json::Value;
use tracing::{debug, warn};

use crate::backing::RecordMap;
use crate::config::ConflictPolicy;
use crate::error::{StoreError, StoreResult};
use crate::record::RecordRef;
use crate::store::KeyedStore;

/// One or more raw keys to bind as aliases.
///
/// A single key converts from anything that converts into a [`Key`]; lists
/// convert from vectors, arrays and slices. A bare JSON array value is
/// treated as a list of keys. To alias a structured key that is itself an
/// array, wrap it in [`Key`] first.
#[derive(Clone, Debug, PartialEq)]
pub struct SecondaryKeys(Vec<Key>);

impl SecondaryKeys {
    pub fn one(key: impl Into<Key>) -> Self {
        Self(vec![key.into()])
    }

    pub fn many<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn canonical_keys(&self) -> Vec<CanonicalKey> {
        self.0.iter().map(Key::canonical).collect()
    }
}

impl From<Key> for SecondaryKeys {
    fn from(key: Key) -> Self {
        Self::one(key)
    }
}

impl From<&str> for SecondaryKeys {
    fn from(key: &str) -> Self {
        Self::one(key)
    }
}

impl From<String> for SecondaryKeys {
    fn from(key: String) -> Self {
        Self::one(key)
    }
}

impl From<i64> for SecondaryKeys {
    fn from(key: i64) -> Self {
        Self::one(key)
    }
}

impl From<i32> for SecondaryKeys {
    fn from(key: i32) -> Self {
        Self::one(key)
    }
}

impl From<Value> for SecondaryKeys {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::many(items),
            other => Self::one(other),
        }
    }
}

impl<K: Into<Key>> From<Vec<K>> for SecondaryKeys {
    fn from(keys: Vec<K>) -> Self {
        Self::many(keys)
    }
}

impl<K: Into<Key>, const N: usize> From<[K; N]> for SecondaryKeys {
    fn from(keys: [K; N]) -> Self {
        Self::many(keys)
    }
}

impl<K: Into<Key> + Clone> From<&[K]> for SecondaryKeys {
    fn from(keys: &[K]) -> Self {
        Self::many(keys.iter().cloned())
    }
}

impl<M: RecordMap> KeyedStore<M> {
    /// Bind one or more secondary keys to the record of `primary`.
    ///
    /// A missing primary gets an empty record to bind to. A secondary key
    /// that is unbound becomes an alias of the primary's record; one already
    /// bound to that same record is left alone. A secondary key bound to a
    /// *different* record fails with [`StoreError::KeyConflict`].
    ///
    /// Under [`ConflictPolicy::Atomic`] the whole batch is checked before
    /// anything changes, so a conflict leaves the store untouched. Under
    /// [`ConflictPolicy::Eager`] keys are bound in order and the bindings
    /// made before the conflicting key are kept.
    pub fn secondary_key(
        &mut self,
        primary: impl Into<Key>,
        secondaries: impl Into<SecondaryKeys>,
    ) -> StoreResult<&mut Self> {
        let primary = primary.into().canonical();
        let secondaries = secondaries.into().canonical_keys();
        let existing = self.records.get(&primary).cloned();

        if self.config.conflict_policy == ConflictPolicy::Atomic {
            for secondary in &secondaries {
                self.check_binding(secondary, existing.as_ref())?;
            }
        }

        let target = match existing {
            Some(record) => record,
            None => {
                let record = RecordRef::empty();
                self.create(primary.clone(), record.clone());
                record
            }
        };

        for secondary in secondaries {
            self.check_binding(&secondary, Some(&target))?;
            if !self.records.contains_key(&secondary) {
                debug!(primary = %primary, secondary = %secondary, "bound secondary key");
                self.records.insert(secondary, target.clone());
            }
        }
        Ok(self)
    }

    fn check_binding(
        &self,
        secondary: &CanonicalKey,
        target: Option<&RecordRef>,
    ) -> StoreResult<()> {
        match self.records.get(secondary) {
            Some(bound) if !target.is_some_and(|t| t.ptr_eq(bound)) => {
                warn!(key = %secondary, "secondary key already bound to another record");
                Err(StoreError::KeyConflict {
                    key: secondary.clone(),
                })
            }
            _ => Ok(()),
        }
    }
}
