//! The [`RecordMap`] trait defining the backing storage of a store.
//!
//! A store indexes its records by [`CanonicalKey`]. Any map type that can
//! look up, insert and count entries can back a store, which lets a test
//! harness build a map, hand it to [`KeyedStore::with_backing`] and inspect
//! it directly afterwards.
//!
//! [`KeyedStore::with_backing`]: crate::KeyedStore::with_backing

use std::collections::{BTreeMap, HashMap};

use aka_key::CanonicalKey;

use crate::record::RecordRef;

/// Backing storage for a [`KeyedStore`](crate::KeyedStore).
///
/// The store only ever adds entries or reads them; it never removes a key
/// mapping, so implementations need no removal operation.
pub trait RecordMap {
    /// The record bound to `key`, if any.
    fn get(&self, key: &CanonicalKey) -> Option<&RecordRef>;

    /// Bind `key` to `record`, replacing any previous binding.
    fn insert(&mut self, key: CanonicalKey, record: RecordRef);

    /// Number of key mappings.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains_key(&self, key: &CanonicalKey) -> bool {
        self.get(key).is_some()
    }
}

impl RecordMap for HashMap<CanonicalKey, RecordRef> {
    fn get(&self, key: &CanonicalKey) -> Option<&RecordRef> {
        HashMap::get(self, key)
    }

    fn insert(&mut self, key: CanonicalKey, record: RecordRef) {
        HashMap::insert(self, key, record);
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }
}

impl RecordMap for BTreeMap<CanonicalKey, RecordRef> {
    fn get(&self, key: &CanonicalKey) -> Option<&RecordRef> {
        BTreeMap::get(self, key)
    }

    fn insert(&mut self, key: CanonicalKey, record: RecordRef) {
        BTreeMap::insert(self, key, record);
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
}
