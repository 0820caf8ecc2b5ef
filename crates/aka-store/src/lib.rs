//! In-memory keyed record store with secondary-key aliasing.
//!
//! The store maps canonical keys (see [`aka_key`]) to shared, mutable
//! [`Record`]s. Several keys may point at the *same* record instance, so a
//! write through any one of them is visible through all of them.
//!
//! # Operations
//!
//! - [`KeyedStore::find`] -- deep copy of the current value, or `None`
//! - [`KeyedStore::save`] -- merge-update (shallow object merge)
//! - [`KeyedStore::set`] -- full replace
//! - [`KeyedStore::delete`] -- tombstone; the key mapping survives
//! - [`KeyedStore::secondary_key`] -- bind alias keys to a primary's record
//!
//! # Design Rules
//!
//! 1. A key mapping, once created, is never removed. Only the record's value
//!    changes.
//! 2. Records are created lazily on first write or alias bind.
//! 3. Reads never hand out store-internal state; callers get owned copies.
//! 4. Aliasing an already independently-bound key is a [`StoreError::KeyConflict`].
//! 5. The store is single-threaded. Wrap the whole store in a lock for
//!    cross-thread use.

pub mod alias;
pub mod backing;
pub mod config;
pub mod error;
pub mod record;
pub mod store;

// Re-export primary types at crate root for ergonomic imports.
pub use aka_key::{canonicalize, CanonicalKey, Key};
pub use alias::SecondaryKeys;
pub use backing::RecordMap;
pub use config::{ConflictPolicy, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use record::{Record, RecordRef};
pub use store::{DefaultRecordMap, KeyedStore};
