use serde::{Deserialize, Serialize};

/// How a multi-key [`secondary_key`](crate::KeyedStore::secondary_key) call
/// reacts to a conflicting key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Validate the whole batch first. A conflict leaves the store exactly as
    /// it was, including not creating a missing primary record.
    #[default]
    Atomic,
    /// Bind keys in order and stop at the first conflict. Bindings made
    /// before the conflicting key, and a freshly created primary record,
    /// remain in place.
    Eager,
}

/// Configuration for a [`KeyedStore`](crate::KeyedStore).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Conflict handling for batched alias binds.
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,
}

impl StoreConfig {
    /// Key-by-key alias binding with no rollback on conflict.
    pub fn eager() -> Self {
        Self {
            conflict_policy: ConflictPolicy::Eager,
        }
    }
}
