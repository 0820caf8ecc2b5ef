use aka_key::CanonicalKey;

/// Errors from record store operations.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// A secondary key is already bound to a different, pre-existing record.
    #[error("cannot bind secondary key {key}: already set with another value")]
    KeyConflict { key: CanonicalKey },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
