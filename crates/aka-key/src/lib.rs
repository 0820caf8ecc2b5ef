//! Key canonicalization for the aka record store.
//!
//! Every public store operation first reduces its raw key to a
//! [`CanonicalKey`]: a deterministic string identity. Scalar keys become their
//! plain string form, while structured keys (JSON objects and arrays) are
//! serialized with object members sorted by name at every depth, so two keys
//! that are deep-equal canonicalize identically regardless of how they were
//! built.
//!
//! # Key Types
//!
//! - [`Key`] -- a raw key (any JSON value) accepted by store operations
//! - [`CanonicalKey`] -- the opaque string identity used as the mapping index
//! - [`canonicalize`] -- the pure function from one to the other
//! - [`is_truthy`] -- the emptiness rule applied to stored values

pub mod canonical;
pub mod key;
pub mod truthy;

pub use canonical::{canonicalize, CanonicalKey};
pub use key::Key;
pub use truthy::is_truthy;
