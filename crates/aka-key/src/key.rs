use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::canonical::{canonicalize, CanonicalKey};

/// A raw key accepted by store operations.
///
/// Any JSON value is a valid key. Objects and arrays are *structured* keys;
/// everything else is a *scalar* key. A `null` key is accepted and
/// canonicalizes to the string `"null"`.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(Value);

impl Key {
    /// Wrap a JSON value as a key.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Returns `true` for object and array keys.
    pub fn is_structured(&self) -> bool {
        matches!(self.0, Value::Object(_) | Value::Array(_))
    }

    /// Canonical string identity of this key.
    pub fn canonical(&self) -> CanonicalKey {
        canonicalize(&self.0)
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.canonical())
    }
}

impl From<Value> for Key {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<&Value> for Key {
    fn from(value: &Value) -> Self {
        Self(value.clone())
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self(Value::String(s.to_string()))
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self(Value::String(s))
    }
}

impl From<&String> for Key {
    fn from(s: &String) -> Self {
        Self(Value::String(s.clone()))
    }
}

impl From<bool> for Key {
    fn from(b: bool) -> Self {
        Self(Value::Bool(b))
    }
}

/// Non-finite floats have no JSON form and become `null`.
impl From<f64> for Key {
    fn from(n: f64) -> Self {
        Self(Value::from(n))
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Key {
                fn from(n: $t) -> Self {
                    Self(Value::from(n))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
