use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Integral floats below this magnitude print in plain integer form.
const PLAIN_INT_LIMIT: f64 = 1e21;

/// Deterministic string identity of a raw key.
///
/// Two keys share a `CanonicalKey` exactly when they are value-equal under
/// [`canonicalize`]. Note that scalar keys lose their type: the string `"42"`
/// and the number `42` canonicalize to the same identity.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    /// The canonical string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CanonicalKey({:?})", self.0)
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonicalize a raw key.
///
/// Objects and arrays serialize to compact JSON with object members sorted by
/// name at every depth. Scalars convert directly: strings verbatim, numbers
/// as their shortest decimal text (integral floats print without a fraction,
/// so `1.0` and `1` agree), booleans and `null` as their literal names.
///
/// # Examples
///
/// ```
/// use aka_key::canonicalize;
/// use serde_json::json;
///
/// assert_eq!(canonicalize(&json!({"b": 2, "a": 1})).as_str(), r#"{"a":1,"b":2}"#);
/// assert_eq!(canonicalize(&json!(42)).as_str(), "42");
/// assert_eq!(canonicalize(&json!("42")).as_str(), "42");
/// ```
pub fn canonicalize(raw: &Value) -> CanonicalKey {
    let text = match raw {
        Value::String(s) => s.clone(),
        Value::Number(n) => number_text(n),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Object(_) | Value::Array(_) => {
            let mut out = String::new();
            write_stable(raw, &mut out);
            out
        }
    };
    CanonicalKey(text)
}

fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f == 0.0 => "0".to_string(),
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < PLAIN_INT_LIMIT => {
            // Exact decimal expansion, matching the integer text of the same value.
            format!("{f:.0}")
        }
        _ => n.to_string(),
    }
}

fn write_stable(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&number_text(n)),
        Value::String(s) => out.push_str(&quote(s)),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_stable(item, out);
            }
            out.push(']');
        }
        Value::Object(members) => {
            let mut entries: Vec<(&String, &Value)> = members.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (name, member)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&quote(name));
                out.push(':');
                write_stable(member, out);
            }
            out.push('}');
        }
    }
}

fn quote(s: &str) -> String {
    // Serializing a str into JSON cannot fail.
    serde_json::to_string(s).unwrap_or_default()
}
