//! Emptiness rule for stored values.

use serde_json::Value;

/// Returns `true` when a stored value counts as present.
///
/// `null`, `false`, numeric zero and the empty string are empty. Every other
/// value is present, including empty arrays and empty objects.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
