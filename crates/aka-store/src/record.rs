//! Shared, mutable value records.
//!
//! A [`Record`] holds the current value of one logical entry. Keys reach it
//! through a [`RecordRef`], a reference-counted handle, so several canonical
//! keys can share one record and observe each other's writes.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use aka_key::is_truthy;
use serde_json::Value;

/// A one-field container holding a value, or nothing once tombstoned.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    pub value: Option<Value>,
}

impl Record {
    pub fn new(value: Value) -> Self {
        Self { value: Some(value) }
    }

    /// The value if it counts as present under [`is_truthy`].
    pub fn present(&self) -> Option<&Value> {
        self.value.as_ref().filter(|v| is_truthy(v))
    }

    /// Shallow-merge the own members of `partial` into the current value.
    ///
    /// When the current value is empty, `partial` becomes the value.
    /// Otherwise existing members are never dropped:
    ///
    /// - object into object: members of `partial` overwrite same-named ones
    /// - array or string into object: elements land under `"0"`, `"1"`, ...
    /// - array into array: elements overwrite by index, extending the array
    ///
    /// A partial without members (number, boolean, null) changes nothing,
    /// and neither does any partial merged into a scalar value.
    pub fn merge(&mut self, partial: Value) {
        let Some(existing) = self.value.as_mut().filter(|v| is_truthy(v)) else {
            self.value = Some(partial);
            return;
        };
        match (existing, partial) {
            (Value::Object(existing), Value::Object(partial)) => existing.extend(partial),
            (Value::Object(existing), Value::Array(items)) => {
                existing.extend(items.into_iter().enumerate().map(|(i, v)| (i.to_string(), v)));
            }
            (Value::Object(existing), Value::String(s)) => {
                existing.extend(
                    s.chars()
                        .enumerate()
                        .map(|(i, c)| (i.to_string(), Value::String(c.to_string()))),
                );
            }
            (Value::Array(existing), Value::Array(items)) => {
                for (i, item) in items.into_iter().enumerate() {
                    match existing.get_mut(i) {
                        Some(slot) => *slot = item,
                        None => existing.push(item),
                    }
                }
            }
            _ => {}
        }
    }

    pub fn replace(&mut self, value: Value) {
        self.value = Some(value);
    }

    pub fn tombstone(&mut self) {
        self.value = None;
    }
}

/// Shared handle to a [`Record`].
///
/// Cloning a `RecordRef` clones the handle, not the record. Two handles are
/// the same record when [`RecordRef::ptr_eq`] holds.
#[derive(Clone, Default)]
pub struct RecordRef(Rc<RefCell<Record>>);

impl RecordRef {
    /// A new record holding `value`.
    pub fn new(value: Value) -> Self {
        Self(Rc::new(RefCell::new(Record::new(value))))
    }

    /// A new record with no value, used as an alias target.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` if both handles point at the same record instance.
    pub fn ptr_eq(&self, other: &RecordRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Owned copy of the stored value, empty values included.
    pub fn value(&self) -> Option<Value> {
        self.0.borrow().value.clone()
    }

    /// Owned copy of the present value, if any.
    pub fn snapshot(&self) -> Option<Value> {
        self.0.borrow().present().cloned()
    }

    pub fn merge(&self, partial: Value) {
        self.0.borrow_mut().merge(partial);
    }

    pub fn replace(&self, value: Value) {
        self.0.borrow_mut().replace(value);
    }

    pub fn tombstone(&self) {
        self.0.borrow_mut().tombstone();
    }

    /// Number of handles (key mappings and clones) sharing this record.
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

impl From<Record> for RecordRef {
    fn from(record: Record) -> Self {
        Self(Rc::new(RefCell::new(record)))
    }
}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordRef")
            .field("value", &self.0.borrow().value)
            .field("handles", &self.handle_count())
            .finish()
    }
}
