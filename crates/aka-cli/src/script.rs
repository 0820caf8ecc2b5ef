//! JSON-lines operation scripts.
//!
//! Each non-blank line is one operation object, for example
//! `{"op": "secondary_key", "key": "a", "secondary": ["b", "c"]}`.
//! Lines starting with `#` are comments.

use aka_store::{Key, KeyedStore, RecordMap, StoreError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One store operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    Find { key: Value },
    Save { key: Value, value: Value },
    Set { key: Value, value: Value },
    Delete { key: Value },
    SecondaryKey { key: Value, secondary: Value },
}

impl Op {
    pub fn name(&self) -> &'static str {
        match self {
            Op::Find { .. } => "find",
            Op::Save { .. } => "save",
            Op::Set { .. } => "set",
            Op::Delete { .. } => "delete",
            Op::SecondaryKey { .. } => "secondary_key",
        }
    }

    pub fn key(&self) -> &Value {
        match self {
            Op::Find { key }
            | Op::Save { key, .. }
            | Op::Set { key, .. }
            | Op::Delete { key }
            | Op::SecondaryKey { key, .. } => key,
        }
    }
}

/// Result of applying one operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// A `find` result; `None` when nothing is stored.
    Found(Option<Value>),
    Done,
    Failed(StoreError),
}

/// A parsed operation with its 1-based line number.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub line: usize,
    pub op: Op,
}

pub fn parse_script(text: &str) -> anyhow::Result<Vec<Step>> {
    text.lines()
        .enumerate()
        .map(|(i, raw)| (i + 1, raw.trim()))
        .filter(|(_, raw)| !raw.is_empty() && !raw.starts_with('#'))
        .map(|(line, raw)| {
            let op: Op = serde_json::from_str(raw)
                .with_context(|| format!("line {line}: malformed operation"))?;
            Ok::<_, anyhow::Error>(Step { line, op })
        })
        .collect()
}

pub fn apply<M: RecordMap>(store: &mut KeyedStore<M>, op: &Op) -> Outcome {
    match op {
        Op::Find { key } => Outcome::Found(store.find(key)),
        Op::Save { key, value } => {
            store.save(key, value.clone());
            Outcome::Done
        }
        Op::Set { key, value } => {
            store.set(key, value.clone());
            Outcome::Done
        }
        Op::Delete { key } => {
            store.delete(key);
            Outcome::Done
        }
        Op::SecondaryKey { key, secondary } => match store.secondary_key(key, secondary.clone()) {
            Ok(_) => Outcome::Done,
            Err(e) => Outcome::Failed(e),
        },
    }
}

/// Canonical form of a key argument given on the command line.
pub fn canonical_of(arg: &str) -> String {
    let value = serde_json::from_str(arg).unwrap_or_else(|_| Value::String(arg.to_string()));
    Key::from(value).canonical().into_string()
}
