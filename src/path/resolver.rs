//! Path resolution
//!
//! Walks a document along a [`JsonPath`] and exposes the parent container of
//! the addressed slot.

use std::mem;

use serde_json::{Map, Value};

use super::{parse_index, JsonPath};
use crate::codec::kind_of;
use crate::error::{JsonSetsError, Result};

/// Parent container of a path plus the unresolved last key
///
/// `last` is `None` for the root path; the container is then the root itself.
#[derive(Debug)]
pub struct Resolved<'a> {
    container: &'a mut Value,
    last: Option<String>,
    path: String,
}

/// Resolve `path` against `root`, creating missing intermediate objects
///
/// `null` met on the way is replaced by an empty object. Steps into arrays must
/// be in-range indices; steps into scalars fail.
pub fn resolve<'a>(path: &str, root: &'a mut Value) -> Result<Resolved<'a>> {
    let (steps, last) = JsonPath::parse(path)?.into_parts();

    let mut current = root;
    for step in &steps {
        current = descend(current, step, path)?;
    }

    if last.is_some() && current.is_null() {
        *current = Value::Object(Map::new());
    }

    Ok(Resolved {
        container: current,
        last,
        path: path.to_string(),
    })
}

/// Read-only lookup, never creates anything
pub fn lookup<'v>(path: &str, root: &'v Value) -> Result<Option<&'v Value>> {
    let parsed = JsonPath::parse(path)?;

    let mut current = root;
    for segment in parsed.segments() {
        match child(current, segment) {
            Some(next) => current = next,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}

/// The array addressed by `path`, without creating anything on the way
pub fn sequence_at<'a>(path: &str, root: &'a mut Value) -> Result<&'a mut Vec<Value>> {
    let found = lookup(path, root)?.map(kind_of);
    match found {
        Some("array") => resolve(path, root)?.into_sequence(),
        Some(kind) => Err(JsonSetsError::NotASequence {
            path: path.to_string(),
            found: kind,
        }),
        None => Err(JsonSetsError::NotASequence {
            path: path.to_string(),
            found: "nothing",
        }),
    }
}

impl<'a> Resolved<'a> {
    /// The parent container
    pub fn container(&self) -> &Value {
        self.container
    }

    /// The unresolved last key
    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }

    pub fn is_root(&self) -> bool {
        self.last.is_none()
    }

    /// Value addressed by the path (the container itself for the root path)
    pub fn get(&self) -> Option<&Value> {
        match &self.last {
            None => Some(&*self.container),
            Some(key) => child(self.container, key),
        }
    }

    /// Write `value` at the addressed slot, returning the previous value
    ///
    /// Arrays accept an in-range index (replace) or `len` (append).
    pub fn set(self, value: Value) -> Result<Option<Value>> {
        let Resolved { container, last, path } = self;
        let Some(key) = last else {
            return Ok(Some(mem::replace(container, value)));
        };

        match container {
            Value::Object(map) => Ok(map.insert(key, value)),
            Value::Array(items) => {
                let len = items.len();
                match parse_index(&key) {
                    Some(i) if i < len => Ok(Some(mem::replace(&mut items[i], value))),
                    Some(i) if i == len => {
                        items.push(value);
                        Ok(None)
                    }
                    Some(_) => Err(JsonSetsError::IndexOutOfRange { path, index: key, len }),
                    None => Err(JsonSetsError::PathConflict {
                        path,
                        segment: key,
                        kind: "array",
                    }),
                }
            }
            other => Err(JsonSetsError::PathConflict {
                path,
                segment: key,
                kind: kind_of(other),
            }),
        }
    }

    /// Remove the addressed slot, returning what was there
    ///
    /// The root path empties the container to `{}`.
    pub fn remove(self) -> Option<Value> {
        let Resolved { container, last, .. } = self;
        let Some(key) = last else {
            return Some(mem::replace(container, Value::Object(Map::new())));
        };

        match container {
            Value::Object(map) => map.shift_remove(key.as_str()),
            Value::Array(items) => parse_index(&key)
                .filter(|&i| i < items.len())
                .map(|i| items.remove(i)),
            _ => None,
        }
    }

    /// The addressed slot as a mutable array
    pub fn into_sequence(self) -> Result<&'a mut Vec<Value>> {
        let Resolved { container, last, path } = self;
        let target = match last {
            None => Some(container),
            Some(key) => child_mut(container, &key),
        };

        match target {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(JsonSetsError::NotASequence {
                path,
                found: kind_of(other),
            }),
            None => Err(JsonSetsError::NotASequence {
                path,
                found: "nothing",
            }),
        }
    }
}

// =============================================================================
// Private Helpers
// =============================================================================

fn descend<'a>(node: &'a mut Value, step: &str, path: &str) -> Result<&'a mut Value> {
    if node.is_null() {
        *node = Value::Object(Map::new());
    }

    match node {
        Value::Object(map) => {
            let next = map
                .entry(step)
                .or_insert_with(|| Value::Object(Map::new()));
            if next.is_null() {
                *next = Value::Object(Map::new());
            }
            Ok(next)
        }
        Value::Array(items) => {
            let len = items.len();
            match parse_index(step) {
                Some(i) if i < len => Ok(&mut items[i]),
                Some(_) => Err(JsonSetsError::IndexOutOfRange {
                    path: path.to_string(),
                    index: step.to_string(),
                    len,
                }),
                None => Err(JsonSetsError::PathConflict {
                    path: path.to_string(),
                    segment: step.to_string(),
                    kind: "array",
                }),
            }
        }
        other => Err(JsonSetsError::PathConflict {
            path: path.to_string(),
            segment: step.to_string(),
            kind: kind_of(other),
        }),
    }
}

fn child<'v>(node: &'v Value, key: &str) -> Option<&'v Value> {
    match node {
        Value::Object(map) => map.get(key),
        Value::Array(items) => parse_index(key).and_then(|i| items.get(i)),
        _ => None,
    }
}

fn child_mut<'v>(node: &'v mut Value, key: &str) -> Option<&'v mut Value> {
    match node {
        Value::Object(map) => map.get_mut(key),
        Value::Array(items) => parse_index(key).and_then(move |i| items.get_mut(i)),
        _ => None,
    }
}
