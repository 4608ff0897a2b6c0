//! Flattening of nested JSON objects into single-level records.
//!
//! Nested keys are joined into one path (`iaqi` + `pm25` + `v` becomes
//! `iaqi_pm25_v`). Lists are never descended into: they are kept as opaque
//! values, which is how station coordinates (`[lat, long]`) survive as a
//! single column.

use serde_json::{Map, Value};
use std::collections::HashSet;

/// Separator placed between a parent path and a child key.
pub const DEFAULT_SEPARATOR: &str = "_";

/// A flat mapping from joined field path to a terminal value.
///
/// No value is ever a JSON object. Key order is the order in which the
/// flattener first met each path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRecord {
    fields: Map<String, Value>,
}

impl FlatRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn insert(&mut self, key: String, value: Value) {
        self.fields.insert(key, value);
    }
}

impl IntoIterator for FlatRecord {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Flatten `d` with the default separator and no parent path.
pub fn flatten(d: &Value, exclude: &HashSet<&str>) -> FlatRecord {
    flatten_with(d, "", DEFAULT_SEPARATOR, exclude)
}

/// Flatten `d` below `parent`, joining path segments with `sep`.
///
/// A composed key found in `exclude` is skipped. Exclusion is checked on
/// leaves only, so excluding an object's own path does not hide its children.
/// A non-object `d` yields the single pair `(parent, d)`.
pub fn flatten_with(d: &Value, parent: &str, sep: &str, exclude: &HashSet<&str>) -> FlatRecord {
    let mut out = FlatRecord::default();
    flatten_into(&mut out, d, parent, sep, exclude);
    out
}

fn flatten_into(out: &mut FlatRecord, d: &Value, parent: &str, sep: &str, exclude: &HashSet<&str>) {
    let Value::Object(map) = d else {
        out.insert(parent.to_string(), d.clone());
        return;
    };

    for (k, v) in map {
        let key = if parent.is_empty() {
            k.clone()
        } else {
            format!("{parent}{sep}{k}")
        };

        if v.is_object() {
            flatten_into(out, v, &key, sep, exclude);
        } else if !exclude.contains(key.as_str()) {
            out.insert(key, v.clone());
        }
    }
}
