use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single preference value: typed scalars under string keys, no nesting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Ordered key/value preference map.
///
/// Reads are typed: asking for a key that is missing or holds another type
/// yields `None`. Absence is a normal outcome, not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Prefs {
    values: BTreeMap<String, PrefValue>,
}

impl Prefs {
    pub fn new() -> Self {
        Prefs::default()
    }

    pub fn set_int(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_owned(), PrefValue::Int(value));
    }

    pub fn set_float(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_owned(), PrefValue::Float(value));
    }

    pub fn set_text(&mut self, key: &str, value: impl Into<String>) {
        self.values
            .insert(key.to_owned(), PrefValue::Text(value.into()));
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.values.get(key) {
            Some(PrefValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_float(&self, key: &str) -> Option<f64> {
        match self.values.get(key) {
            Some(PrefValue::Float(v)) => Some(*v),
            Some(PrefValue::Int(v)) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn get_text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(PrefValue::Text(v)) => Some(v),
            _ => None,
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<PrefValue> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PrefValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
