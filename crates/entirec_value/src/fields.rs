//! Insertion-ordered field map.

use crate::value::Value;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An insertion-ordered map from field name to [`Value`].
///
/// Records hold a handful of fields, so entries are kept in a vector and
/// looked up linearly. Inserting an existing key replaces the value in
/// place and keeps the original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: Vec<(String, Value)>,
}

impl Fields {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Inserts a value, returning the previous one if the key existed.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Removes `key`, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.position(key).map(|idx| self.entries.remove(idx).1)
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Copies every entry of `other` into this map.
    pub fn extend_from(&mut self, other: &Fields) {
        for (k, v) in other.iter() {
            self.insert(k, v.clone());
        }
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterates over values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Fields {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl IntoIterator for Fields {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct FieldsVisitor;

impl<'de> Visitor<'de> for FieldsVisitor {
    type Value = Fields;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map with string keys")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Fields, A::Error> {
        let mut fields = Fields::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            fields.insert(key, value);
        }
        Ok(fields)
    }
}

impl<'de> Deserialize<'de> for Fields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FieldsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn insert_replaces_in_place() {
        let mut f = Fields::new();
        f.insert("a", 1);
        f.insert("b", 2);
        assert_eq!(f.insert("a", 3), Some(Value::Integer(1)));
        assert_eq!(f.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(f.get("a"), Some(&Value::Integer(3)));
    }

    #[test]
    fn remove_keeps_order() {
        let mut f: Fields = vec![("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        assert_eq!(f.remove("b"), Some(Value::Integer(2)));
        assert_eq!(f.remove("missing"), None);
        assert_eq!(f.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn extend_from_overwrites() {
        let mut base: Fields = vec![("a", 1), ("b", 2)].into_iter().collect();
        let over: Fields = vec![("b", 20), ("c", 30)].into_iter().collect();
        base.extend_from(&over);
        assert_eq!(base.get("b"), Some(&Value::Integer(20)));
        assert_eq!(base.len(), 3);
    }

    #[test]
    fn get_mut_updates() {
        let mut f: Fields = vec![("n", 1)].into_iter().collect();
        if let Some(v) = f.get_mut("n") {
            *v = Value::Integer(9);
        }
        assert_eq!(f.get("n"), Some(&Value::Integer(9)));
    }

    proptest! {
        #[test]
        fn json_round_trip_keeps_order(
            keys in prop::collection::vec("[a-z]{1,8}", 0..12),
            seed in any::<i64>(),
        ) {
            let fields: Fields = keys
                .iter()
                .enumerate()
                .map(|(i, k)| (k.clone(), Value::Integer(seed.wrapping_add(i as i64))))
                .collect();
            let text = serde_json::to_string(&fields).unwrap();
            let back: Fields = serde_json::from_str(&text).unwrap();
            prop_assert_eq!(back.keys().collect::<Vec<_>>(), fields.keys().collect::<Vec<_>>());
            prop_assert_eq!(back, fields);
        }
    }
}
