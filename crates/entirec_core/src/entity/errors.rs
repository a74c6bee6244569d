//! Validation messages attached to an entity.

use serde::Serialize;
use std::collections::BTreeMap;

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Errors {
    messages: BTreeMap<String, Vec<String>>,
}

impl Errors {
    /// Creates an empty error store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the messages for `field`.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.messages.get(field).map(Vec::as_slice)
    }

    /// Replaces the messages for `field`. An empty list removes the field.
    pub fn set(&mut self, field: impl Into<String>, messages: Vec<String>) {
        let field = field.into();
        if messages.is_empty() {
            self.messages.remove(&field);
        } else {
            self.messages.insert(field, messages);
        }
    }

    /// Appends one message for `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.messages
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Merges `other` in; fields present in both take `other`'s messages.
    pub fn merge(&mut self, other: Errors) {
        for (field, messages) in other.messages {
            self.set(field, messages);
        }
    }

    /// Removes every message.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Returns `true` if no field has messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the number of fields with messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Iterates over `(field, messages)` in field name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.messages
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl<K, I, M> FromIterator<(K, I)> for Errors
where
    K: Into<String>,
    I: IntoIterator<Item = M>,
    M: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut errors = Errors::new();
        for (field, messages) in iter {
            errors.set(field, messages.into_iter().map(Into::into).collect());
        }
        errors
    }
}
