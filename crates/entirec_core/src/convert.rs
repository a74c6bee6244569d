//! Format converters for [`Entity::to`](crate::Entity::to).

use crate::entity::Entity;
use entirec_value::{Fields, Value};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::debug;

static GLOBAL: OnceLock<Arc<ConverterRegistry>> = OnceLock::new();

/// Turns an entity's merged field map into another representation.
pub type Converter = Arc<dyn Fn(&Fields) -> Value + Send + Sync>;

/// Result of [`Entity::to`](crate::Entity::to).
#[derive(Debug, Clone)]
pub enum Conversion<'a> {
    /// A converter was registered for the format.
    Converted(Value),
    /// No converter was registered; the entity is handed back as-is.
    Unchanged(&'a Entity),
}

impl<'a> Conversion<'a> {
    /// Returns `true` if a converter ran.
    pub fn is_converted(&self) -> bool {
        matches!(self, Conversion::Converted(_))
    }

    /// Returns the converted value, if any.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Conversion::Converted(value) => Some(value),
            Conversion::Unchanged(_) => None,
        }
    }

    /// Returns the entity, if no conversion happened.
    pub fn entity(&self) -> Option<&'a Entity> {
        match self {
            Conversion::Converted(_) => None,
            Conversion::Unchanged(entity) => Some(entity),
        }
    }
}

/// Converters keyed by format name.
///
/// [`ConverterRegistry::with_defaults`] knows two formats:
/// - `array`: the merged field map itself
/// - `json`: the merged field map rendered as compact JSON text
pub struct ConverterRegistry {
    converters: RwLock<HashMap<String, Converter>>,
}

impl ConverterRegistry {
    /// Creates a registry with no converters.
    pub fn new() -> Self {
        Self {
            converters: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a registry holding the built-in converters.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register("array", |fields| Value::Map(fields.clone()));
        registry.register("json", |fields| {
            serde_json::to_string(fields).map_or(Value::Null, Value::Text)
        });
        registry
    }

    /// Returns the process-wide registry, holding the built-in converters.
    pub fn global() -> &'static Arc<ConverterRegistry> {
        GLOBAL.get_or_init(|| Arc::new(ConverterRegistry::with_defaults()))
    }

    /// Registers a converter, replacing any previous one for `format`.
    pub fn register<F>(&self, format: impl Into<String>, converter: F)
    where
        F: Fn(&Fields) -> Value + Send + Sync + 'static,
    {
        let format = format.into();
        debug!(format = %format, "registered converter");
        self.converters.write().insert(format, Arc::new(converter));
    }

    /// Returns the converter for `format`.
    pub fn get(&self, format: &str) -> Option<Converter> {
        self.converters.read().get(format).cloned()
    }

    /// Returns `true` if a converter is registered for `format`.
    pub fn contains(&self, format: &str) -> bool {
        self.converters.read().contains_key(format)
    }

    /// Returns the registered format names, sorted.
    pub fn formats(&self) -> Vec<String> {
        let mut formats: Vec<String> = self.converters.read().keys().cloned().collect();
        formats.sort();
        formats
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("formats", &self.formats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entirec_value::fields;

    #[test]
    fn defaults() {
        let registry = ConverterRegistry::with_defaults();
        assert_eq!(registry.formats(), vec!["array".to_string(), "json".to_string()]);

        let data = fields! { "foo" => "bar", "n" => 2 };
        let array = registry.get("array").unwrap();
        assert_eq!(array(&data), Value::Map(data.clone()));

        let json = registry.get("json").unwrap();
        assert_eq!(json(&data), Value::from(r#"{"foo":"bar","n":2}"#));
    }

    #[test]
    fn empty_registry() {
        let registry = ConverterRegistry::new();
        assert!(registry.get("array").is_none());
        assert!(!registry.contains("json"));
    }

    #[test]
    fn custom_converter() {
        let registry = ConverterRegistry::new();
        registry.register("count", |fields| Value::Integer(fields.len() as i64));
        let count = registry.get("count").unwrap();
        assert_eq!(count(&fields! { "a" => 1, "b" => 2 }), Value::Integer(2));
    }
}
