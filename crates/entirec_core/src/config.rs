//! Entity configuration.

use crate::convert::ConverterRegistry;
use crate::model::{Model, ModelRegistry};
use crate::schema::Schema;
use entirec_value::{Fields, Value};
use std::sync::Arc;

/// How an entity names its model.
#[derive(Debug, Clone)]
pub enum ModelRef {
    /// Resolved by identifier against a [`ModelRegistry`].
    Named(String),
    /// An already resolved model.
    Bound(Arc<Model>),
}

/// Configuration for building an [`Entity`](crate::Entity).
///
/// Every key is optional; the default builds a new, empty entity with no
/// model bound.
#[derive(Debug, Clone, Default)]
pub struct EntityConfig {
    /// Field metadata. Falls back to the model's schema when unset.
    pub schema: Option<Arc<Schema>>,

    /// Owning model.
    pub model: Option<ModelRef>,

    /// Whether the record is already persisted.
    pub exists: bool,

    /// Baseline field values.
    pub data: Fields,

    /// Pending field assignments.
    pub update: Fields,

    /// Pending counter deltas.
    pub increment: Fields,

    /// Related data keyed by relationship name.
    pub relationships: Fields,

    /// Registry used to resolve [`ModelRef::Named`]. Defaults to the
    /// process-wide registry.
    pub registry: Option<Arc<ModelRegistry>>,

    /// Converters used by `to()`. Defaults to the process-wide registry.
    pub converters: Option<Arc<ConverterRegistry>>,
}

impl EntityConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the schema.
    #[must_use]
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = Some(Arc::new(schema));
        self
    }

    /// Names the model by identifier.
    #[must_use]
    pub fn model(mut self, name: impl Into<String>) -> Self {
        self.model = Some(ModelRef::Named(name.into()));
        self
    }

    /// Binds an already resolved model.
    #[must_use]
    pub fn bind(mut self, model: Arc<Model>) -> Self {
        self.model = Some(ModelRef::Bound(model));
        self
    }

    /// Sets whether the record is already persisted.
    #[must_use]
    pub const fn exists(mut self, value: bool) -> Self {
        self.exists = value;
        self
    }

    /// Sets the baseline field values.
    #[must_use]
    pub fn data(mut self, data: Fields) -> Self {
        self.data = data;
        self
    }

    /// Sets pending field assignments.
    #[must_use]
    pub fn update(mut self, update: Fields) -> Self {
        self.update = update;
        self
    }

    /// Sets pending counter deltas.
    #[must_use]
    pub fn increment(mut self, increment: Fields) -> Self {
        self.increment = increment;
        self
    }

    /// Sets related data.
    #[must_use]
    pub fn relationships(mut self, relationships: Fields) -> Self {
        self.relationships = relationships;
        self
    }

    /// Adds one relationship.
    #[must_use]
    pub fn relationship(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.relationships.insert(name, value);
        self
    }

    /// Sets the registry used to resolve a named model.
    #[must_use]
    pub fn registry(mut self, registry: Arc<ModelRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Sets the converter registry.
    #[must_use]
    pub fn converters(mut self, converters: Arc<ConverterRegistry>) -> Self {
        self.converters = Some(converters);
        self
    }
}
