//! Fixture models and entity helpers.
//!
//! Every [`TestModels`] owns its own [`ModelRegistry`], so tests running
//! in parallel never see each other's registrations.

use entirec_core::{
    Entity, EntityConfig, EntityResult, Fields, FieldKind, Model, ModelRegistry, Schema, Value,
};
use std::sync::Arc;

/// Model whose virtual fields `fielda`, `fieldb` and the read-only
/// `field_c` share the real fields `bar` and `baz`.
pub const TRACKED_MODEL: &str = "Tracked";

/// Model with counter instance methods.
pub const COUNTER_MODEL: &str = "Counter";

/// Model with a typed schema keyed by `uuid`.
pub const KEYED_MODEL: &str = "Keyed";

/// A private registry preloaded with the fixture models.
pub struct TestModels {
    /// The registry entities built here resolve against.
    pub registry: Arc<ModelRegistry>,
}

impl TestModels {
    /// Creates a registry holding every fixture model.
    pub fn new() -> Self {
        let registry = Arc::new(ModelRegistry::new());
        define_tracked(&registry.model(TRACKED_MODEL));
        define_counter(&registry.model(COUNTER_MODEL));
        registry.register(Model::with_schema(
            KEYED_MODEL,
            Schema::new()
                .key("uuid")
                .field("uuid", FieldKind::Text)
                .field("title", FieldKind::Text)
                .nullable_field("views", FieldKind::Integer),
        ));
        Self { registry }
    }

    /// Returns a model from this registry, defining it if needed.
    pub fn model(&self, name: &str) -> Arc<Model> {
        self.registry.model(name)
    }

    /// Returns a configuration bound to `model` in this registry.
    pub fn config(&self, model: &str) -> EntityConfig {
        EntityConfig::new()
            .model(model)
            .registry(Arc::clone(&self.registry))
    }

    /// Builds an entity of `model` with baseline `data`.
    pub fn entity(&self, model: &str, data: Fields) -> Entity {
        Entity::new(self.config(model).data(data))
    }

    /// Builds a persisted entity of `model` with baseline `data`.
    pub fn existing(&self, model: &str, data: Fields) -> Entity {
        Entity::new(self.config(model).exists(true).data(data))
    }
}

impl Default for TestModels {
    fn default() -> Self {
        Self::new()
    }
}

fn store(entity: &mut Entity, name: &str, value: Value) -> EntityResult<()> {
    entity.set_raw(name, value);
    Ok(())
}

/// `fielda` reads and writes `bar`. `fieldb` writes `baz` and clears
/// `bar`. `field_c` only reads `bar`; writes go through `setfield_field_c`.
fn define_tracked(model: &Model) {
    model.getter("fielda", |e| e.get_raw("bar"));
    model.setter("fielda", |e, v| store(e, "bar", v));

    model.getter("fieldb", |e| e.get_raw("baz"));
    model.setter("fieldb", |e, v| {
        store(e, "baz", v)?;
        store(e, "bar", Value::Null)
    });

    model.getter("field_c", |e| e.get_raw("bar"));
}

fn define_counter(model: &Model) {
    model.instance_method("hello", |_, _| Ok(Value::from("world")));
    model.instance_method("bump", |e, args| {
        let step = args.first().cloned().unwrap_or(Value::Integer(1));
        e.increment("views", step)
    });
    model.instance_method("validates", |e, _| {
        e.clear_errors();
        if e.is_empty("title") {
            e.add_error("title", "must not be empty");
        }
        Ok(Value::Bool(!e.has_errors()))
    });
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;
    use entirec_core::fields;

    /// A persisted counter entity with a title and some views.
    pub fn persisted_counter(models: &TestModels) -> Entity {
        models.existing(
            COUNTER_MODEL,
            fields! { "id" => 1, "title" => "First", "views" => 10 },
        )
    }

    /// An entity with the given number of integer fields `f0..fN`.
    pub fn wide_entity(models: &TestModels, field_count: usize) -> Entity {
        let data: Fields = (0..field_count)
            .map(|i| (format!("f{i}"), Value::Integer(i as i64)))
            .collect();
        models.existing(COUNTER_MODEL, data)
    }
}
