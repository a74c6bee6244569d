//! The change-tracking entity record.

use super::errors::Errors;
use super::export::{Export, ExportOptions};
use crate::config::{EntityConfig, ModelRef};
use crate::convert::{Conversion, ConverterRegistry};
use crate::error::{EntityError, EntityResult};
use crate::model::{MethodProvider, Model, ModelRegistry, VirtualField};
use crate::schema::Schema;
use entirec_value::{Fields, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// One in-memory record with change tracking.
///
/// An entity keeps the values it was loaded with (`data`, the baseline)
/// apart from what has happened since: explicit assignments (`update`)
/// and counter deltas (`increment`). The current value of a field is
/// resolved in this order:
///
/// 1. `update[field]`
/// 2. `data[field]`
/// 3. absent
///
/// with any pending delta in `increment[field]` added on top (an absent
/// or null base counts as `0`). Only [`Entity::sync`] folds pending
/// state into the baseline.
///
/// Reads and writes through [`Entity::get`] and [`Entity::set`] consult
/// the bound model's virtual fields first. Virtual fields are never
/// stored, so they only show up in [`Entity::modified`] and
/// [`Entity::export`] through the real fields their setters write.
///
/// # Example
///
/// ```
/// use entirec_core::{Entity, EntityConfig};
/// use entirec_value::{fields, Value};
///
/// let mut post = Entity::new(EntityConfig::new().data(fields! { "views" => 10 }));
/// post.increment("views", 1).unwrap();
/// post.set("title", "Hello").unwrap();
///
/// assert_eq!(post.get("views"), Some(Value::Integer(11)));
/// assert_eq!(post.modified().len(), 2);
///
/// post.sync();
/// assert!(post.modified().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Entity {
    schema: Arc<Schema>,
    model: Option<Arc<Model>>,
    exists: bool,
    data: Fields,
    update: Fields,
    increment: Fields,
    relationships: Fields,
    errors: Errors,
    converters: Arc<ConverterRegistry>,
}

impl Default for Entity {
    fn default() -> Self {
        Self::new(EntityConfig::default())
    }
}

impl Entity {
    /// Builds an entity from its configuration.
    ///
    /// A model named by identifier is resolved against the configured
    /// registry, or the process-wide one. An identifier nobody registered
    /// yet gets an empty model, so methods registered on it later are
    /// still seen by this entity.
    pub fn new(config: EntityConfig) -> Self {
        let EntityConfig {
            schema,
            model,
            exists,
            data,
            update,
            increment,
            relationships,
            registry,
            converters,
        } = config;

        let model = match model {
            Some(ModelRef::Bound(model)) => Some(model),
            Some(ModelRef::Named(name)) => {
                let registry = registry.as_ref().unwrap_or(ModelRegistry::global());
                Some(registry.model(&name))
            }
            None => None,
        };

        let schema = schema
            .or_else(|| model.as_ref().map(|m| Arc::clone(m.schema())))
            .unwrap_or_default();

        let increment = pending_deltas(&data, &update, increment);

        Self {
            schema,
            model,
            exists,
            data,
            update,
            increment,
            relationships,
            errors: Errors::new(),
            converters: converters.unwrap_or_else(|| Arc::clone(ConverterRegistry::global())),
        }
    }

    /// Returns the field metadata.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the bound model.
    pub fn model(&self) -> Option<&Arc<Model>> {
        self.model.as_ref()
    }

    /// Returns the bound model's identifier.
    pub fn model_name(&self) -> Option<&str> {
        self.model.as_deref().map(Model::name)
    }

    /// Returns whether the record is already persisted.
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Returns the value of the schema's primary key field.
    pub fn id(&self) -> Option<Value> {
        self.get(self.schema.primary_key())
    }

    fn virtual_accessor(&self, name: &str) -> Option<VirtualField> {
        self.model.as_ref()?.virtual_accessor(name)
    }

    /// Reads a field.
    ///
    /// Relationships win over everything else, then the model's virtual
    /// getter for `name`, then the stored value.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(related) = self.relationships.get(name) {
            return Some(related.clone());
        }
        if let Some(accessor) = self.virtual_accessor(name) {
            if accessor.getter.is_some() {
                trace!(field = name, "resolving virtual field");
                return accessor.read(self);
            }
        }
        self.get_raw(name)
    }

    /// Reads a stored field, bypassing relationships and virtual fields.
    pub fn get_raw(&self, name: &str) -> Option<Value> {
        let base = self.update.get(name).or_else(|| self.data.get(name));
        let Some(delta) = self.increment.get(name) else {
            return base.cloned();
        };
        let start = match base {
            None | Some(Value::Null) => Value::Integer(0),
            Some(value) => value.clone(),
        };
        Some(start.checked_add(delta).unwrap_or(start))
    }

    /// Writes a field.
    ///
    /// A virtual setter declared by the model for `name` takes the write.
    /// A virtual field with a getter but no setter is written through the
    /// model method `setfield_<name>`. Anything else becomes a pending
    /// update.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> EntityResult<()> {
        let value = value.into();
        match self.virtual_accessor(name) {
            Some(VirtualField {
                setter: Some(setter),
                ..
            }) => {
                trace!(field = name, "writing virtual field");
                setter(self, value)
            }
            Some(VirtualField {
                getter: Some(_),
                setter: None,
            }) => self.call(&format!("setfield_{name}"), &[value]).map(|_| ()),
            _ => {
                self.set_raw(name, value);
                Ok(())
            }
        }
    }

    /// Writes several fields, in iteration order.
    ///
    /// Stops at the first failing write.
    pub fn set_many<I, K, V>(&mut self, values: I) -> EntityResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (name, value) in values {
            self.set(name.as_ref(), value)?;
        }
        Ok(())
    }

    /// Stores a pending update, bypassing virtual fields.
    ///
    /// An assignment supersedes any pending delta for the field.
    pub fn set_raw(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        self.increment.remove(&name);
        self.update.insert(name, value);
    }

    /// Returns `true` if `name` resolves to a non-null value.
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some_and(|value| !value.is_null())
    }

    /// Returns `true` if `name` is absent or resolves to a blank value.
    ///
    /// See [`Value::is_blank`].
    pub fn is_empty(&self, name: &str) -> bool {
        self.get(name).map_or(true, |value| value.is_blank())
    }

    /// Adds `step` to a numeric field and returns the new value.
    ///
    /// An unset field starts from `0`. Deltas accumulate in the pending
    /// increment store until [`Entity::sync`].
    ///
    /// # Errors
    ///
    /// [`EntityError::FieldNotIncrementable`] if the field holds a
    /// non-numeric value, or `step` is not a number.
    pub fn increment(&mut self, name: &str, step: impl Into<Value>) -> EntityResult<Value> {
        let step = step.into();
        if !step.is_numeric() {
            return Err(EntityError::field_not_incrementable(name));
        }
        if let Some(current) = self.get_raw(name) {
            if !current.is_null() && !current.is_numeric() {
                debug!(field = name, kind = current.type_name(), "refused increment");
                return Err(EntityError::field_not_incrementable(name));
            }
        }

        let delta = match self.increment.get(name) {
            Some(pending) => pending.checked_add(&step).unwrap_or(step),
            None => step,
        };
        self.increment.insert(name, delta);

        let current = self.get_raw(name).unwrap_or(Value::Integer(0));
        trace!(field = name, value = ?current, "incremented field");
        Ok(current)
    }

    /// Subtracts `step` from a numeric field. Same as incrementing by the
    /// negated step.
    ///
    /// # Errors
    ///
    /// See [`Entity::increment`].
    pub fn decrement(&mut self, name: &str, step: impl Into<Value>) -> EntityResult<Value> {
        let step = step
            .into()
            .negated()
            .ok_or_else(|| EntityError::field_not_incrementable(name))?;
        self.increment(name, step)
    }

    /// Returns the merged current state of every stored field.
    pub fn data(&self) -> Fields {
        let mut merged = self.data.clone();
        merged.extend_from(&self.update);
        for name in self.increment.keys() {
            if let Some(value) = self.get_raw(name) {
                merged.insert(name, value);
            }
        }
        merged
    }

    /// Returns every field whose current value differs from the baseline,
    /// including fields the baseline does not have.
    pub fn modified(&self) -> BTreeMap<String, bool> {
        self.data()
            .into_iter()
            .filter(|(name, value)| !self.data.get(name).is_some_and(|base| base.same_as(value)))
            .map(|(name, _)| (name, true))
            .collect()
    }

    /// Returns `true` if the field's current value differs from the
    /// baseline.
    pub fn is_modified(&self, name: &str) -> bool {
        match (self.data.get(name), self.get_raw(name)) {
            (Some(base), Some(current)) => !base.same_as(&current),
            (None, None) => false,
            _ => true,
        }
    }

    /// Returns `true` if there are pending updates or increments.
    pub fn is_dirty(&self) -> bool {
        !self.update.is_empty() || !self.increment.is_empty()
    }

    /// Folds pending updates and increments into the baseline and clears
    /// them.
    pub fn sync(&mut self) {
        self.data = self.data();
        self.update.clear();
        self.increment.clear();
        debug!(model = ?self.model_name(), fields = self.data.len(), "synced entity");
    }

    /// Exports the raw state.
    ///
    /// With [`ExportOptions::with_virtual`] the export also carries every
    /// virtual field of the model that currently resolves to a non-null
    /// value.
    pub fn export(&self, options: ExportOptions) -> Export {
        Export {
            exists: self.exists,
            data: self.data.clone(),
            update: self.update.clone(),
            increment: self.increment.clone(),
            virtual_fields: options.virtual_fields.then(|| self.virtual_values()),
        }
    }

    fn virtual_values(&self) -> Fields {
        let Some(model) = self.model.as_ref() else {
            return Fields::new();
        };
        let mut values = Fields::new();
        for name in model.virtual_names() {
            let resolved = model
                .virtual_accessor(&name)
                .and_then(|accessor| accessor.read(self));
            if let Some(value) = resolved.filter(|v| !v.is_null()) {
                values.insert(name, value);
            }
        }
        values
    }

    /// Converts the merged state using the converter for `format`.
    ///
    /// Without a converter for `format` the entity itself comes back.
    pub fn to(&self, format: &str) -> Conversion<'_> {
        match self.converters.get(format) {
            Some(convert) => Conversion::Converted(convert(&self.data())),
            None => {
                debug!(format = format, "no converter registered, returning entity unchanged");
                Conversion::Unchanged(self)
            }
        }
    }

    /// Calls an instance method of the bound model.
    ///
    /// # Errors
    ///
    /// [`EntityError::UnboundMethod`] when no model is bound or the model
    /// has no method called `name`. Errors raised by the method itself
    /// are returned unchanged.
    pub fn call(&mut self, name: &str, args: &[Value]) -> EntityResult<Value> {
        let Some(method) = self.model.as_ref().and_then(|model| model.resolve(name)) else {
            debug!(model = ?self.model_name(), method = name, "unbound method call");
            return Err(EntityError::unbound_method(name));
        };
        debug!(model = ?self.model_name(), method = name, args = args.len(), "dispatching instance method");
        method(self, args)
    }

    /// Runs the model's `validates` method.
    ///
    /// # Errors
    ///
    /// See [`Entity::call`].
    pub fn validates(&mut self, args: &[Value]) -> EntityResult<Value> {
        self.call("validates", args)
    }

    /// Returns related data by relationship name.
    pub fn relationship(&self, name: &str) -> Option<&Value> {
        self.relationships.get(name)
    }

    /// Returns all related data.
    pub fn relationships(&self) -> &Fields {
        &self.relationships
    }

    /// Returns `true` if a relationship is loaded under `name`.
    pub fn has_relationship(&self, name: &str) -> bool {
        self.relationships.contains_key(name)
    }

    /// Returns every validation message.
    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    /// Returns the validation messages of one field.
    pub fn errors_for(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field)
    }

    /// Merges validation messages into the store.
    pub fn set_errors(&mut self, errors: Errors) {
        self.errors.merge(errors);
    }

    /// Appends a validation message for `field`.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.add(field, message);
    }

    /// Removes every validation message.
    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    /// Returns `true` if any validation message is stored.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Keeps the configured deltas that `increment` itself would accept: a
/// numeric delta on an absent, null or numeric field.
fn pending_deltas(data: &Fields, update: &Fields, increment: Fields) -> Fields {
    increment
        .into_iter()
        .filter(|(name, delta)| {
            let base = update.get(name).or_else(|| data.get(name));
            let accepted =
                delta.is_numeric() && base.map_or(true, |v| v.is_null() || v.is_numeric());
            if !accepted {
                debug!(field = %name, kind = delta.type_name(), "dropped pending increment");
            }
            accepted
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use entirec_value::fields;

    fn isolated(name: &str) -> (Arc<ModelRegistry>, EntityConfig) {
        let registry = Arc::new(ModelRegistry::new());
        let config = EntityConfig::new()
            .model(name)
            .registry(Arc::clone(&registry));
        (registry, config)
    }

    #[test]
    fn unset_field_is_absent() {
        let entity = Entity::default();
        assert_eq!(entity.get("foo"), None);
        assert!(!entity.has("foo"));
        assert!(entity.is_empty("foo"));
    }

    #[test]
    fn update_wins_over_data() {
        let mut entity = Entity::new(EntityConfig::new().data(fields! { "title" => "old" }));
        entity.set("title", "new").unwrap();
        assert_eq!(entity.get("title"), Some(Value::from("new")));
        assert_eq!(entity.get_raw("title"), Some(Value::from("new")));
    }

    #[test]
    fn null_field_is_not_set() {
        let entity = Entity::new(EntityConfig::new().data(fields! { "x" => Value::Null }));
        assert!(!entity.has("x"));
        assert!(entity.is_empty("x"));
    }

    #[test]
    fn blank_values_are_empty_but_present() {
        let entity = Entity::new(EntityConfig::new().data(fields! { "zero" => 0, "text" => "" }));
        assert!(entity.has("zero"));
        assert!(entity.is_empty("zero"));
        assert!(entity.has("text"));
        assert!(entity.is_empty("text"));
    }

    #[test]
    fn increment_reads_through_update() {
        let mut entity = Entity::new(EntityConfig::new().data(fields! { "n" => 1 }));
        entity.set("n", 5).unwrap();
        assert_eq!(entity.increment("n", 2).unwrap(), Value::Integer(7));
        assert_eq!(entity.export(ExportOptions::new()).increment, fields! { "n" => 2 });
    }

    #[test]
    fn assignment_supersedes_pending_delta() {
        let mut entity = Entity::default();
        entity.increment("n", 3).unwrap();
        entity.set("n", 10).unwrap();
        assert_eq!(entity.get("n"), Some(Value::Integer(10)));
        assert!(entity.export(ExportOptions::new()).increment.is_empty());
    }

    #[test]
    fn float_steps() {
        let mut entity = Entity::new(EntityConfig::new().data(fields! { "score" => 1 }));
        entity.increment("score", 0.5).unwrap();
        assert_eq!(entity.get("score"), Some(Value::Float(1.5)));
    }

    #[test]
    fn null_counts_as_zero() {
        let mut entity = Entity::new(EntityConfig::new().data(fields! { "n" => Value::Null }));
        assert_eq!(entity.increment("n", 1).unwrap(), Value::Integer(1));
    }

    #[test]
    fn non_numeric_step_is_refused() {
        let mut entity = Entity::default();
        let err = entity.increment("n", "one").unwrap_err();
        assert_eq!(err, EntityError::field_not_incrementable("n"));
        let err = entity.decrement("n", true).unwrap_err();
        assert_eq!(err, EntityError::field_not_incrementable("n"));
    }

    #[test]
    fn non_numeric_baseline_is_refused() {
        let mut entity = Entity::new(EntityConfig::new().data(fields! { "title" => "x" }));
        let err = entity.increment("title", 1).unwrap_err();
        assert_eq!(err.to_string(), "Field 'title' cannot be incremented.");
        assert!(!entity.is_dirty());
    }

    #[test]
    fn sync_collapses_pending_state() {
        let mut entity = Entity::new(EntityConfig::new().data(fields! { "a" => 1, "n" => 4 }));
        entity.set("a", 2).unwrap();
        entity.increment("n", 1).unwrap();
        entity.set("b", "new").unwrap();
        assert!(entity.is_dirty());

        entity.sync();

        assert!(!entity.is_dirty());
        assert!(entity.modified().is_empty());
        let export = entity.export(ExportOptions::new());
        assert_eq!(export.data, fields! { "a" => 2, "n" => 5, "b" => "new" });
        assert!(export.update.is_empty());
        assert!(export.increment.is_empty());
    }

    #[test]
    fn setting_same_value_is_not_modified() {
        let mut entity = Entity::new(EntityConfig::new().data(fields! { "a" => 1 }));
        entity.set("a", 1).unwrap();
        assert!(entity.modified().is_empty());
        assert!(!entity.is_modified("a"));
        entity.set("a", 2).unwrap();
        assert!(entity.is_modified("a"));
    }

    #[test]
    fn nan_baseline_is_not_modified() {
        let entity = Entity::new(EntityConfig::new().data(fields! { "x" => f64::NAN }));
        assert!(entity.modified().is_empty());
        assert!(!entity.is_modified("x"));
    }

    #[test]
    fn non_numeric_configured_delta_is_dropped() {
        let mut entity = Entity::new(
            EntityConfig::new()
                .data(fields! { "n" => 1 })
                .increment(fields! { "n" => "x", "m" => 2 }),
        );
        assert_eq!(entity.export(ExportOptions::new()).increment, fields! { "m" => 2 });
        assert_eq!(entity.get("n"), Some(Value::Integer(1)));
        assert_eq!(entity.increment("n", 1).unwrap(), Value::Integer(2));
        assert_eq!(entity.get("m"), Some(Value::Integer(2)));
    }

    #[test]
    fn configured_delta_on_text_is_dropped() {
        let mut entity = Entity::new(
            EntityConfig::new()
                .data(fields! { "title" => "x", "views" => 3 })
                .update(fields! { "score" => "high" })
                .increment(fields! { "title" => 2, "score" => 1, "views" => 2 }),
        );
        let export = entity.export(ExportOptions::new());
        assert_eq!(export.increment, fields! { "views" => 2 });

        entity.sync();
        assert_eq!(
            entity.data(),
            fields! { "title" => "x", "views" => 5, "score" => "high" }
        );
    }

    #[test]
    fn relationships_are_read_first() {
        let mut entity = Entity::new(
            EntityConfig::new()
                .data(fields! { "tags" => "raw" })
                .relationship("tags", vec!["a", "b"]),
        );
        assert_eq!(entity.get("tags"), Some(Value::from(vec!["a", "b"])));
        assert!(entity.has_relationship("tags"));

        entity.set("tags", "changed").unwrap();
        assert_eq!(entity.get("tags"), Some(Value::from(vec!["a", "b"])));
        assert_eq!(entity.get_raw("tags"), Some(Value::from("changed")));
    }

    #[test]
    fn virtual_getter_and_setter() {
        let (registry, config) = isolated("Person");
        let model = registry.model("Person");
        model.getter("full_name", |e| {
            let first = e.get_raw("first")?;
            let last = e.get_raw("last")?;
            Some(Value::from(format!(
                "{} {}",
                first.as_text().unwrap_or_default(),
                last.as_text().unwrap_or_default()
            )))
        });
        model.setter("full_name", |e, value| {
            let text = value.as_text().unwrap_or_default().to_string();
            let mut parts = text.splitn(2, ' ');
            e.set_raw("first", parts.next().unwrap_or_default());
            e.set_raw("last", parts.next().unwrap_or_default());
            Ok(())
        });

        let mut entity = Entity::new(config);
        assert!(!entity.has("full_name"));

        entity.set("full_name", "Ada Lovelace").unwrap();
        assert_eq!(entity.get("first"), Some(Value::from("Ada")));
        assert_eq!(entity.get("full_name"), Some(Value::from("Ada Lovelace")));
        assert_eq!(entity.modified().keys().collect::<Vec<_>>(), vec!["first", "last"]);
    }

    #[test]
    fn getter_only_field_dispatches_setfield() {
        let (registry, config) = isolated("Slugged");
        let model = registry.model("Slugged");
        model.getter("slug", |e| e.get_raw("slug_source"));

        let mut entity = Entity::new(config);
        let err = entity.set("slug", "a-b").unwrap_err();
        assert_eq!(err, EntityError::unbound_method("setfield_slug"));

        model.instance_method("setfield_slug", |e, args| {
            e.set_raw("slug_source", args[0].clone());
            Ok(Value::Null)
        });
        entity.set("slug", "a-b").unwrap();
        assert_eq!(entity.get("slug"), Some(Value::from("a-b")));
    }

    #[test]
    fn call_without_model() {
        let mut entity = Entity::default();
        let err = entity.call("hello", &[]).unwrap_err();
        assert_eq!(err.to_string(), "No model bound or unhandled method call 'hello'.");
    }

    #[test]
    fn call_passes_arguments() {
        let (registry, config) = isolated("Calc");
        registry.model("Calc").instance_method("add", |_, args| {
            let sum = args.iter().filter_map(Value::as_integer).sum::<i64>();
            Ok(Value::Integer(sum))
        });
        let mut entity = Entity::new(config);
        let result = entity.call("add", &[Value::from(2), Value::from(3)]).unwrap();
        assert_eq!(result, Value::Integer(5));
    }

    #[test]
    fn validates_is_dispatched() {
        let (registry, config) = isolated("Checked");
        registry.model("Checked").instance_method("validates", |e, _| {
            if e.is_empty("title") {
                e.add_error("title", "is required");
            }
            Ok(Value::Bool(!e.has_errors()))
        });
        let mut entity = Entity::new(config);
        assert_eq!(entity.validates(&[]).unwrap(), Value::Bool(false));
        assert_eq!(entity.errors_for("title"), Some(&["is required".to_string()][..]));

        entity.clear_errors();
        entity.set("title", "ok").unwrap();
        assert_eq!(entity.validates(&[]).unwrap(), Value::Bool(true));
    }

    #[test]
    fn schema_falls_back_to_model() {
        let registry = Arc::new(ModelRegistry::new());
        registry.register(Model::with_schema(
            "Keyed",
            Schema::new().key("uuid").field("uuid", crate::FieldKind::Text),
        ));
        let entity = Entity::new(
            EntityConfig::new()
                .model("Keyed")
                .registry(registry)
                .data(fields! { "uuid" => "abc" }),
        );
        assert_eq!(entity.schema().primary_key(), "uuid");
        assert_eq!(entity.id(), Some(Value::from("abc")));
        assert_eq!(entity.model_name(), Some("Keyed"));
    }

    #[test]
    fn export_without_virtual_key() {
        let entity = Entity::new(EntityConfig::new().exists(true));
        let json = serde_json::to_value(entity.export(ExportOptions::new())).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 4);
        assert_eq!(json["exists"], serde_json::Value::Bool(true));
    }

    #[test]
    fn to_uses_entity_converters() {
        let converters = Arc::new(ConverterRegistry::new());
        converters.register("keys", |f| Value::from(f.keys().map(String::from).collect::<Vec<_>>()));
        let entity = Entity::new(
            EntityConfig::new()
                .data(fields! { "a" => 1 })
                .converters(converters),
        );
        assert_eq!(entity.to("keys").into_value(), Some(Value::from(vec!["a"])));
        assert!(!entity.to("array").is_converted());
    }
}
