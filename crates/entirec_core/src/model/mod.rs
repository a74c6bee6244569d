//! Model definitions: instance methods and virtual fields.
//!
//! A [`Model`] is shared by every entity bound to it. Its tables are
//! read-mostly: registration normally happens during setup, before
//! entities are worked with, but it goes through `&self` so that a
//! registration made later is seen by entities that are already bound.

mod accessor;
mod registry;

pub use accessor::{Getter, Setter, VirtualField};
pub use registry::ModelRegistry;

use crate::entity::Entity;
use crate::error::EntityResult;
use crate::schema::Schema;
use entirec_value::Value;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// An instance method callable on entities of a model.
///
/// Receives the entity the call was made on and the call arguments.
pub type Method = Arc<dyn Fn(&mut Entity, &[Value]) -> EntityResult<Value> + Send + Sync>;

/// Resolves method names to callables.
///
/// This is the seam entities dispatch unknown method calls through.
pub trait MethodProvider {
    /// Returns the method registered under `name`, if any.
    fn resolve(&self, name: &str) -> Option<Method>;
}

/// A model definition.
pub struct Model {
    name: String,
    schema: Arc<Schema>,
    methods: RwLock<HashMap<String, Method>>,
    accessors: RwLock<HashMap<String, VirtualField>>,
}

impl Model {
    /// Creates a model with an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_schema(name, Schema::default())
    }

    /// Creates a model with the given schema.
    pub fn with_schema(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema: Arc::new(schema),
            methods: RwLock::new(HashMap::new()),
            accessors: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the model identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the model schema.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Registers several instance methods at once.
    ///
    /// Existing methods with the same names are replaced.
    pub fn instance_methods<I, S>(&self, methods: I)
    where
        I: IntoIterator<Item = (S, Method)>,
        S: Into<String>,
    {
        let mut table = self.methods.write();
        for (name, method) in methods {
            let name = name.into();
            debug!(model = %self.name, method = %name, "registered instance method");
            table.insert(name, method);
        }
    }

    /// Registers one instance method.
    pub fn instance_method<F>(&self, name: impl Into<String>, method: F)
    where
        F: Fn(&mut Entity, &[Value]) -> EntityResult<Value> + Send + Sync + 'static,
    {
        let name: String = name.into();
        self.instance_methods([(name, Arc::new(method) as Method)]);
    }

    /// Returns the instance method registered under `name`.
    pub fn method(&self, name: &str) -> Option<Method> {
        self.methods.read().get(name).cloned()
    }

    /// Returns `true` if an instance method is registered under `name`.
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.read().contains_key(name)
    }

    /// Registers a virtual field with an optional getter and setter.
    pub fn virtual_field(
        &self,
        name: impl Into<String>,
        getter: Option<Getter>,
        setter: Option<Setter>,
    ) {
        let name = name.into();
        debug!(
            model = %self.name,
            field = %name,
            get = getter.is_some(),
            set = setter.is_some(),
            "registered virtual field"
        );
        self.accessors
            .write()
            .insert(name, VirtualField { getter, setter });
    }

    /// Registers a virtual getter, keeping any setter already declared.
    pub fn getter<F>(&self, name: impl Into<String>, getter: F)
    where
        F: Fn(&Entity) -> Option<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        let setter = self.virtual_accessor(&name).and_then(|a| a.setter);
        self.virtual_field(name, Some(Arc::new(getter)), setter);
    }

    /// Registers a virtual setter, keeping any getter already declared.
    pub fn setter<F>(&self, name: impl Into<String>, setter: F)
    where
        F: Fn(&mut Entity, Value) -> EntityResult<()> + Send + Sync + 'static,
    {
        let name = name.into();
        let getter = self.virtual_accessor(&name).and_then(|a| a.getter);
        self.virtual_field(name, getter, Some(Arc::new(setter)));
    }

    /// Returns the virtual accessors declared for `name`.
    pub fn virtual_accessor(&self, name: &str) -> Option<VirtualField> {
        self.accessors.read().get(name).cloned()
    }

    /// Returns the names of all virtual fields, sorted.
    pub fn virtual_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.accessors.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl MethodProvider for Model {
    fn resolve(&self, name: &str) -> Option<Method> {
        self.method(name)
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .field("methods", &self.methods.read().len())
            .field("virtual_fields", &self.virtual_names())
            .finish()
    }
}
