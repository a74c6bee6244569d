//! Model registry keyed by model identifier.

use super::Model;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::debug;

static GLOBAL: OnceLock<Arc<ModelRegistry>> = OnceLock::new();

/// Maps model identifiers to shared model definitions.
///
/// Entities resolve their model identifier here when they are built.
/// A process-wide instance is available through [`ModelRegistry::global`];
/// tests and embedders that want isolation pass their own registry in the
/// entity configuration.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: RwLock<HashMap<String, Arc<Model>>>,
}

impl ModelRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry.
    pub fn global() -> &'static Arc<ModelRegistry> {
        GLOBAL.get_or_init(|| Arc::new(ModelRegistry::new()))
    }

    /// Registers a model under its name, replacing any previous one.
    pub fn register(&self, model: Model) -> Arc<Model> {
        let model = Arc::new(model);
        debug!(model = %model.name(), "registered model");
        self.models
            .write()
            .insert(model.name().to_string(), Arc::clone(&model));
        model
    }

    /// Looks up a registered model.
    pub fn get(&self, name: &str) -> Option<Arc<Model>> {
        self.models.read().get(name).cloned()
    }

    /// Returns the model registered under `name`, defining an empty one
    /// if there is none yet.
    pub fn model(&self, name: &str) -> Arc<Model> {
        if let Some(model) = self.get(name) {
            return model;
        }
        let mut models = self.models.write();
        Arc::clone(models.entry(name.to_string()).or_insert_with(|| {
            debug!(model = %name, "defined empty model");
            Arc::new(Model::new(name))
        }))
    }

    /// Returns `true` if a model is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.models.read().contains_key(name)
    }

    /// Returns the registered model names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.models.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Removes a model. Entities already bound to it keep their reference.
    pub fn remove(&self, name: &str) -> Option<Arc<Model>> {
        self.models.write().remove(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_defines_once() {
        let registry = ModelRegistry::new();
        let a = registry.model("Image");
        let b = registry.model("Image");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.names(), vec!["Image".to_string()]);
    }

    #[test]
    fn register_replaces() {
        let registry = ModelRegistry::new();
        let first = registry.model("Image");
        let second = registry.register(Model::new("Image"));
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&registry.get("Image").unwrap(), &second));
    }

    #[test]
    fn remove_model() {
        let registry = ModelRegistry::new();
        registry.model("Tag");
        assert!(registry.contains("Tag"));
        assert!(registry.remove("Tag").is_some());
        assert!(!registry.contains("Tag"));
        assert!(registry.get("Tag").is_none());
    }

    #[test]
    fn global_is_shared() {
        assert!(Arc::ptr_eq(ModelRegistry::global(), ModelRegistry::global()));
    }
}
