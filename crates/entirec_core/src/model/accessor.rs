//! Virtual field accessors.

use crate::entity::Entity;
use crate::error::EntityResult;
use entirec_value::Value;
use std::fmt;
use std::sync::Arc;

/// Computes a virtual field from the entity's real fields.
///
/// `None` means the field is absent.
pub type Getter = Arc<dyn Fn(&Entity) -> Option<Value> + Send + Sync>;

/// Stores a value written to a virtual field.
///
/// A setter may write zero, one or many real fields.
pub type Setter = Arc<dyn Fn(&mut Entity, Value) -> EntityResult<()> + Send + Sync>;

/// Getter/setter pair declared for a virtual field.
#[derive(Clone, Default)]
pub struct VirtualField {
    /// Read accessor.
    pub getter: Option<Getter>,
    /// Write accessor.
    pub setter: Option<Setter>,
}

impl VirtualField {
    /// Evaluates the getter against `entity`.
    pub fn read(&self, entity: &Entity) -> Option<Value> {
        self.getter.as_ref().and_then(|get| get(entity))
    }
}

impl fmt::Debug for VirtualField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualField")
            .field("getter", &self.getter.is_some())
            .field("setter", &self.setter.is_some())
            .finish()
    }
}
