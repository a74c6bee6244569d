//! Field metadata lookup.

use serde::{Deserialize, Serialize};

/// Declared type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// No type constraint.
    Any,
    /// Boolean field.
    Boolean,
    /// Integer field.
    Integer,
    /// Floating point field.
    Float,
    /// Text field.
    Text,
    /// List of values.
    Array,
    /// Nested document.
    Object,
}

impl FieldKind {
    /// Returns `true` for the numeric kinds.
    pub const fn is_numeric(self) -> bool {
        matches!(self, FieldKind::Integer | FieldKind::Float)
    }
}

/// Metadata for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Whether null is an acceptable value.
    pub nullable: bool,
}

/// Field metadata for an entity, keyed by field name.
///
/// A schema never changes once an entity is built from it. The empty
/// schema is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    key: String,
    fields: Vec<FieldDef>,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            key: "id".to_string(),
            fields: Vec::new(),
        }
    }
}

impl Schema {
    /// Creates an empty schema with primary key `id`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the primary key field name.
    #[must_use]
    pub fn key(mut self, name: impl Into<String>) -> Self {
        self.key = name.into();
        self
    }

    /// Declares a non-nullable field. Redeclaring a name replaces it.
    #[must_use]
    pub fn field(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.with_field(FieldDef {
            name: name.into(),
            kind,
            nullable: false,
        })
    }

    /// Declares a nullable field.
    #[must_use]
    pub fn nullable_field(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.with_field(FieldDef {
            name: name.into(),
            kind,
            nullable: true,
        })
    }

    /// Adds a field definition.
    #[must_use]
    pub fn with_field(mut self, def: FieldDef) -> Self {
        match self.fields.iter_mut().find(|f| f.name == def.name) {
            Some(existing) => *existing = def,
            None => self.fields.push(def),
        }
        self
    }

    /// Returns the primary key field name.
    pub fn primary_key(&self) -> &str {
        &self.key
    }

    /// Looks up a field definition.
    pub fn lookup(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns `true` if the field is declared.
    pub fn has_field(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Returns all field definitions in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Returns the declared field names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no field is declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
