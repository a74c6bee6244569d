//! # entirec Core
//!
//! Change-tracking entity records for a data-mapping layer.
//!
//! This crate provides:
//! - [`Entity`]: one in-memory record with baseline data, pending updates,
//!   pending counter deltas, relationships and validation messages
//! - [`Model`] and [`ModelRegistry`]: shared model definitions carrying
//!   instance methods and virtual fields
//! - [`ConverterRegistry`]: format converters used by [`Entity::to`]
//!
//! An entity performs no I/O; persisting it is the job of the layer that
//! owns it, which calls [`Entity::sync`] once a write went through.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod convert;
mod entity;
mod error;
mod model;
mod schema;

pub use config::{EntityConfig, ModelRef};
pub use convert::{Conversion, Converter, ConverterRegistry};
pub use entity::{Entity, Errors, Export, ExportOptions};
pub use error::{EntityError, EntityResult};
pub use model::{Getter, Method, MethodProvider, Model, ModelRegistry, Setter, VirtualField};
pub use schema::{FieldDef, FieldKind, Schema};

pub use entirec_value::{fields, Fields, Value};
