//! # entirec Testkit
//!
//! Test utilities for entirec.
//!
//! This crate provides:
//! - Fixture models with virtual fields and instance methods
//! - Property-based test generators using proptest
//! - Tracing setup for tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use entirec_testkit::prelude::*;
//!
//! #[test]
//! fn bumps_views() {
//!     let models = TestModels::new();
//!     let mut post = models.entity(COUNTER_MODEL, fields! { "views" => 1 });
//!     post.call("bump", &[]).unwrap();
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod logging;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::logging::*;
    pub use entirec_core::{fields, Entity, EntityConfig, EntityError, ExportOptions, Fields, Value};
}

pub use fixtures::*;
pub use generators::*;
pub use logging::*;
