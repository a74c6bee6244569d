//! # entirec Value
//!
//! Dynamic field values for entirec records.
//!
//! This crate provides:
//! - [`Value`], the dynamic value stored in an entity field
//! - [`Fields`], an insertion-ordered map from field name to value
//! - Conversions to and from `serde_json::Value`
//!
//! ## Usage
//!
//! ```
//! use entirec_value::{Fields, Value};
//!
//! let mut fields = Fields::new();
//! fields.insert("title", "Hello");
//! fields.insert("count", 3);
//!
//! assert_eq!(fields.get("count"), Some(&Value::Integer(3)));
//! assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["title", "count"]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod fields;
mod json;
mod value;

pub use fields::Fields;
pub use value::Value;

/// Builds a [`Fields`] map from `key => value` pairs.
///
/// ```
/// use entirec_value::{fields, Value};
///
/// let f = fields! { "foo" => "bar", "n" => 1 };
/// assert_eq!(f.get("n"), Some(&Value::Integer(1)));
/// ```
#[macro_export]
macro_rules! fields {
    () => { $crate::Fields::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $(fields.insert($key, $value);)+
        fields
    }};
}
