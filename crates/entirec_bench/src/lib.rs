//! Benchmark utilities.

use entirec_value::{Fields, Value};

/// Generate a baseline of `count` integer fields named `f0..fN`.
pub fn integer_fields(count: usize) -> Fields {
    (0..count)
        .map(|i| (format!("f{i}"), Value::Integer(i as i64)))
        .collect()
}

/// Generate `count` text updates for the fields `f0..fN`.
pub fn text_updates(count: usize) -> Vec<(String, Value)> {
    (0..count)
        .map(|i| (format!("f{i}"), Value::Text(format!("value {i}"))))
        .collect()
}
