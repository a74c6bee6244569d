//! Property-based test generators using proptest.

use entirec_core::{Fields, Value};
use proptest::prelude::*;

/// Strategy for generating field names.
pub fn field_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,15}").expect("Invalid regex")
}

/// Strategy for generating non-null numbers.
pub fn number_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        3 => (-1_000_000i64..1_000_000).prop_map(Value::Integer),
        1 => (-1000i32..1000).prop_map(|n| Value::Float(f64::from(n) / 4.0)),
    ]
}

/// Strategy for generating integer steps.
pub fn step_strategy() -> impl Strategy<Value = i64> {
    -1000i64..1000
}

/// Strategy for generating text that is never blank.
pub fn text_strategy() -> impl Strategy<Value = Value> {
    prop::string::string_regex("[a-zA-Z][a-zA-Z ]{0,20}")
        .expect("Invalid regex")
        .prop_map(Value::Text)
}

/// Strategy for generating scalar values.
pub fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        1 => Just(Value::Null),
        1 => any::<bool>().prop_map(Value::Bool),
        3 => number_strategy(),
        3 => text_strategy(),
    ]
}

/// Strategy for generating nested values.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec((field_name_strategy(), inner), 0..4)
                .prop_map(|pairs| Value::Map(pairs.into_iter().collect())),
        ]
    })
}

/// Strategy for generating field maps.
pub fn fields_strategy(max_fields: usize) -> impl Strategy<Value = Fields> {
    prop::collection::vec((field_name_strategy(), value_strategy()), 0..max_fields)
        .prop_map(|pairs| pairs.into_iter().collect())
}

/// Strategy for generating field maps of numbers only.
pub fn counters_strategy(max_fields: usize) -> impl Strategy<Value = Fields> {
    prop::collection::vec((field_name_strategy(), number_strategy()), 0..max_fields)
        .prop_map(|pairs| pairs.into_iter().collect())
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
