//! Conversions between [`Value`] and `serde_json::Value`.

use crate::fields::Fields;
use crate::value::Value;
use serde_json::{Map as JsonMap, Number, Value as JsonValue};

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            JsonValue::String(s) => Value::Text(s),
            JsonValue::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<Fields>(),
            ),
        }
    }
}

impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(b),
            Value::Integer(n) => JsonValue::Number(n.into()),
            // Non-finite floats have no JSON form.
            Value::Float(f) => Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number),
            Value::Text(s) => JsonValue::String(s),
            Value::Array(items) => JsonValue::Array(items.into_iter().map(JsonValue::from).collect()),
            Value::Map(fields) => {
                let mut map = JsonMap::new();
                for (k, v) in fields {
                    map.insert(k, JsonValue::from(v));
                }
                JsonValue::Object(map)
            }
        }
    }
}

impl From<Fields> for JsonValue {
    fn from(fields: Fields) -> Self {
        JsonValue::from(Value::Map(fields))
    }
}
