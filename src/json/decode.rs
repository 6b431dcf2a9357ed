use serde_json::Value as JsonValue;

use super::JsonError;
use crate::table::{Table, TableRef};
use crate::value::Value;

/// Parses JSON text into a script value.
pub fn decode(text: &str) -> Result<Value, JsonError> {
    let tree: JsonValue = serde_json::from_str(text)?;
    Ok(from_json(&tree))
}

/// Converts an already-parsed tree. Never fails.
pub fn from_json(value: &JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Nil,
        JsonValue::Bool(b) => Value::Bool(*b),
        // Always representable without arbitrary_precision
        JsonValue::Number(n) => n.as_f64().map_or(Value::Nil, Value::Number),
        JsonValue::String(s) => Value::Str(s.clone()),
        JsonValue::Array(items) => {
            let mut arr = Table::with_capacity(items.len(), 0);
            for item in items {
                arr.append(from_json(item));
            }
            Value::Table(TableRef::new(arr))
        }
        JsonValue::Object(fields) => {
            let mut tbl = Table::with_capacity(0, fields.len());
            for (key, item) in fields {
                tbl.set_str(key.as_str(), from_json(item));
            }
            Value::Table(TableRef::new(tbl))
        }
    }
}
