use std::collections::HashSet;

use serde_json::{Map, Value as JsonValue};

use super::JsonError;
use crate::table::{Key, TableId, TableRef};
use crate::value::Value;

/// Largest magnitude below which every integral f64 is exact (2^53).
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Serializes a script value to compact JSON text.
pub fn encode(value: &Value) -> Result<String, JsonError> {
    let tree = to_json(value)?;
    // Writing an in-memory tree does not fail in practice.
    Ok(serde_json::to_string(&tree)?)
}

/// Serializes a script value to indented JSON text.
pub fn encode_pretty(value: &Value) -> Result<String, JsonError> {
    let tree = to_json(value)?;
    Ok(serde_json::to_string_pretty(&tree)?)
}

/// Converts a script value into a generic JSON tree.
///
/// Recursion follows table nesting, so a chain thousands of tables deep can
/// exhaust the stack of a small thread.
pub fn to_json(value: &Value) -> Result<JsonValue, JsonError> {
    let mut visited = HashSet::new();
    convert(value, &mut visited)
}

fn convert(value: &Value, visited: &mut HashSet<TableId>) -> Result<JsonValue, JsonError> {
    match value {
        Value::Nil => Ok(JsonValue::Null),
        Value::Bool(b) => Ok(JsonValue::Bool(*b)),
        Value::Number(n) => Ok(number(*n)),
        Value::Str(s) => Ok(JsonValue::String(s.clone())),
        Value::Table(t) => table(t, visited),
        Value::Function(_) => Err(JsonError::Function),
        Value::Channel(_) => Err(JsonError::Channel),
        Value::State(_) => Err(JsonError::State),
        Value::UserData(_) => Err(JsonError::UserData),
    }
}

fn number(n: f64) -> JsonValue {
    // -0 stays a float so the sign survives.
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INT && !(n == 0.0 && n.is_sign_negative()) {
        JsonValue::from(n as i64)
    } else {
        // NaN and infinities have no JSON form
        serde_json::Number::from_f64(n).map_or(JsonValue::Null, JsonValue::Number)
    }
}

fn table(t: &TableRef, visited: &mut HashSet<TableId>) -> Result<JsonValue, JsonError> {
    let id = t.id();
    if !visited.insert(id) {
        return Err(JsonError::NestedTables);
    }

    let mut shape = Shape::Array(Vec::new());
    for (key, item) in t.borrow().iter() {
        let item = convert(item, visited)?;
        shape.insert(key, item);
    }

    // Only tables on the current path count, so shared subtables are fine.
    visited.remove(&id);
    Ok(shape.into_json())
}

/// Accumulator for one table. Starts as an array and switches to an object,
/// once and for good, at the first key that is not the next index.
enum Shape {
    Array(Vec<JsonValue>),
    Object(Map<String, JsonValue>),
}

impl Shape {
    fn insert(&mut self, key: &Key, item: JsonValue) {
        if let Shape::Array(items) = self {
            if key.as_index() == Some(items.len() + 1) {
                items.push(item);
                return;
            }
            let fields = items
                .drain(..)
                .enumerate()
                .map(|(i, v)| ((i + 1).to_string(), v))
                .collect();
            *self = Shape::Object(fields);
        }
        if let Shape::Object(fields) = self {
            fields.insert(object_key(key), item);
        }
    }

    fn into_json(self) -> JsonValue {
        match self {
            Shape::Array(items) => JsonValue::Array(items),
            Shape::Object(fields) => JsonValue::Object(fields),
        }
    }
}

fn object_key(key: &Key) -> String {
    match key {
        Key::Str(s) => s.clone(),
        other => other.to_string(),
    }
}
