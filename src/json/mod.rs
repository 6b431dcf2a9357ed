//! The `json` script module.
//!
//! ```text
//! local json = require("json")
//! local t, err = json.decode('{"a":[1,2]}')
//! local s, err = json.encode(t)
//! ```

pub mod decode;
pub mod encode;
pub mod error;

pub use decode::{decode, from_json};
pub use encode::{encode, encode_pretty, to_json};
pub use error::JsonError;

use crate::state::{self, NativeFn, RuntimeError, State};
use crate::value::Value;

/// Registers the module so scripts can `require("json")`.
pub fn preload(state: &mut State) {
    state.preload_module("json", loader);
}

/// Builds the module table.
pub fn loader(state: &mut State) -> Result<Value, RuntimeError> {
    let module = state.new_table();
    state.set_funcs(&module, API);
    Ok(Value::Table(module))
}

const API: &[(&str, NativeFn)] = &[
    ("decode", api_decode as NativeFn),
    ("encode", api_encode as NativeFn),
];

fn api_decode(_: &mut State, args: &[Value]) -> Result<Vec<Value>, RuntimeError> {
    let text = state::check_string(args, 1, "decode")?;
    Ok(match decode(&text) {
        Ok(value) => vec![value],
        Err(e) => failure(e),
    })
}

fn api_encode(_: &mut State, args: &[Value]) -> Result<Vec<Value>, RuntimeError> {
    let value = state::check_any(args, 1, "encode")?;
    Ok(match encode(&value) {
        Ok(text) => vec![Value::Str(text)],
        Err(e) => failure(e),
    })
}

fn failure(e: JsonError) -> Vec<Value> {
    vec![Value::Nil, Value::Str(e.to_string())]
}
