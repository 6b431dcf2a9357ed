//! JSON `decode`/`encode` for an embedded scripting runtime.
//!
//! [`json::decode`] turns JSON text into script values and [`json::encode`]
//! does the reverse, inferring whether each table is an array or an object.
//! Hosts expose both to scripts with [`json::preload`] and `require("json")`.

pub mod diagnostic;
pub mod json;
pub mod state;
pub mod table;
pub mod value;

pub use json::JsonError;
pub use state::{RuntimeError, State};
pub use table::{Table, TableRef};
pub use value::Value;
