use std::collections::HashMap;
use std::rc::Rc;

use crate::table::{Table, TableRef};
use crate::value::{Function, ThreadHandle, Value};

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct RuntimeError {
    pub message: String,
}

impl RuntimeError {
    pub fn new(msg: impl Into<String>) -> Self {
        RuntimeError { message: msg.into() }
    }
}

type Result<T> = std::result::Result<T, RuntimeError>;

/// Native function body: receives the calling state and its arguments,
/// returns any number of results.
pub type NativeFn = fn(&mut State, &[Value]) -> Result<Vec<Value>>;

/// Builds a module value the first time it is required.
pub type Loader = fn(&mut State) -> Result<Value>;

/// Host interpreter state: module registry and object factory for native code.
#[derive(Default)]
pub struct State {
    preload: HashMap<String, Loader>,
    loaded: HashMap<String, Value>,
    next_thread: usize,
}

impl State {
    pub fn new() -> Self {
        State::default()
    }

    pub fn new_table(&self) -> TableRef {
        Table::new_ref()
    }

    pub fn new_function(&self, name: &str, body: NativeFn) -> Value {
        Value::Function(Rc::new(Function::new(name, body)))
    }

    /// Child interpreter state (coroutine) handle.
    pub fn new_thread(&mut self) -> Value {
        self.next_thread += 1;
        Value::State(ThreadHandle::new(self.next_thread))
    }

    pub fn set_funcs(&self, table: &TableRef, funcs: &[(&str, NativeFn)]) {
        for (name, body) in funcs {
            table.set_str(*name, self.new_function(name, *body));
        }
    }

    /// Registers a loader so `require(name)` can build the module later.
    pub fn preload_module(&mut self, name: &str, loader: Loader) {
        self.preload.insert(name.to_string(), loader);
    }

    /// Returns the module value, running its loader on first use.
    pub fn require(&mut self, name: &str) -> Result<Value> {
        if let Some(module) = self.loaded.get(name) {
            return Ok(module.clone());
        }
        let loader = self
            .preload
            .get(name)
            .copied()
            .ok_or_else(|| RuntimeError::new(format!("module '{}' not found", name)))?;
        let module = loader(self)?;
        // A loader returning nothing still marks the module as loaded.
        let module = if module.is_nil() { Value::Bool(true) } else { module };
        self.loaded.insert(name.to_string(), module.clone());
        Ok(module)
    }

    pub fn call(&mut self, function: &Value, args: &[Value]) -> Result<Vec<Value>> {
        match function {
            Value::Function(f) => f.call(self, args),
            other => Err(RuntimeError::new(format!(
                "attempt to call a {} value",
                other.type_name()
            ))),
        }
    }

    /// Looks up `module.field` and calls it.
    pub fn call_field(&mut self, module: &Value, field: &str, args: &[Value]) -> Result<Vec<Value>> {
        let table = module.as_table().ok_or_else(|| {
            RuntimeError::new(format!("attempt to index a {} value", module.type_name()))
        })?;
        let function = table.get_str(field);
        self.call(&function, args)
    }
}

/// Argument `n` (1-based) as a string. Numbers are coerced to their string form.
pub fn check_string(args: &[Value], n: usize, fname: &str) -> Result<String> {
    match args.get(n - 1) {
        Some(Value::Str(s)) => Ok(s.clone()),
        Some(v @ Value::Number(_)) => Ok(v.to_string()),
        Some(other) => Err(bad_argument(n, fname, "string", other.type_name())),
        None => Err(bad_argument(n, fname, "string", "no value")),
    }
}

/// Argument `n` (1-based) of any kind, nil included, as long as it was passed.
pub fn check_any(args: &[Value], n: usize, fname: &str) -> Result<Value> {
    args.get(n - 1)
        .cloned()
        .ok_or_else(|| RuntimeError::new(format!("bad argument #{} to '{}' (value expected)", n, fname)))
}

fn bad_argument(n: usize, fname: &str, expected: &str, got: &str) -> RuntimeError {
    RuntimeError::new(format!(
        "bad argument #{} to '{}' ({} expected, got {})",
        n, fname, expected, got
    ))
}
