use std::cell::{Ref, RefCell, RefMut};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use indexmap::IndexMap;

use crate::state::RuntimeError;
use crate::value::{format_number, Value};

/// Stable identity of a table for as long as any handle to it is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(usize);

impl TableId {
    pub fn addr(self) -> usize {
        self.0
    }
}

/// A table key: any value except nil and NaN.
#[derive(Debug, Clone)]
pub enum Key {
    Bool(bool),
    Number(f64),
    Str(String),
    /// Reference kinds, keyed by identity.
    Ref(Value),
}

impl Key {
    pub fn from_value(value: Value) -> Result<Key, RuntimeError> {
        match value {
            Value::Nil => Err(RuntimeError::new("table index is nil")),
            Value::Number(n) if n.is_nan() => Err(RuntimeError::new("table index is NaN")),
            // -0.0 and 0.0 are the same key
            Value::Number(n) => Ok(Key::Number(n + 0.0)),
            Value::Bool(b) => Ok(Key::Bool(b)),
            Value::Str(s) => Ok(Key::Str(s)),
            other => Ok(Key::Ref(other)),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Key::Bool(b) => Value::Bool(*b),
            Key::Number(n) => Value::Number(*n),
            Key::Str(s) => Value::Str(s.clone()),
            Key::Ref(v) => v.clone(),
        }
    }

    /// The positive integer this key denotes, if any.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Number(n) if *n >= 1.0 && n.fract() == 0.0 && *n <= usize::MAX as f64 => {
                Some(*n as usize)
            }
            _ => None,
        }
    }

    fn index(i: usize) -> Key {
        Key::Number(i as f64)
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Key) -> bool {
        match (self, other) {
            (Key::Bool(a), Key::Bool(b)) => a == b,
            (Key::Number(a), Key::Number(b)) => a.to_bits() == b.to_bits(),
            (Key::Str(a), Key::Str(b)) => a == b,
            (Key::Ref(a), Key::Ref(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Key::Bool(b) => b.hash(state),
            Key::Number(n) => n.to_bits().hash(state),
            Key::Str(s) => s.hash(state),
            Key::Ref(v) => v.identity().hash(state),
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Bool(b) => write!(f, "{}", b),
            Key::Number(n) => format_number(*n, f),
            Key::Str(s) => write!(f, "{}", s),
            Key::Ref(v) => write!(f, "{}", v),
        }
    }
}

/// Script table.
///
/// Entries traverse in insertion order. Overwriting a key keeps its position
/// and removing a key (setting it to nil) keeps the order of the rest.
#[derive(Debug, Default)]
pub struct Table {
    entries: IndexMap<Key, Value>,
    /// Largest `n` with every key in `1..=n` present.
    border: usize,
}

impl Table {
    pub fn new() -> Self {
        Table::default()
    }

    pub fn with_capacity(narr: usize, nrec: usize) -> Self {
        Table {
            entries: IndexMap::with_capacity(narr + nrec),
            border: 0,
        }
    }

    pub fn new_ref() -> TableRef {
        TableRef::new(Table::new())
    }

    pub fn len(&self) -> usize {
        self.border
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of live entries, array part included.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &Value) -> Value {
        match Key::from_value(key.clone()) {
            Ok(k) => self.get_key(&k),
            Err(_) => Value::Nil,
        }
    }

    pub fn get_key(&self, key: &Key) -> Value {
        self.entries.get(key).cloned().unwrap_or(Value::Nil)
    }

    pub fn get_str(&self, key: &str) -> Value {
        self.get_key(&Key::Str(key.to_string()))
    }

    pub fn get_index(&self, i: usize) -> Value {
        self.get_key(&Key::index(i))
    }

    pub fn set(&mut self, key: Value, value: Value) -> Result<(), RuntimeError> {
        let key = Key::from_value(key)?;
        self.set_key(key, value);
        Ok(())
    }

    pub fn set_key(&mut self, key: Key, value: Value) {
        let index = key.as_index();
        if value.is_nil() {
            self.entries.shift_remove(&key);
            if let Some(i) = index {
                if i <= self.border {
                    self.border = i - 1;
                }
            }
            return;
        }
        self.entries.insert(key, value);
        if index == Some(self.border + 1) {
            self.border += 1;
            while self.entries.contains_key(&Key::index(self.border + 1)) {
                self.border += 1;
            }
        }
    }

    pub fn set_str(&mut self, key: impl Into<String>, value: Value) {
        self.set_key(Key::Str(key.into()), value);
    }

    /// Sets key `len() + 1`.
    pub fn append(&mut self, value: Value) {
        let next = self.border + 1;
        self.set_key(Key::index(next), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.entries.iter()
    }
}

/// Shared handle to a table. Clones refer to the same table.
///
/// Dropping the last handle of a deeply nested chain recurses once per level.
#[derive(Clone, Default)]
pub struct TableRef(Rc<RefCell<Table>>);

impl TableRef {
    pub fn new(table: Table) -> Self {
        TableRef(Rc::new(RefCell::new(table)))
    }

    pub fn id(&self) -> TableId {
        TableId(Rc::as_ptr(&self.0) as usize)
    }

    pub fn borrow(&self) -> Ref<'_, Table> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Table> {
        self.0.borrow_mut()
    }

    pub fn get(&self, key: &Value) -> Value {
        self.borrow().get(key)
    }

    pub fn get_str(&self, key: &str) -> Value {
        self.borrow().get_str(key)
    }

    pub fn get_index(&self, i: usize) -> Value {
        self.borrow().get_index(i)
    }

    pub fn set(&self, key: Value, value: Value) -> Result<(), RuntimeError> {
        self.borrow_mut().set(key, value)
    }

    pub fn set_str(&self, key: impl Into<String>, value: Value) {
        self.borrow_mut().set_str(key, value)
    }

    pub fn append(&self, value: Value) {
        self.borrow_mut().append(value)
    }

    pub fn len(&self) -> usize {
        self.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.borrow().is_empty()
    }
}

// Tables may contain themselves; print identity only.
impl std::fmt::Debug for TableRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TableRef({:#x})", self.id().addr())
    }
}
