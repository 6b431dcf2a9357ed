use std::any::Any;
use std::rc::Rc;

use crate::state::{NativeFn, RuntimeError, State};
use crate::table::TableRef;

/// A dynamic script value.
///
/// Scalars are held by value; every other kind is a reference whose clones
/// share identity with the original.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    Str(String),
    Table(TableRef),
    Function(Rc<Function>),
    Channel(Channel),
    State(ThreadHandle),
    UserData(Rc<UserData>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Table(_) => "table",
            Value::Function(_) => "function",
            Value::Channel(_) => "channel",
            Value::State(_) => "thread",
            Value::UserData(_) => "userdata",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_table(&self) -> Option<&TableRef> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Address used for identity of reference kinds. `None` for scalars.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::Table(t) => Some(t.id().addr()),
            Value::Function(f) => Some(Rc::as_ptr(f) as usize),
            Value::Channel(c) => Some(Rc::as_ptr(&c.0) as usize),
            Value::State(h) => Some(Rc::as_ptr(&h.0) as usize),
            Value::UserData(u) => Some(Rc::as_ptr(u) as usize),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<TableRef> for Value {
    fn from(t: TableRef) -> Self {
        Value::Table(t)
    }
}

/// Scalars compare by value, references by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (a, b) => match (a.identity(), b.identity()) {
                (Some(x), Some(y)) => x == y && a.type_name() == b.type_name(),
                _ => false,
            },
        }
    }
}

pub(crate) fn format_number(n: f64, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    if n.is_nan() {
        write!(f, "nan")
    } else if n.is_infinite() {
        write!(f, "{}", if n > 0.0 { "inf" } else { "-inf" })
    } else if n == n.trunc() && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{}", n)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => format_number(*n, f),
            Value::Str(s) => write!(f, "{}", s),
            other => {
                let addr = other.identity().unwrap_or_default();
                write!(f, "{}: {:#x}", other.type_name(), addr)
            }
        }
    }
}

/// A native function callable from scripts.
pub struct Function {
    pub name: String,
    pub body: NativeFn,
}

impl Function {
    pub fn new(name: impl Into<String>, body: NativeFn) -> Self {
        Function { name: name.into(), body }
    }

    pub fn call(&self, state: &mut State, args: &[Value]) -> Result<Vec<Value>, RuntimeError> {
        (self.body)(state, args)
    }
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Function({})", self.name)
    }
}

/// Handle to a host channel. Scripts only ever see its identity.
#[derive(Debug, Clone, Default)]
pub struct Channel(Rc<ChannelInfo>);

#[derive(Debug, Default)]
struct ChannelInfo;

impl Channel {
    pub fn new() -> Self {
        Channel::default()
    }
}

/// Handle to a child interpreter state (coroutine).
#[derive(Debug, Clone)]
pub struct ThreadHandle(Rc<ThreadInfo>);

#[derive(Debug)]
struct ThreadInfo {
    id: usize,
}

impl ThreadHandle {
    pub(crate) fn new(id: usize) -> Self {
        ThreadHandle(Rc::new(ThreadInfo { id }))
    }

    pub fn id(&self) -> usize {
        self.0.id
    }
}

/// Opaque host data exposed to scripts.
pub struct UserData {
    pub data: Box<dyn Any>,
}

impl UserData {
    pub fn new<T: Any>(data: T) -> Self {
        UserData { data: Box::new(data) }
    }
}

impl std::fmt::Debug for UserData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserData").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;

    #[test]
    fn display_scalars() {
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Number(3.0).to_string(), "3");
        assert_eq!(Value::Number(-2.0).to_string(), "-2");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::from("hi").to_string(), "hi");
    }

    #[test]
    fn display_references_name_their_kind() {
        let t = Value::Table(Table::new_ref());
        assert!(t.to_string().starts_with("table: 0x"), "got {}", t);
        let c = Value::Channel(Channel::new());
        assert!(c.to_string().starts_with("channel: 0x"), "got {}", c);
        let u = Value::UserData(Rc::new(UserData::new(7u32)));
        assert!(u.to_string().starts_with("userdata: 0x"), "got {}", u);
    }

    #[test]
    fn tables_compare_by_identity() {
        let a = Table::new_ref();
        let b = Table::new_ref();
        assert_eq!(Value::Table(a.clone()), Value::Table(a.clone()));
        assert_ne!(Value::Table(a), Value::Table(b));
    }

    #[test]
    fn handles_compare_by_identity() {
        let c = Channel::new();
        assert_eq!(Value::Channel(c.clone()), Value::Channel(c));
        assert_ne!(Value::Channel(Channel::new()), Value::Channel(Channel::new()));
        let u = Rc::new(UserData::new(1u8));
        assert_eq!(Value::UserData(u.clone()), Value::UserData(u));
    }
}
