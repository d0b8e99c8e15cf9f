//! Runtime values for generated Goblin programs.
//!
//! `Value` is a closed enum. Each operation in the value contract
//! (`add`, `compare`, `iterate`, `get_attr`, ...) is one exhaustive match,
//! and every arm yields either a value or a typed [`Error`](crate::Error).
//!
//! # Sharing
//!
//! Lists and dicts are shared, mutable containers (`Rc<RefCell<_>>`).
//! Cloning a `Value::List` clones the handle, so a `push` through one alias
//! is visible through every other alias. Strings, functions and namespaces
//! are immutable and shared behind `Rc`.
//!
//! Construct heap values through the factory methods:
//!
//! ```text
//! let s = Value::string("hello");
//! let list = Value::list(vec![Value::Integer(1)]);
//! let f = Value::function("double", |args, _| args[0].add(&args[0]));
//! ```

mod composite;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub use composite::{Dict, Function, KwArgs, Members, Namespace, NativeFn};

use crate::errors::RtResult;

/// Runtime value.
#[derive(Clone)]
pub enum Value {
    // Primitives
    Integer(i64),
    Float(f64),
    Bool(bool),

    // Shared heap values
    String(Rc<str>),
    List(Rc<RefCell<Vec<Value>>>),
    Dict(Rc<RefCell<Dict>>),
    Function(Rc<Function>),
    Namespace(Rc<Namespace>),

    /// The nil value.
    Unit,
}

// Factory methods

impl Value {
    #[inline]
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::String(s.into())
    }

    #[inline]
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    #[inline]
    pub fn dict(dict: Dict) -> Self {
        Value::Dict(Rc::new(RefCell::new(dict)))
    }

    /// Build a dict from `(key, value)` pairs in order.
    ///
    /// A repeated key keeps its first position and its last value.
    pub fn dict_from(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let mut dict = Dict::new();
        for (key, value) in entries {
            dict.insert(key, value);
        }
        Value::dict(dict)
    }

    /// Wrap a native or generated callable.
    pub fn function<F>(name: impl Into<String>, callable: F) -> Self
    where
        F: Fn(&[Value], &KwArgs) -> RtResult + 'static,
    {
        Value::Function(Rc::new(Function::new(name, callable)))
    }

    pub fn namespace(name: impl Into<String>, members: Members) -> Self {
        Value::Namespace(Rc::new(Namespace::new(name, members)))
    }
}

impl Value {
    /// Name of this value's type, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "Integer",
            Value::Float(_) => "Float",
            Value::Bool(_) => "Bool",
            Value::String(_) => "String",
            Value::List(_) => "List",
            Value::Dict(_) => "Dict",
            Value::Function(_) => "Function",
            Value::Namespace(_) => "Namespace",
            Value::Unit => "Unit",
        }
    }

    /// Truthiness used by conditions and the logical operators.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Integer(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Bool(b) => *b,
            Value::String(s) => !s.is_empty(),
            Value::List(items) => !items.borrow().is_empty(),
            Value::Dict(dict) => !dict.borrow().is_empty(),
            Value::Function(_) | Value::Namespace(_) => true,
            Value::Unit => false,
        }
    }

    /// The debug form, e.g. `Integer(3)` or `String("a")`.
    pub fn repr(&self) -> String {
        format!("{self:?}")
    }

    /// The user-facing form printed by `print`.
    pub fn display(&self) -> String {
        self.to_string()
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn is_unit(&self) -> bool {
        matches!(self, Value::Unit)
    }
}

fn fmt_float(f: f64, out: &mut fmt::Formatter<'_>) -> fmt::Result {
    if f.is_infinite() {
        out.write_str(if f > 0.0 { "+Inf" } else { "-Inf" })
    } else {
        write!(out, "{f}")
    }
}

fn join_with<T>(
    items: impl IntoIterator<Item = T>,
    f: &mut fmt::Formatter<'_>,
    mut each: impl FnMut(T, &mut fmt::Formatter<'_>) -> fmt::Result,
) -> fmt::Result {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        each(item, f)?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(x) => fmt_float(*x, f),
            Value::Bool(b) => write!(f, "{b}"),
            Value::String(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                join_with(items.borrow().iter(), f, |v, f| write!(f, "{v}"))?;
                f.write_str("]")
            }
            Value::Dict(dict) => {
                f.write_str("{")?;
                join_with(dict.borrow().iter(), f, |(k, v), f| write!(f, "{k}: {v}"))?;
                f.write_str("}")
            }
            Value::Function(func) => write!(f, "<function {}>", func.name()),
            Value::Namespace(ns) => write!(f, "<module {}>", ns.name()),
            Value::Unit => f.write_str("none"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "Integer({n})"),
            Value::Float(x) => write!(f, "Float({x:?})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::String(s) => write!(f, "String({:?})", &**s),
            Value::List(items) => {
                f.write_str("List([")?;
                join_with(items.borrow().iter(), f, |v, f| write!(f, "{v:?}"))?;
                f.write_str("])")
            }
            Value::Dict(dict) => {
                f.write_str("Dict({")?;
                join_with(dict.borrow().iter(), f, |(k, v), f| {
                    write!(f, "{k:?}: {v:?}")
                })?;
                f.write_str("})")
            }
            Value::Function(func) => write!(f, "<function {}>", func.name()),
            Value::Namespace(ns) => write!(f, "<module {}>", ns.name()),
            Value::Unit => f.write_str("Unit"),
        }
    }
}

/// Structural equality for containers and scalars; identity for functions
/// and namespaces.
///
/// This is host-side equality (tests, caches). Goblin's `==` goes through
/// [`Value::compare`].
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Dict(a), Value::Dict(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Namespace(a), Value::Namespace(b)) => Rc::ptr_eq(a, b),
            (Value::Unit, Value::Unit) => true,
            _ => false,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Unit
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}
