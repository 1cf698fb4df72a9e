//! Runtime values.
//!
//! Primitives (`None`, `Bool`, `Int`, `Float`, `Str`) are immutable.
//! `List`, `Dict` and `Set` are mutable reference types with identity:
//! cloning a `Value` clones the handle, not the container. `Tuple` is an
//! immutable shared slice.
//!
//! Values are `!Send`: each run owns its values. Data crossing between the
//! host and runs travels as `HostValue`.

mod containers;
mod display;
mod function;
mod hash_key;
mod host;
mod iter;

use std::rc::Rc;
use std::sync::Arc;

pub use containers::{Dict, RangeIter, RangeValue, Set};
pub use display::format_float;
pub use function::{BoundMethod, FunctionCode, FunctionValue, NativeFn, NativeFnImpl};
pub use hash_key::HashKey;
pub use host::{HostObject, HostValue};
pub use iter::ValueIter;

use crate::shared::Shared;

/// Runtime value.
#[derive(Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),

    /// Mutable sequence with identity.
    List(Shared<Vec<Value>>),
    /// Immutable sequence.
    Tuple(Rc<[Value]>),
    /// Insertion-ordered mapping with identity.
    Dict(Shared<Dict>),
    /// Insertion-ordered set with identity.
    Set(Shared<Set>),
    /// Lazy integer range.
    Range(RangeValue),

    /// Script-defined function or lambda.
    Function(Rc<FunctionValue>),
    /// Host-registered native function.
    Native(NativeFn),
    /// Built-in method bound to its receiver, e.g. `xs.append`.
    BoundMethod(Rc<BoundMethod>),
    /// Host-owned object exposed through `HostObject`.
    Object(Arc<dyn HostObject>),
}

/// Numeric view of a value: `Bool` counts as an integer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    #[inline]
    pub fn to_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

impl Value {
    // Factory methods

    pub fn str(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }

    pub fn string(s: String) -> Self {
        Value::Str(Rc::from(s))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Shared::new(items))
    }

    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(Rc::from(items))
    }

    pub fn dict(dict: Dict) -> Self {
        Value::Dict(Shared::new(dict))
    }

    pub fn set(set: Set) -> Self {
        Value::Set(Shared::new(set))
    }

    pub fn empty_dict() -> Self {
        Value::dict(Dict::new())
    }

    // Inspection

    /// The Python-style type name used in error messages and `typeof`.
    pub fn type_name(&self) -> &str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Dict(_) => "dict",
            Value::Set(_) => "set",
            Value::Range(_) => "range",
            Value::Function(_) => "function",
            Value::Native(_) => "builtin_function_or_method",
            Value::BoundMethod(_) => "method",
            Value::Object(object) => object.type_name(),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.borrow().is_empty(),
            Value::Tuple(items) => !items.is_empty(),
            Value::Dict(dict) => !dict.borrow().is_empty(),
            Value::Set(set) => !set.borrow().is_empty(),
            Value::Range(range) => range.len() > 0,
            Value::Function(_) | Value::Native(_) | Value::BoundMethod(_) | Value::Object(_) => {
                true
            }
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Integer view, accepting `bool` as Python does.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Int(i) => Some(Number::Int(*i)),
            Value::Bool(b) => Some(Number::Int(i64::from(*b))),
            Value::Float(f) => Some(Number::Float(*f)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Identity comparison (`is`).
    ///
    /// Containers, functions and host objects compare by address;
    /// immutable primitives compare by type and value.
    pub fn is_same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a.ptr_eq(b),
            (Value::Dict(a), Value::Dict(b)) => a.ptr_eq(b),
            (Value::Set(a), Value::Set(b)) => a.ptr_eq(b),
            (Value::Tuple(a), Value::Tuple(b)) => Rc::ptr_eq(a, b),
            (Value::Range(a), Value::Range(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => a.ptr_eq(b),
            (Value::BoundMethod(a), Value::BoundMethod(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => same_object(a, b),
            _ => false,
        }
    }

    /// Snapshot the items of an iterable value.
    pub fn iterate(&self) -> Result<ValueIter, crate::DraconicError> {
        ValueIter::new(self)
    }
}

fn same_object(a: &Arc<dyn HostObject>, b: &Arc<dyn HostObject>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a).cast::<()>(),
        Arc::as_ptr(b).cast::<()>(),
    )
}

/// Containers nested deeper than this cannot be compared with `==`.
pub const MAX_COMPARE_DEPTH: usize = 100;

impl Value {
    /// Structural equality (`==`) for scripts.
    ///
    /// Values from different type families are simply unequal. `int`,
    /// `float` and `bool` compare numerically. Fails with a `RuntimeError`
    /// fault once containers nest past [`MAX_COMPARE_DEPTH`], which is what
    /// a list that contains itself reaches.
    pub fn try_eq(&self, other: &Value) -> Result<bool, crate::DraconicError> {
        self.eq_at(other, 0)
    }

    fn eq_at(&self, other: &Value, depth: usize) -> Result<bool, crate::DraconicError> {
        if depth > MAX_COMPARE_DEPTH {
            return Err(crate::errors::script_fault(
                "RuntimeError",
                "maximum recursion depth exceeded in comparison",
            ));
        }
        let equal = match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                a.ptr_eq(b) || items_eq(&a.borrow(), &b.borrow(), depth)?
            }
            (Value::Tuple(a), Value::Tuple(b)) => Rc::ptr_eq(a, b) || items_eq(a, b, depth)?,
            (Value::Dict(a), Value::Dict(b)) => {
                a.ptr_eq(b)
                    || a
                        .borrow()
                        .entries_eq(&b.borrow(), |x, y| x.eq_at(y, depth + 1))?
            }
            (Value::Set(a), Value::Set(b)) => a.ptr_eq(b) || *a.borrow() == *b.borrow(),
            (Value::Range(a), Value::Range(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => a.ptr_eq(b),
            (Value::BoundMethod(a), Value::BoundMethod(b)) => {
                a.method == b.method && a.receiver.is_same(&b.receiver)
            }
            (Value::Object(a), Value::Object(b)) => same_object(a, b),
            _ => match (self.as_number(), other.as_number()) {
                (Some(Number::Int(a)), Some(Number::Int(b))) => a == b,
                (Some(a), Some(b)) => a.to_f64() == b.to_f64(),
                _ => false,
            },
        };
        Ok(equal)
    }
}

fn items_eq(a: &[Value], b: &[Value], depth: usize) -> Result<bool, crate::DraconicError> {
    if a.len() != b.len() {
        return Ok(false);
    }
    for (x, y) in a.iter().zip(b) {
        if !x.eq_at(y, depth + 1)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Structural equality for host code and tests.
///
/// Comparisons that nest too deeply report unequal; the evaluator goes
/// through [`Value::try_eq`] instead.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.try_eq(other).unwrap_or(false)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

#[cfg(test)]
mod tests;
