//! Host-owned data exposed to scripts.
//!
//! `HostValue` is the thread-safe form of a value registered with
//! `register_value`. Each run materialises its own script `Value` from it,
//! so no run observes another run's mutations.

use std::fmt;
use std::sync::Arc;

use draconic_ir::Name;

use super::{Dict, Set, Value};
use crate::errors::{type_mismatch, DraconicError};
use crate::native::NativeContext;

/// A host object reachable from scripts.
///
/// Attributes are looked up after the attribute gate has accepted the name;
/// implementations never see dunder-shaped names.
pub trait HostObject: fmt::Debug + Send + Sync {
    /// Type name, used in error messages and to match `except "Name":`
    /// handlers when the object is raised.
    fn type_name(&self) -> &str;

    /// Attribute lookup; `None` means the attribute does not exist.
    fn get_attr(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Subscript lookup; `Ok(None)` means the key does not exist.
    fn get_item(&self, _key: &Value) -> Result<Option<Value>, DraconicError> {
        Err(type_mismatch(format!(
            "'{}' object is not subscriptable",
            self.type_name()
        )))
    }

    /// Invoked when a script calls the object.
    fn call(
        &self,
        _ctx: &NativeContext,
        _args: Vec<Value>,
        _kwargs: Vec<(Name, Value)>,
    ) -> Result<Value, DraconicError> {
        Err(not_callable_object(self.type_name()))
    }

    /// Text used by `repr()` and `str()`.
    fn repr(&self) -> String {
        format!("<{} object>", self.type_name())
    }
}

#[cold]
fn not_callable_object(type_name: &str) -> DraconicError {
    type_mismatch(format!("'{type_name}' object is not callable"))
}

/// Immutable, `Send + Sync` value registered by the host.
#[derive(Clone, Debug)]
pub enum HostValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    List(Vec<HostValue>),
    Tuple(Vec<HostValue>),
    Dict(Vec<(HostValue, HostValue)>),
    Set(Vec<HostValue>),
    Object(Arc<dyn HostObject>),
}

impl HostValue {
    pub fn list(items: impl IntoIterator<Item = HostValue>) -> Self {
        HostValue::List(items.into_iter().collect())
    }

    pub fn dict(entries: impl IntoIterator<Item = (HostValue, HostValue)>) -> Self {
        HostValue::Dict(entries.into_iter().collect())
    }

    pub fn object(object: impl HostObject + 'static) -> Self {
        HostValue::Object(Arc::new(object))
    }

    /// Build a fresh script value. Fails if a dict key or set element is
    /// unhashable.
    pub fn to_value(&self) -> Result<Value, DraconicError> {
        Ok(match self {
            HostValue::None => Value::None,
            HostValue::Bool(b) => Value::Bool(*b),
            HostValue::Int(i) => Value::Int(*i),
            HostValue::Float(f) => Value::Float(*f),
            HostValue::Str(s) => Value::str(s),
            HostValue::List(items) => Value::list(to_values(items)?),
            HostValue::Tuple(items) => Value::tuple(to_values(items)?),
            HostValue::Dict(entries) => {
                let mut dict = Dict::new();
                for (key, value) in entries {
                    dict.insert(key.to_value()?, value.to_value()?)?;
                }
                Value::dict(dict)
            }
            HostValue::Set(items) => Value::set(Set::from_values(to_values(items)?)?),
            HostValue::Object(object) => Value::Object(Arc::clone(object)),
        })
    }
}

fn to_values(items: &[HostValue]) -> Result<Vec<Value>, DraconicError> {
    items.iter().map(HostValue::to_value).collect()
}

impl From<bool> for HostValue {
    fn from(b: bool) -> Self {
        HostValue::Bool(b)
    }
}

impl From<i64> for HostValue {
    fn from(i: i64) -> Self {
        HostValue::Int(i)
    }
}

impl From<f64> for HostValue {
    fn from(f: f64) -> Self {
        HostValue::Float(f)
    }
}

impl From<&str> for HostValue {
    fn from(s: &str) -> Self {
        HostValue::Str(Arc::from(s))
    }
}

impl From<String> for HostValue {
    fn from(s: String) -> Self {
        HostValue::Str(Arc::from(s))
    }
}

impl<T: Into<HostValue>> From<Vec<T>> for HostValue {
    fn from(items: Vec<T>) -> Self {
        HostValue::List(items.into_iter().map(Into::into).collect())
    }
}
