//! Built-in method dispatch.
//!
//! Direct enum-based dispatch on the receiver. Attribute reads such as
//! `xs.append` produce a `BoundMethod`; calling it lands here.
//!
//! Methods that mutate (`list.append`, `dict.update`, `set.add`, ...) work in
//! place on the receiver. Every method checks the size of what it produces.

mod dict;
mod list;
mod set;
mod string;

pub(crate) use dict::pairs_of;

use draconic_ir::Name;
use draconic_value::errors::no_attribute;
use draconic_value::{EvalResult, SizeLimits, Value};

const LIST_METHODS: &[&str] = &[
    "append", "extend", "insert", "pop", "remove", "clear", "index", "count", "copy", "reverse",
    "sort",
];

const DICT_METHODS: &[&str] = &[
    "get",
    "keys",
    "values",
    "items",
    "update",
    "pop",
    "setdefault",
    "clear",
    "copy",
];

const SET_METHODS: &[&str] = &[
    "add",
    "update",
    "discard",
    "remove",
    "pop",
    "clear",
    "copy",
    "union",
    "intersection",
    "difference",
];

const STR_METHODS: &[&str] = &[
    "upper",
    "lower",
    "strip",
    "lstrip",
    "rstrip",
    "split",
    "join",
    "startswith",
    "endswith",
    "replace",
    "find",
    "count",
    "title",
    "capitalize",
    "isdigit",
    "isalpha",
    "zfill",
];

/// Whether `receiver` has a built-in method called `name`.
pub fn has_method(receiver: &Value, name: &str) -> bool {
    let table = match receiver {
        Value::List(_) => LIST_METHODS,
        Value::Dict(_) => DICT_METHODS,
        Value::Set(_) => SET_METHODS,
        Value::Str(_) => STR_METHODS,
        _ => return false,
    };
    table.contains(&name)
}

/// Call the built-in method `name` on `receiver`.
pub fn call_method(
    receiver: &Value,
    name: &str,
    args: Vec<Value>,
    kwargs: Vec<(Name, Value)>,
    limits: &SizeLimits,
) -> EvalResult {
    match receiver {
        Value::List(items) => list::call(items, name, args, kwargs, limits),
        Value::Dict(dict) => dict::call(dict, name, args, kwargs, limits),
        Value::Set(set) => set::call(set, name, args, kwargs, limits),
        Value::Str(s) => string::call(s, name, args, kwargs, limits),
        _ => Err(no_attribute(receiver, name)),
    }
}

/// Qualified method name used in argument errors, e.g. `list.append`.
fn qualified(receiver: &str, method: &str) -> String {
    format!("{receiver}.{method}")
}
