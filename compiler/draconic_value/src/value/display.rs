//! Textual forms of values: `repr()` and `str()`.
//!
//! Both follow the familiar Python rendering. Self-referencing containers
//! are cut off with `...` past a fixed nesting depth. Rendering stops as
//! soon as the text outgrows its length budget, so a container that holds
//! the same list many times over costs no more than the budget.

use std::fmt::{self, Write};

use super::Value;
use crate::errors::{limit_exceeded, DraconicError, LimitKind};

const MAX_REPR_DEPTH: usize = 32;

/// Text kept by the infallible renderings used in messages and `Debug`.
const DISPLAY_BUDGET: usize = 64 * 1024;

/// The rendering outgrew its budget.
struct OverBudget;

type Rendered = Result<(), OverBudget>;

impl Value {
    /// `repr(value)`: strings quoted, containers rendered recursively.
    ///
    /// Fails with a `StringLength` limit once the text passes `max_len`
    /// bytes.
    pub fn try_repr(&self, max_len: usize) -> Result<String, DraconicError> {
        let mut out = String::new();
        match write_repr(self, &mut out, 0, max_len) {
            Ok(()) => Ok(out),
            Err(OverBudget) => Err(limit_exceeded(LimitKind::StringLength, max_len as u64)),
        }
    }

    /// `str(value)`: like `repr` except strings are not quoted.
    pub fn try_to_str(&self, max_len: usize) -> Result<String, DraconicError> {
        match self {
            Value::Str(s) if s.len() > max_len => {
                Err(limit_exceeded(LimitKind::StringLength, max_len as u64))
            }
            Value::Str(s) => Ok(s.to_string()),
            _ => self.try_repr(max_len),
        }
    }

    /// `repr` for messages and debugging: overlong text is cut short and
    /// ends in `...`.
    pub fn repr(&self) -> String {
        let mut out = String::new();
        if write_repr(self, &mut out, 0, DISPLAY_BUDGET).is_err() {
            let mut end = DISPLAY_BUDGET.min(out.len());
            while !out.is_char_boundary(end) {
                end -= 1;
            }
            out.truncate(end);
            out.push_str("...");
        }
        out
    }

    /// `str` counterpart of [`repr`](Self::repr).
    pub fn to_str(&self) -> String {
        match self {
            Value::Str(s) => s.to_string(),
            _ => self.repr(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            _ => f.write_str(&self.repr()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}

/// Render a float the way Python's `repr` does.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{value:e}");
        if let Some((mantissa, exponent)) = formatted.split_once('e') {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            return format!("{mantissa}e{sign}{digits:0>2}");
        }
        return formatted;
    }
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn write_repr(value: &Value, out: &mut String, depth: usize, budget: usize) -> Rendered {
    if out.len() > budget {
        return Err(OverBudget);
    }
    if depth > MAX_REPR_DEPTH {
        out.push_str("...");
        return Ok(());
    }
    match value {
        Value::None => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Int(i) => {
            let _ = write!(out, "{i}");
        }
        Value::Float(f) => out.push_str(&format_float(*f)),
        Value::Str(s) => write_quoted(s, out),
        Value::List(items) => {
            out.push('[');
            write_items(items.borrow().iter(), out, depth, budget)?;
            out.push(']');
        }
        Value::Tuple(items) => {
            out.push('(');
            write_items(items.iter(), out, depth, budget)?;
            if items.len() == 1 {
                out.push(',');
            }
            out.push(')');
        }
        Value::Dict(dict) => {
            out.push('{');
            for (i, (key, value)) in dict.borrow().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_repr(key, out, depth + 1, budget)?;
                out.push_str(": ");
                write_repr(value, out, depth + 1, budget)?;
            }
            out.push('}');
        }
        Value::Set(set) => {
            let set = set.borrow();
            if set.is_empty() {
                out.push_str("set()");
            } else {
                out.push('{');
                write_items(set.iter(), out, depth, budget)?;
                out.push('}');
            }
        }
        Value::Range(range) => {
            let _ = if range.step == 1 {
                write!(out, "range({}, {})", range.start, range.stop)
            } else {
                write!(out, "range({}, {}, {})", range.start, range.stop, range.step)
            };
        }
        Value::Function(function) => {
            let _ = write!(out, "<function {}>", function.name);
        }
        Value::Native(native) => {
            let _ = write!(out, "<built-in function {}>", native.name());
        }
        Value::BoundMethod(method) => {
            let _ = write!(
                out,
                "<built-in method {} of {} object>",
                method.method,
                method.receiver.type_name()
            );
        }
        Value::Object(object) => out.push_str(&object.repr()),
    }
    if out.len() > budget {
        return Err(OverBudget);
    }
    Ok(())
}

fn write_items<'a>(
    items: impl Iterator<Item = &'a Value>,
    out: &mut String,
    depth: usize,
    budget: usize,
) -> Rendered {
    for (i, item) in items.enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_repr(item, out, depth + 1, budget)?;
    }
    Ok(())
}

/// Single quotes unless the text contains a single quote and no double
/// quote.
fn write_quoted(s: &str, out: &mut String) {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}
