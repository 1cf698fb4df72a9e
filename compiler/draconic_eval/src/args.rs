//! Argument checking shared by the builtin functions and methods.

use draconic_ir::Name;
use draconic_value::errors::type_mismatch;
use draconic_value::{DraconicError, Value};

/// Fail unless `min <= args.len() <= max`.
pub(crate) fn expect_arity(
    func: &str,
    args: &[Value],
    min: usize,
    max: usize,
) -> Result<(), DraconicError> {
    let given = args.len();
    if (min..=max).contains(&given) {
        return Ok(());
    }
    let expected = if min == max {
        format!("exactly {min} argument{}", plural(min))
    } else if max == usize::MAX {
        format!("at least {min} argument{}", plural(min))
    } else if given < min {
        format!("at least {min} argument{}", plural(min))
    } else {
        format!("at most {max} argument{}", plural(max))
    };
    Err(type_mismatch(format!(
        "{func}() takes {expected} ({given} given)"
    )))
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Remove and return the keyword argument `key`.
pub(crate) fn take_kwarg(kwargs: &mut Vec<(Name, Value)>, key: &str) -> Option<Value> {
    let position = kwargs.iter().position(|(name, _)| name == key)?;
    Some(kwargs.remove(position).1)
}

/// Fail if any keyword argument is left over.
pub(crate) fn no_kwargs(func: &str, kwargs: &[(Name, Value)]) -> Result<(), DraconicError> {
    match kwargs.first() {
        None => Ok(()),
        Some((name, _)) => Err(type_mismatch(format!(
            "'{name}' is an invalid keyword argument for {func}()"
        ))),
    }
}

/// Positional argument `index` or, failing that, keyword `key`.
pub(crate) fn arg_or_kwarg(
    args: &mut Vec<Value>,
    index: usize,
    kwargs: &mut Vec<(Name, Value)>,
    key: &str,
) -> Option<Value> {
    if index < args.len() {
        Some(args.remove(index))
    } else {
        take_kwarg(kwargs, key)
    }
}

pub(crate) fn int_arg(func: &str, value: &Value) -> Result<i64, DraconicError> {
    value.as_int().ok_or_else(|| {
        type_mismatch(format!(
            "{func}(): '{}' object cannot be interpreted as an integer",
            value.type_name()
        ))
    })
}

pub(crate) fn str_arg<'a>(func: &str, value: &'a Value) -> Result<&'a str, DraconicError> {
    value.as_str().ok_or_else(|| {
        type_mismatch(format!(
            "{func}() argument must be str, not {}",
            value.type_name()
        ))
    })
}
