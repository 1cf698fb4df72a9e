//! `dict` methods.
//!
//! `keys()`, `values()` and `items()` return list snapshots rather than
//! live views.

use draconic_ir::Name;
use draconic_value::errors::{key_error, no_attribute, value_error};
use draconic_value::{Dict, DraconicError, EvalResult, Shared, SizeLimits, Value};

use super::qualified;
use crate::args::{expect_arity, no_kwargs};

pub(super) fn call(
    dict: &Shared<Dict>,
    name: &str,
    mut args: Vec<Value>,
    kwargs: Vec<(Name, Value)>,
    limits: &SizeLimits,
) -> EvalResult {
    let func = qualified("dict", name);
    if name != "update" {
        no_kwargs(&func, &kwargs)?;
    }

    match name {
        "get" => {
            expect_arity(&func, &args, 1, 2)?;
            let default = if args.len() == 2 { args.pop() } else { None };
            Ok(dict
                .borrow()
                .get(&args[0])?
                .or(default)
                .unwrap_or(Value::None))
        }
        "keys" => {
            expect_arity(&func, &args, 0, 0)?;
            Ok(Value::list(dict.borrow().keys().cloned().collect()))
        }
        "values" => {
            expect_arity(&func, &args, 0, 0)?;
            Ok(Value::list(dict.borrow().values().cloned().collect()))
        }
        "items" => {
            expect_arity(&func, &args, 0, 0)?;
            Ok(Value::list(
                dict.borrow()
                    .iter()
                    .map(|(k, v)| Value::tuple(vec![k.clone(), v.clone()]))
                    .collect(),
            ))
        }
        "update" => {
            expect_arity(&func, &args, 0, 1)?;
            let mut pairs = match args.first() {
                Some(other) => pairs_of(other)?,
                None => Vec::new(),
            };
            pairs.extend(
                kwargs
                    .into_iter()
                    .map(|(key, value)| (Value::str(key.as_str()), value)),
            );
            let mut dict = dict.borrow_mut();
            for (key, value) in pairs {
                dict.insert(key, value)?;
            }
            limits.check_container_len(dict.len())?;
            Ok(Value::None)
        }
        "pop" => {
            expect_arity(&func, &args, 1, 2)?;
            let default = if args.len() == 2 { args.pop() } else { None };
            let removed = dict.borrow_mut().remove(&args[0])?;
            removed.or(default).ok_or_else(|| key_error(&args[0]))
        }
        "setdefault" => {
            expect_arity(&func, &args, 1, 2)?;
            let default = if args.len() == 2 {
                args.pop().unwrap_or(Value::None)
            } else {
                Value::None
            };
            if let Some(existing) = dict.borrow().get(&args[0])? {
                return Ok(existing);
            }
            let mut dict = dict.borrow_mut();
            limits.check_container_len(dict.len() + 1)?;
            dict.insert(args[0].clone(), default.clone())?;
            Ok(default)
        }
        "clear" => {
            expect_arity(&func, &args, 0, 0)?;
            dict.borrow_mut().clear();
            Ok(Value::None)
        }
        "copy" => {
            expect_arity(&func, &args, 0, 0)?;
            Ok(Value::dict(dict.borrow().clone()))
        }
        _ => Err(no_attribute(&Value::Dict(dict.clone()), name)),
    }
}

/// Key/value pairs from a mapping or an iterable of pairs.
pub(crate) fn pairs_of(source: &Value) -> Result<Vec<(Value, Value)>, DraconicError> {
    if let Value::Dict(other) = source {
        return Ok(other
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect());
    }
    let mut pairs = Vec::new();
    for (position, item) in source.iterate()?.enumerate() {
        let parts: Vec<Value> = item.iterate()?.collect();
        let [key, value]: [Value; 2] = parts.try_into().map_err(|parts: Vec<Value>| {
            value_error(format!(
                "dictionary update sequence element #{position} has length {}; 2 is required",
                parts.len()
            ))
        })?;
        pairs.push((key, value));
    }
    Ok(pairs)
}
