//! `set` methods.

use draconic_ir::Name;
use draconic_value::errors::{key_error, no_attribute};
use draconic_value::{DraconicError, EvalResult, Set, Shared, SizeLimits, Value};

use super::qualified;
use crate::args::{expect_arity, no_kwargs};

pub(super) fn call(
    set: &Shared<Set>,
    name: &str,
    args: Vec<Value>,
    kwargs: Vec<(Name, Value)>,
    limits: &SizeLimits,
) -> EvalResult {
    let func = qualified("set", name);
    no_kwargs(&func, &kwargs)?;

    match name {
        "add" => {
            expect_arity(&func, &args, 1, 1)?;
            let mut set = set.borrow_mut();
            set.insert(args[0].clone())?;
            limits.check_container_len(set.len())?;
            Ok(Value::None)
        }
        "update" => {
            let others = as_sets(&args, limits)?;
            let mut set = set.borrow_mut();
            for other in &others {
                for value in other.iter() {
                    set.insert(value.clone())?;
                }
                limits.check_container_len(set.len())?;
            }
            Ok(Value::None)
        }
        "discard" => {
            expect_arity(&func, &args, 1, 1)?;
            set.borrow_mut().remove(&args[0])?;
            Ok(Value::None)
        }
        "remove" => {
            expect_arity(&func, &args, 1, 1)?;
            if set.borrow_mut().remove(&args[0])? {
                Ok(Value::None)
            } else {
                Err(key_error(&args[0]))
            }
        }
        "pop" => {
            expect_arity(&func, &args, 0, 0)?;
            let popped = set.borrow_mut().pop();
            popped.ok_or_else(|| key_error(&Value::str("pop from an empty set")))
        }
        "clear" => {
            expect_arity(&func, &args, 0, 0)?;
            set.borrow_mut().clear();
            Ok(Value::None)
        }
        "copy" => {
            expect_arity(&func, &args, 0, 0)?;
            Ok(Value::set(set.borrow().clone()))
        }
        "union" | "intersection" | "difference" => {
            let others = as_sets(&args, limits)?;
            let mut result = set.borrow().clone();
            for other in &others {
                result = match name {
                    "union" => result.union(other),
                    "intersection" => result.intersection(other),
                    _ => result.difference(other),
                };
            }
            limits.check_container_len(result.len())?;
            Ok(Value::set(result))
        }
        _ => Err(no_attribute(&Value::Set(set.clone()), name)),
    }
}

/// Each argument as a set: sets are copied, other iterables collected.
fn as_sets(args: &[Value], limits: &SizeLimits) -> Result<Vec<Set>, DraconicError> {
    args.iter()
        .map(|arg| match arg {
            Value::Set(other) => Ok(other.borrow().clone()),
            _ => {
                limits.check_iterable(arg)?;
                Set::from_values(arg.iterate()?)
            }
        })
        .collect()
}
