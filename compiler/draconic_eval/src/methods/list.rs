//! `list` methods.

use draconic_ir::Name;
use draconic_value::errors::{index_error, no_attribute, type_mismatch, value_error};
use draconic_value::{EvalResult, Shared, SizeLimits, Value};

use super::qualified;
use crate::args::{expect_arity, int_arg, no_kwargs, take_kwarg};
use crate::compare::{position_of, sort_values};

pub(super) fn call(
    items: &Shared<Vec<Value>>,
    name: &str,
    mut args: Vec<Value>,
    mut kwargs: Vec<(Name, Value)>,
    limits: &SizeLimits,
) -> EvalResult {
    let func = qualified("list", name);
    let reverse = if name == "sort" {
        take_kwarg(&mut kwargs, "reverse").is_some_and(|v| v.is_truthy())
    } else {
        false
    };
    no_kwargs(&func, &kwargs)?;

    match name {
        "append" => {
            expect_arity(&func, &args, 1, 1)?;
            let mut items = items.borrow_mut();
            limits.check_container_len(items.len() + 1)?;
            items.extend(args.pop());
            Ok(Value::None)
        }
        "extend" => {
            expect_arity(&func, &args, 1, 1)?;
            limits.check_iterable(&args[0])?;
            // Collected before borrowing, so `xs.extend(xs)` works.
            let extra: Vec<Value> = args[0].iterate()?.collect();
            let mut items = items.borrow_mut();
            limits.check_container_len(items.len() + extra.len())?;
            items.extend(extra);
            Ok(Value::None)
        }
        "insert" => {
            expect_arity(&func, &args, 2, 2)?;
            let index = int_arg(&func, &args[0])?;
            let value = args.pop().unwrap_or(Value::None);
            let mut items = items.borrow_mut();
            limits.check_container_len(items.len() + 1)?;
            let len = i64::try_from(items.len()).unwrap_or(i64::MAX);
            let position = if index < 0 {
                (index.saturating_add(len)).max(0)
            } else {
                index.min(len)
            };
            items.insert(position as usize, value);
            Ok(Value::None)
        }
        "pop" => {
            expect_arity(&func, &args, 0, 1)?;
            let mut items = items.borrow_mut();
            if items.is_empty() {
                return Err(index_error("pop from empty list"));
            }
            let len = i64::try_from(items.len()).unwrap_or(i64::MAX);
            let index = match args.first() {
                Some(index) => int_arg(&func, index)?,
                None => -1,
            };
            let index = if index < 0 { index + len } else { index };
            if !(0..len).contains(&index) {
                return Err(index_error("pop index out of range"));
            }
            Ok(items.remove(index as usize))
        }
        "remove" => {
            expect_arity(&func, &args, 1, 1)?;
            let position = position_of(&items.borrow(), &args[0])?;
            match position {
                Some(position) => {
                    items.borrow_mut().remove(position);
                    Ok(Value::None)
                }
                None => Err(value_error("list.remove(x): x not in list")),
            }
        }
        "clear" => {
            expect_arity(&func, &args, 0, 0)?;
            items.borrow_mut().clear();
            Ok(Value::None)
        }
        "index" => {
            expect_arity(&func, &args, 1, 1)?;
            let position = position_of(&items.borrow(), &args[0])?;
            position
                .map(|p| Value::Int(p as i64))
                .ok_or_else(|| value_error(format!("{} is not in list", args[0].repr())))
        }
        "count" => {
            expect_arity(&func, &args, 1, 1)?;
            let mut count = 0;
            for item in items.borrow().iter() {
                if item.try_eq(&args[0])? {
                    count += 1;
                }
            }
            Ok(Value::Int(count))
        }
        "copy" => {
            expect_arity(&func, &args, 0, 0)?;
            Ok(Value::list(items.borrow().clone()))
        }
        "reverse" => {
            expect_arity(&func, &args, 0, 0)?;
            items.borrow_mut().reverse();
            Ok(Value::None)
        }
        "sort" => {
            if !args.is_empty() {
                return Err(type_mismatch("list.sort() takes no positional arguments"));
            }
            let snapshot = items.borrow().clone();
            *items.borrow_mut() = sort_values(snapshot, reverse)?;
            Ok(Value::None)
        }
        _ => Err(no_attribute(&Value::List(items.clone()), name)),
    }
}
