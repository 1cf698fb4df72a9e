//! The default capability preset.
//!
//! Installed by `Bindings::with_defaults()`. Hosts that want a bare
//! namespace use `Bindings::new()` and register only what they need.
//!
//! Functions that produce sequences in Python 3 as lazy iterators
//! (`enumerate`, `zip`) return lists here.

use draconic_ir::{BinaryOp, Name};
use draconic_value::errors::{overflow, type_mismatch, value_error};
use draconic_value::{Dict, DraconicError, EvalResult, NativeContext, RangeValue, Set, Value};

use crate::args::{arg_or_kwarg, expect_arity, int_arg, no_kwargs, take_kwarg};
use crate::binder::Bindings;
use crate::compare::{compare_order, sort_values};
use crate::methods::pairs_of;
use crate::operators::apply_binary;
use crate::print_handler::SharedPrintHandler;

type Args = Vec<Value>;
type Kwargs = Vec<(Name, Value)>;

pub(crate) fn install(bindings: &mut Bindings, print: SharedPrintHandler) {
    bindings.define_builtin("int", builtin_int);
    bindings.define_builtin("float", builtin_float);
    bindings.define_builtin("str", builtin_str);
    bindings.define_builtin("bool", builtin_bool);
    bindings.define_builtin("list", builtin_list);
    bindings.define_builtin("tuple", builtin_tuple);
    bindings.define_builtin("dict", builtin_dict);
    bindings.define_builtin("set", builtin_set);
    bindings.define_builtin("len", builtin_len);
    bindings.define_builtin("range", builtin_range);
    bindings.define_builtin("abs", builtin_abs);
    bindings.define_builtin("min", |ctx, args, kwargs| extremum("min", ctx, args, kwargs));
    bindings.define_builtin("max", |ctx, args, kwargs| extremum("max", ctx, args, kwargs));
    bindings.define_builtin("sum", builtin_sum);
    bindings.define_builtin("sorted", builtin_sorted);
    bindings.define_builtin("enumerate", builtin_enumerate);
    bindings.define_builtin("zip", builtin_zip);
    bindings.define_builtin("round", builtin_round);
    bindings.define_builtin("any", |ctx, args, kwargs| {
        truth_fold("any", ctx, args, kwargs, true)
    });
    bindings.define_builtin("all", |ctx, args, kwargs| {
        truth_fold("all", ctx, args, kwargs, false)
    });
    bindings.define_builtin("print", move |ctx, args, kwargs| {
        builtin_print(&print, ctx, args, kwargs)
    });
    bindings.define_builtin("typeof", builtin_typeof);
}

/// Items of an iterable, refusing to materialise oversized ranges.
fn collect_items(ctx: &NativeContext, iterable: &Value) -> Result<Vec<Value>, DraconicError> {
    ctx.check_iterable(iterable)?;
    let items: Vec<Value> = iterable.iterate()?.collect();
    ctx.check_container_len(items.len())?;
    Ok(items)
}

fn builtin_int(_ctx: &NativeContext, args: Args, kwargs: Kwargs) -> EvalResult {
    no_kwargs("int", &kwargs)?;
    expect_arity("int", &args, 0, 1)?;
    let Some(value) = args.first() else {
        return Ok(Value::Int(0));
    };
    match value {
        Value::Int(_) => Ok(value.clone()),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        Value::Float(f) => float_to_int(*f),
        Value::Str(s) => {
            let digits: String = s.trim().chars().filter(|c| *c != '_').collect();
            digits.parse::<i64>().map(Value::Int).map_err(|_| {
                value_error(format!(
                    "invalid literal for int() with base 10: {}",
                    value.repr()
                ))
            })
        }
        other => Err(type_mismatch(format!(
            "int() argument must be a string or a number, not '{}'",
            other.type_name()
        ))),
    }
}

fn float_to_int(f: f64) -> EvalResult {
    if f.is_nan() {
        return Err(value_error("cannot convert float NaN to integer"));
    }
    if f.is_infinite() {
        return Err(overflow("float to integer conversion"));
    }
    let truncated = f.trunc();
    // i64::MAX is not representable; 2^63 is the first float out of range.
    if truncated >= 9_223_372_036_854_775_808.0 || truncated < -9_223_372_036_854_775_808.0 {
        return Err(overflow("float to integer conversion"));
    }
    Ok(Value::Int(truncated as i64))
}

fn builtin_float(_ctx: &NativeContext, args: Args, kwargs: Kwargs) -> EvalResult {
    no_kwargs("float", &kwargs)?;
    expect_arity("float", &args, 0, 1)?;
    let Some(value) = args.first() else {
        return Ok(Value::Float(0.0));
    };
    if let Some(number) = value.as_number() {
        return Ok(Value::Float(number.to_f64()));
    }
    match value {
        Value::Str(s) => s.trim().parse::<f64>().map(Value::Float).map_err(|_| {
            value_error(format!(
                "could not convert string to float: {}",
                value.repr()
            ))
        }),
        other => Err(type_mismatch(format!(
            "float() argument must be a string or a number, not '{}'",
            other.type_name()
        ))),
    }
}

fn builtin_str(ctx: &NativeContext, args: Args, kwargs: Kwargs) -> EvalResult {
    no_kwargs("str", &kwargs)?;
    expect_arity("str", &args, 0, 1)?;
    match args.first() {
        None => Ok(Value::str("")),
        Some(Value::Str(s)) => Ok(Value::Str(s.clone())),
        Some(value) => {
            let text = value.try_to_str(ctx.limits().max_string_length)?;
            Ok(Value::string(text))
        }
    }
}

fn builtin_bool(_ctx: &NativeContext, args: Args, kwargs: Kwargs) -> EvalResult {
    no_kwargs("bool", &kwargs)?;
    expect_arity("bool", &args, 0, 1)?;
    Ok(Value::Bool(args.first().is_some_and(Value::is_truthy)))
}

fn builtin_list(ctx: &NativeContext, args: Args, kwargs: Kwargs) -> EvalResult {
    no_kwargs("list", &kwargs)?;
    expect_arity("list", &args, 0, 1)?;
    match args.first() {
        None => Ok(Value::list(Vec::new())),
        Some(iterable) => Ok(Value::list(collect_items(ctx, iterable)?)),
    }
}

fn builtin_tuple(ctx: &NativeContext, args: Args, kwargs: Kwargs) -> EvalResult {
    no_kwargs("tuple", &kwargs)?;
    expect_arity("tuple", &args, 0, 1)?;
    match args.first() {
        None => Ok(Value::tuple(Vec::new())),
        Some(Value::Tuple(items)) => Ok(Value::Tuple(items.clone())),
        Some(iterable) => Ok(Value::tuple(collect_items(ctx, iterable)?)),
    }
}

fn builtin_set(ctx: &NativeContext, args: Args, kwargs: Kwargs) -> EvalResult {
    no_kwargs("set", &kwargs)?;
    expect_arity("set", &args, 0, 1)?;
    match args.first() {
        None => Ok(Value::set(Set::new())),
        Some(iterable) => Ok(Value::set(Set::from_values(collect_items(ctx, iterable)?)?)),
    }
}

fn builtin_dict(ctx: &NativeContext, args: Args, kwargs: Kwargs) -> EvalResult {
    expect_arity("dict", &args, 0, 1)?;
    let mut dict = Dict::new();
    if let Some(source) = args.first() {
        for (key, value) in pairs_of(source)? {
            dict.insert(key, value)?;
        }
    }
    for (key, value) in kwargs {
        dict.insert(Value::str(key.as_str()), value)?;
    }
    ctx.check_container_len(dict.len())?;
    Ok(Value::dict(dict))
}

fn builtin_len(_ctx: &NativeContext, args: Args, kwargs: Kwargs) -> EvalResult {
    no_kwargs("len", &kwargs)?;
    expect_arity("len", &args, 1, 1)?;
    let len = match &args[0] {
        Value::Str(s) => s.chars().count(),
        Value::List(items) => items.borrow().len(),
        Value::Tuple(items) => items.len(),
        Value::Dict(dict) => dict.borrow().len(),
        Value::Set(set) => set.borrow().len(),
        Value::Range(range) => range.len(),
        other => {
            return Err(type_mismatch(format!(
                "object of type '{}' has no len()",
                other.type_name()
            )))
        }
    };
    Ok(Value::Int(i64::try_from(len).unwrap_or(i64::MAX)))
}

fn builtin_range(_ctx: &NativeContext, args: Args, kwargs: Kwargs) -> EvalResult {
    no_kwargs("range", &kwargs)?;
    expect_arity("range", &args, 1, 3)?;
    let ints = args
        .iter()
        .map(|arg| int_arg("range", arg))
        .collect::<Result<Vec<_>, _>>()?;
    let (start, stop, step) = match ints.as_slice() {
        [stop] => (0, *stop, 1),
        [start, stop] => (*start, *stop, 1),
        [start, stop, step, ..] => (*start, *stop, *step),
        [] => (0, 0, 1),
    };
    if step == 0 {
        return Err(value_error("range() arg 3 must not be zero"));
    }
    Ok(Value::Range(RangeValue::new(start, stop, step)))
}

fn builtin_abs(_ctx: &NativeContext, args: Args, kwargs: Kwargs) -> EvalResult {
    no_kwargs("abs", &kwargs)?;
    expect_arity("abs", &args, 1, 1)?;
    match &args[0] {
        Value::Float(f) => Ok(Value::Float(f.abs())),
        other => match other.as_int() {
            Some(i) => i
                .checked_abs()
                .map(Value::Int)
                .ok_or_else(|| overflow("abs")),
            None => Err(type_mismatch(format!(
                "bad operand type for abs(): '{}'",
                other.type_name()
            ))),
        },
    }
}

/// `min` and `max`: over one iterable argument or over several arguments.
fn extremum(func: &str, ctx: &NativeContext, args: Args, mut kwargs: Kwargs) -> EvalResult {
    let default = take_kwarg(&mut kwargs, "default");
    no_kwargs(func, &kwargs)?;
    expect_arity(func, &args, 1, usize::MAX)?;
    let candidates = if args.len() == 1 {
        collect_items(ctx, &args[0])?
    } else {
        args
    };
    let mut best: Option<Value> = None;
    for candidate in candidates {
        best = Some(match best {
            None => candidate,
            Some(current) => {
                let ordering = compare_order(&candidate, &current)?;
                let better = match func {
                    "min" => ordering == Some(std::cmp::Ordering::Less),
                    _ => ordering == Some(std::cmp::Ordering::Greater),
                };
                if better {
                    candidate
                } else {
                    current
                }
            }
        });
    }
    best.or(default)
        .ok_or_else(|| value_error(format!("{func}() arg is an empty sequence")))
}

fn builtin_sum(ctx: &NativeContext, mut args: Args, mut kwargs: Kwargs) -> EvalResult {
    expect_arity("sum", &args, 1, 2)?;
    let start = arg_or_kwarg(&mut args, 1, &mut kwargs, "start").unwrap_or(Value::Int(0));
    no_kwargs("sum", &kwargs)?;
    if start.as_str().is_some() {
        return Err(type_mismatch(
            "sum() can't sum strings [use ''.join(seq) instead]",
        ));
    }
    ctx.check_iterable(&args[0])?;
    let mut total = start;
    for (count, item) in args[0].iterate()?.enumerate() {
        ctx.poll_deadline(count)?;
        total = apply_binary(BinaryOp::Add, &total, &item, ctx.limits())?;
    }
    Ok(total)
}

fn builtin_sorted(ctx: &NativeContext, args: Args, mut kwargs: Kwargs) -> EvalResult {
    let reverse = take_kwarg(&mut kwargs, "reverse").is_some_and(|v| v.is_truthy());
    no_kwargs("sorted", &kwargs)?;
    expect_arity("sorted", &args, 1, 1)?;
    let items = collect_items(ctx, &args[0])?;
    Ok(Value::list(sort_values(items, reverse)?))
}

fn builtin_enumerate(ctx: &NativeContext, mut args: Args, mut kwargs: Kwargs) -> EvalResult {
    expect_arity("enumerate", &args, 1, 2)?;
    let start = match arg_or_kwarg(&mut args, 1, &mut kwargs, "start") {
        Some(start) => int_arg("enumerate", &start)?,
        None => 0,
    };
    no_kwargs("enumerate", &kwargs)?;
    let items = collect_items(ctx, &args[0])?;
    let mut index = start;
    let mut pairs = Vec::with_capacity(items.len());
    for item in items {
        pairs.push(Value::tuple(vec![Value::Int(index), item]));
        index = index.checked_add(1).ok_or_else(|| overflow("enumerate"))?;
    }
    Ok(Value::list(pairs))
}

fn builtin_zip(ctx: &NativeContext, args: Args, kwargs: Kwargs) -> EvalResult {
    no_kwargs("zip", &kwargs)?;
    let columns = args
        .iter()
        .map(|arg| collect_items(ctx, arg))
        .collect::<Result<Vec<_>, _>>()?;
    let len = columns.iter().map(Vec::len).min().unwrap_or(0);
    let rows = (0..len)
        .map(|i| Value::tuple(columns.iter().map(|column| column[i].clone()).collect()))
        .collect();
    Ok(Value::list(rows))
}

fn builtin_round(_ctx: &NativeContext, mut args: Args, mut kwargs: Kwargs) -> EvalResult {
    expect_arity("round", &args, 1, 2)?;
    let ndigits = arg_or_kwarg(&mut args, 1, &mut kwargs, "ndigits").unwrap_or(Value::None);
    no_kwargs("round", &kwargs)?;
    let ndigits = match ndigits {
        Value::None => None,
        other => Some(int_arg("round", &other)?),
    };
    match (&args[0], ndigits) {
        (Value::Float(f), None) => float_to_int(f.round_ties_even()),
        (Value::Float(f), Some(digits)) => {
            let digits = i32::try_from(digits.clamp(-308, 308)).unwrap_or(0);
            let scale = 10f64.powi(digits);
            let rounded = (f * scale).round_ties_even() / scale;
            Ok(Value::Float(if rounded.is_finite() { rounded } else { *f }))
        }
        (other, digits) => match other.as_int() {
            Some(i) => match digits {
                Some(digits) if digits < 0 => round_int(i, digits),
                _ => Ok(Value::Int(i)),
            },
            None => Err(type_mismatch(format!(
                "type {} doesn't define __round__ method",
                other.type_name()
            ))),
        },
    }
}

/// `round(i, -n)`: round half to even at a power of ten.
fn round_int(value: i64, digits: i64) -> EvalResult {
    let Some(scale) = u32::try_from(-digits).ok().and_then(|d| 10i64.checked_pow(d)) else {
        return Ok(Value::Int(0));
    };
    let quotient = value.div_euclid(scale);
    let remainder = value.rem_euclid(scale);
    let twice = i128::from(remainder) * 2;
    let round_up = twice > i128::from(scale) || (twice == i128::from(scale) && quotient % 2 != 0);
    let quotient = if round_up { quotient + 1 } else { quotient };
    quotient
        .checked_mul(scale)
        .map(Value::Int)
        .ok_or_else(|| overflow("round"))
}

fn truth_fold(
    func: &str,
    ctx: &NativeContext,
    args: Args,
    kwargs: Kwargs,
    any: bool,
) -> EvalResult {
    no_kwargs(func, &kwargs)?;
    expect_arity(func, &args, 1, 1)?;
    ctx.check_iterable(&args[0])?;
    for (count, item) in args[0].iterate()?.enumerate() {
        ctx.poll_deadline(count)?;
        if item.is_truthy() == any {
            return Ok(Value::Bool(any));
        }
    }
    Ok(Value::Bool(!any))
}

fn builtin_print(
    print: &SharedPrintHandler,
    ctx: &NativeContext,
    args: Args,
    mut kwargs: Kwargs,
) -> EvalResult {
    let sep = optional_str("print", take_kwarg(&mut kwargs, "sep"), " ")?;
    let end = optional_str("print", take_kwarg(&mut kwargs, "end"), "\n")?;
    no_kwargs("print", &kwargs)?;
    let mut line = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            line.push_str(&sep);
        }
        let budget = ctx.limits().max_string_length.saturating_sub(line.len());
        line.push_str(&arg.try_to_str(budget)?);
        ctx.check_string_len(line.len())?;
    }
    line.push_str(&end);
    print.write(&line);
    Ok(Value::None)
}

fn optional_str(func: &str, value: Option<Value>, default: &str) -> Result<String, DraconicError> {
    match value {
        None | Some(Value::None) => Ok(default.to_string()),
        Some(Value::Str(s)) => Ok(s.to_string()),
        Some(other) => Err(type_mismatch(format!(
            "{func}() separator must be None or a string, not {}",
            other.type_name()
        ))),
    }
}

fn builtin_typeof(_ctx: &NativeContext, args: Args, kwargs: Kwargs) -> EvalResult {
    no_kwargs("typeof", &kwargs)?;
    expect_arity("typeof", &args, 1, 1)?;
    Ok(Value::str(args[0].type_name()))
}
