//! Binary operator implementations.
//!
//! Direct enum-based dispatch over the operand pair. Augmented assignment
//! routes through `apply_binary` as well, so `a += b` and `a = a + b` share
//! one definition of every operator.
//!
//! Container results are always fresh values: no operator here mutates an
//! operand.

use draconic_ir::BinaryOp;
use draconic_value::errors::{
    limit_exceeded, overflow, unsupported_operands, value_error, zero_division,
};
use draconic_value::{DraconicError, EvalResult, LimitKind, Number, SizeLimits, Value};

/// Evaluate `left <op> right`.
pub fn apply_binary(op: BinaryOp, left: &Value, right: &Value, limits: &SizeLimits) -> EvalResult {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) if is_bitwise(op) => Ok(eval_bool_bitwise(*a, *b, op)),
        (Value::Str(a), Value::Str(b)) if op == BinaryOp::Add => {
            let len = a.len() + b.len();
            limits.check_string_len(len)?;
            let mut out = String::with_capacity(len);
            out.push_str(a);
            out.push_str(b);
            Ok(Value::string(out))
        }
        (Value::Str(s), _) | (_, Value::Str(s)) if op == BinaryOp::Mul => {
            let count = repeat_count(left, right).ok_or_else(|| unsupported(op, left, right))?;
            let len = checked_repeat_len(s.len(), count, LimitKind::StringLength, limits)?;
            limits.check_string_len(len)?;
            Ok(Value::string(s.repeat(count)))
        }
        (Value::List(a), Value::List(b)) if op == BinaryOp::Add => {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            limits.check_container_len(items.len())?;
            Ok(Value::list(items))
        }
        (Value::Tuple(a), Value::Tuple(b)) if op == BinaryOp::Add => {
            limits.check_container_len(a.len() + b.len())?;
            Ok(Value::tuple(a.iter().chain(b.iter()).cloned().collect()))
        }
        (Value::List(_) | Value::Tuple(_), _) | (_, Value::List(_) | Value::Tuple(_))
            if op == BinaryOp::Mul =>
        {
            eval_sequence_repeat(left, right, limits)
        }
        (Value::Dict(a), Value::Dict(b)) if op == BinaryOp::BitOr => {
            let merged = a.borrow().merged(&b.borrow());
            limits.check_container_len(merged.len())?;
            Ok(Value::dict(merged))
        }
        (Value::Set(a), Value::Set(b)) => {
            let (a, b) = (a.borrow(), b.borrow());
            let result = match op {
                BinaryOp::BitOr => a.union(&b),
                BinaryOp::BitAnd => a.intersection(&b),
                BinaryOp::Sub => a.difference(&b),
                BinaryOp::BitXor => a.symmetric_difference(&b),
                _ => return Err(unsupported(op, left, right)),
            };
            limits.check_container_len(result.len())?;
            Ok(Value::set(result))
        }
        _ => match (left.as_number(), right.as_number()) {
            (Some(Number::Int(a)), Some(Number::Int(b))) => eval_int_binary(a, b, op, limits),
            // Bitwise operators never promote to float.
            (Some(_), Some(_)) if is_bitwise(op) || is_shift(op) => {
                Err(unsupported(op, left, right))
            }
            (Some(a), Some(b)) => eval_float_binary(a.to_f64(), b.to_f64(), op, limits),
            _ => Err(unsupported(op, left, right)),
        },
    }
}

#[inline]
fn is_bitwise(op: BinaryOp) -> bool {
    matches!(op, BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor)
}

#[inline]
fn is_shift(op: BinaryOp) -> bool {
    matches!(op, BinaryOp::LShift | BinaryOp::RShift)
}

#[cold]
fn unsupported(op: BinaryOp, left: &Value, right: &Value) -> DraconicError {
    unsupported_operands(op.as_symbol(), left, right)
}

fn eval_bool_bitwise(a: bool, b: bool, op: BinaryOp) -> Value {
    Value::Bool(match op {
        BinaryOp::BitAnd => a & b,
        BinaryOp::BitOr => a | b,
        _ => a ^ b,
    })
}

/// The integer operand of `seq * n` or `n * seq`. Negative counts repeat
/// zero times.
fn repeat_count(left: &Value, right: &Value) -> Option<usize> {
    let count = match (left, right) {
        (Value::Str(_) | Value::List(_) | Value::Tuple(_), other)
        | (other, Value::Str(_) | Value::List(_) | Value::Tuple(_)) => other.as_int()?,
        _ => return None,
    };
    Some(usize::try_from(count.max(0)).unwrap_or(usize::MAX))
}

fn checked_repeat_len(
    unit: usize,
    count: usize,
    limit: LimitKind,
    limits: &SizeLimits,
) -> Result<usize, DraconicError> {
    unit.checked_mul(count).ok_or_else(|| {
        let max = match limit {
            LimitKind::StringLength => limits.max_string_length,
            _ => limits.max_container_size,
        };
        limit_exceeded(limit, max as u64)
    })
}

fn eval_sequence_repeat(left: &Value, right: &Value, limits: &SizeLimits) -> EvalResult {
    let count =
        repeat_count(left, right).ok_or_else(|| unsupported(BinaryOp::Mul, left, right))?;
    let sequence = if matches!(left, Value::List(_) | Value::Tuple(_)) {
        left
    } else {
        right
    };
    match sequence {
        Value::List(items) => {
            let items = items.borrow();
            let len = checked_repeat_len(items.len(), count, LimitKind::ContainerSize, limits)?;
            limits.check_container_len(len)?;
            Ok(Value::list(repeat_items(&items, count, len)))
        }
        Value::Tuple(items) => {
            let len = checked_repeat_len(items.len(), count, LimitKind::ContainerSize, limits)?;
            limits.check_container_len(len)?;
            Ok(Value::tuple(repeat_items(items, count, len)))
        }
        _ => Err(unsupported(BinaryOp::Mul, left, right)),
    }
}

fn repeat_items(items: &[Value], count: usize, len: usize) -> Vec<Value> {
    let mut out = Vec::with_capacity(len);
    for _ in 0..count {
        out.extend(items.iter().cloned());
    }
    out
}

/// Binary operations on integers. Overflow is an `OverflowError` fault.
fn eval_int_binary(a: i64, b: i64, op: BinaryOp, limits: &SizeLimits) -> EvalResult {
    let checked =
        |result: Option<i64>, name: &str| result.map(Value::Int).ok_or_else(|| overflow(name));
    match op {
        BinaryOp::Add => checked(a.checked_add(b), "addition"),
        BinaryOp::Sub => checked(a.checked_sub(b), "subtraction"),
        BinaryOp::Mul => checked(a.checked_mul(b), "multiplication"),
        BinaryOp::Div => {
            if b == 0 {
                return Err(zero_division("division by zero"));
            }
            Ok(Value::Float(a as f64 / b as f64))
        }
        BinaryOp::FloorDiv => {
            if b == 0 {
                return Err(zero_division("integer division or modulo by zero"));
            }
            checked(floor_div(a, b), "floor division")
        }
        BinaryOp::Mod => {
            if b == 0 {
                return Err(zero_division("integer division or modulo by zero"));
            }
            checked(floor_mod(a, b), "modulo")
        }
        BinaryOp::Pow => eval_int_pow(a, b, limits),
        BinaryOp::BitAnd => Ok(Value::Int(a & b)),
        BinaryOp::BitOr => Ok(Value::Int(a | b)),
        BinaryOp::BitXor => Ok(Value::Int(a ^ b)),
        BinaryOp::LShift => eval_shift_left(a, b),
        BinaryOp::RShift => eval_shift_right(a, b),
    }
}

/// Integer division rounding toward negative infinity.
pub(crate) fn floor_div(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    if (a % b != 0) && ((a < 0) != (b < 0)) {
        q.checked_sub(1)
    } else {
        Some(q)
    }
}

/// Remainder with the sign of the divisor.
pub(crate) fn floor_mod(a: i64, b: i64) -> Option<i64> {
    let r = a.checked_rem(b)?;
    if r != 0 && ((r < 0) != (b < 0)) {
        r.checked_add(b)
    } else {
        Some(r)
    }
}

fn check_power_limits(base: f64, exponent: f64, limits: &SizeLimits) -> Result<(), DraconicError> {
    if base.abs() > limits.max_power_base as f64 {
        return Err(limit_exceeded(LimitKind::PowerBase, limits.max_power_base));
    }
    if exponent.abs() > limits.max_power as f64 {
        return Err(limit_exceeded(LimitKind::Power, limits.max_power));
    }
    Ok(())
}

fn eval_int_pow(base: i64, exponent: i64, limits: &SizeLimits) -> EvalResult {
    check_power_limits(base as f64, exponent as f64, limits)?;
    if exponent < 0 {
        if base == 0 {
            return Err(zero_division("0.0 cannot be raised to a negative power"));
        }
        return Ok(Value::Float((base as f64).powf(exponent as f64)));
    }
    let exponent = u32::try_from(exponent).map_err(|_| overflow("exponentiation"))?;
    base.checked_pow(exponent)
        .map(Value::Int)
        .ok_or_else(|| overflow("exponentiation"))
}

fn eval_shift_left(a: i64, b: i64) -> EvalResult {
    if b < 0 {
        return Err(value_error("negative shift count"));
    }
    if a == 0 {
        return Ok(Value::Int(0));
    }
    if b >= 63 {
        return Err(overflow("left shift"));
    }
    let shift = b as u32;
    let result = a << shift;
    if result >> shift == a {
        Ok(Value::Int(result))
    } else {
        Err(overflow("left shift"))
    }
}

fn eval_shift_right(a: i64, b: i64) -> EvalResult {
    if b < 0 {
        return Err(value_error("negative shift count"));
    }
    if b >= 64 {
        return Ok(Value::Int(if a < 0 { -1 } else { 0 }));
    }
    Ok(Value::Int(a >> b))
}

/// Binary operations once either operand is a float.
fn eval_float_binary(a: f64, b: f64, op: BinaryOp, limits: &SizeLimits) -> EvalResult {
    let value = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => {
            if b == 0.0 {
                return Err(zero_division("float division by zero"));
            }
            a / b
        }
        BinaryOp::FloorDiv => {
            if b == 0.0 {
                return Err(zero_division("float floor division by zero"));
            }
            (a / b).floor()
        }
        BinaryOp::Mod => {
            if b == 0.0 {
                return Err(zero_division("float modulo"));
            }
            let r = a % b;
            if r != 0.0 && ((r < 0.0) != (b < 0.0)) {
                r + b
            } else {
                r
            }
        }
        BinaryOp::Pow => {
            check_power_limits(a, b, limits)?;
            if a == 0.0 && b < 0.0 {
                return Err(zero_division("0.0 cannot be raised to a negative power"));
            }
            let result = a.powf(b);
            if result.is_nan() && !a.is_nan() && !b.is_nan() {
                return Err(value_error("math domain error"));
            }
            result
        }
        BinaryOp::BitAnd
        | BinaryOp::BitOr
        | BinaryOp::BitXor
        | BinaryOp::LShift
        | BinaryOp::RShift => {
            return Err(unsupported(op, &Value::Float(a), &Value::Float(b)));
        }
    };
    Ok(Value::Float(value))
}
