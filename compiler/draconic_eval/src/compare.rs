//! Comparison operators and value ordering.
//!
//! Ordering rules:
//! - `int`, `float` and `bool` order numerically
//! - `str` orders by code point
//! - `list` with `list` and `tuple` with `tuple` order lexicographically
//! - `set` with `set` orders by the subset relation
//!
//! Every other ordering pair is a `TypeMismatch`. Equality fails only when
//! containers nest past `MAX_COMPARE_DEPTH`.

use std::cmp::Ordering;

use draconic_ir::CmpOp;
use draconic_value::errors::{script_fault, type_mismatch};
use draconic_value::{DraconicError, ErrorKind, Number, Value, MAX_COMPARE_DEPTH};

/// Evaluate `left <op> right`.
pub fn apply_compare(op: CmpOp, left: &Value, right: &Value) -> Result<bool, DraconicError> {
    match op {
        CmpOp::Eq => left.try_eq(right),
        CmpOp::NotEq => left.try_eq(right).map(|equal| !equal),
        CmpOp::Is => Ok(left.is_same(right)),
        CmpOp::IsNot => Ok(!left.is_same(right)),
        CmpOp::In => contains(right, left),
        CmpOp::NotIn => contains(right, left).map(|found| !found),
        CmpOp::Lt | CmpOp::LtE | CmpOp::Gt | CmpOp::GtE => {
            if let (Value::Set(a), Value::Set(b)) = (left, right) {
                let (a, b) = (a.borrow(), b.borrow());
                return Ok(match op {
                    CmpOp::Lt => a.len() < b.len() && a.is_subset(&b),
                    CmpOp::LtE => a.is_subset(&b),
                    CmpOp::Gt => b.len() < a.len() && b.is_subset(&a),
                    _ => b.is_subset(&a),
                });
            }
            let Some(ordering) = order_for(op, left, right)? else {
                // NaN compares false with everything.
                return Ok(false);
            };
            Ok(match op {
                CmpOp::Lt => ordering == Ordering::Less,
                CmpOp::LtE => ordering != Ordering::Greater,
                CmpOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            })
        }
    }
}

fn order_for(op: CmpOp, left: &Value, right: &Value) -> Result<Option<Ordering>, DraconicError> {
    compare_order(left, right).map_err(|err| match err.kind() {
        ErrorKind::TypeMismatch { .. } => not_orderable(op, left, right),
        _ => err,
    })
}

#[cold]
fn not_orderable(op: CmpOp, left: &Value, right: &Value) -> DraconicError {
    type_mismatch(format!(
        "'{}' not supported between instances of '{}' and '{}'",
        op.as_symbol(),
        left.type_name(),
        right.type_name()
    ))
}

/// Total order used by `<` and friends, `sorted`, `min` and `max`.
///
/// `Ok(None)` means the values are unordered (a NaN is involved).
pub fn compare_order(left: &Value, right: &Value) -> Result<Option<Ordering>, DraconicError> {
    order_at(left, right, 0)
}

fn order_at(
    left: &Value,
    right: &Value,
    depth: usize,
) -> Result<Option<Ordering>, DraconicError> {
    if depth > MAX_COMPARE_DEPTH {
        return Err(script_fault(
            "RuntimeError",
            "maximum recursion depth exceeded in comparison",
        ));
    }
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Ok(Some(a.cmp(b))),
        (Value::List(a), Value::List(b)) => {
            if a.ptr_eq(b) {
                return Ok(Some(Ordering::Equal));
            }
            // Snapshot so that comparing never holds a borrow across nested
            // comparisons of the same list.
            let (a, b) = (a.borrow().clone(), b.borrow().clone());
            compare_sequences(&a, &b, depth)
        }
        (Value::Tuple(a), Value::Tuple(b)) => compare_sequences(a, b, depth),
        _ => match (left.as_number(), right.as_number()) {
            (Some(a), Some(b)) => Ok(match (a, b) {
                (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
                (a, b) => a.to_f64().partial_cmp(&b.to_f64()),
            }),
            _ => Err(not_orderable(CmpOp::Lt, left, right)),
        },
    }
}

fn compare_sequences(
    a: &[Value],
    b: &[Value],
    depth: usize,
) -> Result<Option<Ordering>, DraconicError> {
    for (x, y) in a.iter().zip(b) {
        if !x.try_eq(y)? {
            return order_at(x, y, depth + 1);
        }
    }
    Ok(Some(a.len().cmp(&b.len())))
}

/// Membership test: `item in container`.
pub fn contains(container: &Value, item: &Value) -> Result<bool, DraconicError> {
    match container {
        Value::Str(haystack) => match item {
            Value::Str(needle) => Ok(haystack.contains(&**needle)),
            _ => Err(type_mismatch(format!(
                "'in <string>' requires string as left operand, not {}",
                item.type_name()
            ))),
        },
        Value::List(items) => any_equal(&items.borrow(), item),
        Value::Tuple(items) => any_equal(items, item),
        Value::Dict(dict) => dict.borrow().contains_key(item),
        Value::Set(set) => set.borrow().contains(item),
        Value::Range(range) => Ok(match item {
            Value::Float(f) if f.fract() == 0.0 && f.is_finite() => range.contains(*f as i64),
            _ => item.as_int().is_some_and(|i| range.contains(i)),
        }),
        _ => Err(type_mismatch(format!(
            "argument of type '{}' is not iterable",
            container.type_name()
        ))),
    }
}

fn any_equal(items: &[Value], item: &Value) -> Result<bool, DraconicError> {
    position_of(items, item).map(|found| found.is_some())
}

/// Index of the first item equal to `item`.
pub fn position_of(items: &[Value], item: &Value) -> Result<Option<usize>, DraconicError> {
    for (index, candidate) in items.iter().enumerate() {
        if candidate.try_eq(item)? {
            return Ok(Some(index));
        }
    }
    Ok(None)
}

/// Stable sort, ascending or (with `reverse`) descending.
///
/// Equal items keep their relative order in both directions.
pub fn sort_values(mut items: Vec<Value>, reverse: bool) -> Result<Vec<Value>, DraconicError> {
    if reverse {
        items.reverse();
    }
    let mut sorted = merge_sort(items)?;
    if reverse {
        sorted.reverse();
    }
    Ok(sorted)
}

/// A merge sort, since `slice::sort_by` may panic when the comparison is not
/// a total order and script values (NaN, mixed types) give no such promise.
fn merge_sort(mut items: Vec<Value>) -> Result<Vec<Value>, DraconicError> {
    if items.len() <= 1 {
        return Ok(items);
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items)?;
    let right = merge_sort(right)?;

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        // Take from the right only when strictly smaller, keeping the sort stable.
        if compare_order(r, l)? == Some(Ordering::Less) {
            merged.extend(right.next());
        } else {
            merged.extend(left.next());
        }
    }
    merged.extend(left);
    merged.extend(right);
    Ok(merged)
}
