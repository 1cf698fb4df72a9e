//! Indexing and slicing.

use draconic_value::errors::{
    index_error, key_error, overflow, type_mismatch, value_error,
};
use draconic_value::{DraconicError, EvalResult, RangeValue, SizeLimits, Value};

/// Evaluated bounds of a slice expression `[lower:upper:step]`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SliceBounds {
    pub lower: Option<i64>,
    pub upper: Option<i64>,
    pub step: Option<i64>,
}

impl SliceBounds {
    /// Resolve against a sequence of `len` items.
    ///
    /// Returns `(start, stop, step)` clamped the way Python's
    /// `slice.indices` does.
    fn indices(self, len: usize) -> Result<(i64, i64, i64), DraconicError> {
        let len = i64::try_from(len).unwrap_or(i64::MAX);
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(value_error("slice step cannot be zero"));
        }
        let clamp = |bound: i64| {
            if bound < 0 {
                let bound = bound.saturating_add(len);
                if bound < 0 {
                    if step < 0 {
                        -1
                    } else {
                        0
                    }
                } else {
                    bound
                }
            } else if bound >= len {
                if step < 0 {
                    len - 1
                } else {
                    len
                }
            } else {
                bound
            }
        };
        let start = match self.lower {
            Some(lower) => clamp(lower),
            None if step < 0 => len - 1,
            None => 0,
        };
        let stop = match self.upper {
            Some(upper) => clamp(upper),
            None if step < 0 => -1,
            None => len,
        };
        Ok((start, stop, step))
    }

    /// The selected positions, in order.
    fn positions(self, len: usize) -> Result<Vec<usize>, DraconicError> {
        let (start, stop, step) = self.indices(len)?;
        let mut positions = Vec::new();
        let mut i = i128::from(start);
        let (stop, step) = (i128::from(stop), i128::from(step));
        while (step > 0 && i < stop) || (step < 0 && i > stop) {
            positions.push(i as usize);
            i += step;
        }
        Ok(positions)
    }
}

/// Normalise a possibly negative index against `len`.
fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let index = if index < 0 { index.checked_add(len)? } else { index };
    if (0..len).contains(&index) {
        usize::try_from(index).ok()
    } else {
        None
    }
}

fn integer_index(container: &Value, index: &Value) -> Result<i64, DraconicError> {
    index.as_int().ok_or_else(|| {
        type_mismatch(format!(
            "{} indices must be integers or slices, not {}",
            container.type_name(),
            index.type_name()
        ))
    })
}

/// `container[index]`.
pub fn get_item(container: &Value, index: &Value) -> EvalResult {
    match container {
        Value::List(items) => {
            let i = integer_index(container, index)?;
            let items = items.borrow();
            normalize_index(i, items.len())
                .map(|i| items[i].clone())
                .ok_or_else(|| index_error("list index out of range"))
        }
        Value::Tuple(items) => {
            let i = integer_index(container, index)?;
            normalize_index(i, items.len())
                .map(|i| items[i].clone())
                .ok_or_else(|| index_error("tuple index out of range"))
        }
        Value::Str(s) => {
            let i = integer_index(container, index)?;
            let found = if s.is_ascii() {
                normalize_index(i, s.len()).map(|i| Value::str(&s[i..=i]))
            } else {
                let chars: Vec<char> = s.chars().collect();
                normalize_index(i, chars.len()).map(|i| Value::string(chars[i].to_string()))
            };
            found.ok_or_else(|| index_error("string index out of range"))
        }
        Value::Range(range) => {
            let i = integer_index(container, index)?;
            range
                .get(i)
                .map(Value::Int)
                .ok_or_else(|| index_error("range object index out of range"))
        }
        Value::Dict(dict) => dict.borrow().get(index)?.ok_or_else(|| key_error(index)),
        Value::Object(object) => object.get_item(index)?.ok_or_else(|| key_error(index)),
        _ => Err(not_subscriptable(container)),
    }
}

#[cold]
fn not_subscriptable(container: &Value) -> DraconicError {
    type_mismatch(format!(
        "'{}' object is not subscriptable",
        container.type_name()
    ))
}

/// `container[lower:upper:step]`. Always produces a fresh value.
pub fn get_slice(container: &Value, bounds: SliceBounds) -> EvalResult {
    match container {
        Value::List(items) => {
            let items = items.borrow();
            let positions = bounds.positions(items.len())?;
            Ok(Value::list(
                positions.into_iter().map(|i| items[i].clone()).collect(),
            ))
        }
        Value::Tuple(items) => {
            let positions = bounds.positions(items.len())?;
            Ok(Value::tuple(
                positions.into_iter().map(|i| items[i].clone()).collect(),
            ))
        }
        Value::Str(s) => {
            let chars: Vec<char> = s.chars().collect();
            let positions = bounds.positions(chars.len())?;
            Ok(Value::string(positions.into_iter().map(|i| chars[i]).collect()))
        }
        Value::Range(range) => slice_range(range, bounds),
        _ => Err(not_subscriptable(container)),
    }
}

fn slice_range(range: &RangeValue, bounds: SliceBounds) -> EvalResult {
    let (start, stop, step) = bounds.indices(range.len())?;
    let translate = |i: i64| {
        i.checked_mul(range.step)
            .and_then(|offset| range.start.checked_add(offset))
    };
    let sliced = (|| {
        Some(RangeValue::new(
            translate(start)?,
            translate(stop)?,
            range.step.checked_mul(step)?,
        ))
    })();
    sliced
        .map(Value::Range)
        .ok_or_else(|| overflow("range slicing"))
}

/// `container[index] = value`.
pub fn set_item(
    container: &Value,
    index: &Value,
    value: Value,
    limits: &SizeLimits,
) -> Result<(), DraconicError> {
    match container {
        Value::List(items) => {
            let i = integer_index(container, index)?;
            let mut items = items.borrow_mut();
            let len = items.len();
            let slot = normalize_index(i, len)
                .ok_or_else(|| index_error("list assignment index out of range"))?;
            items[slot] = value;
            Ok(())
        }
        Value::Dict(dict) => {
            let mut dict = dict.borrow_mut();
            dict.insert(index.clone(), value)?;
            limits.check_container_len(dict.len())
        }
        _ => Err(type_mismatch(format!(
            "'{}' object does not support item assignment",
            container.type_name()
        ))),
    }
}

/// `container[lower:upper:step] = value`. Only lists support it.
pub fn set_slice(
    container: &Value,
    bounds: SliceBounds,
    value: &Value,
    limits: &SizeLimits,
) -> Result<(), DraconicError> {
    let Value::List(items) = container else {
        return Err(type_mismatch(format!(
            "'{}' object does not support slice assignment",
            container.type_name()
        )));
    };
    limits.check_iterable(value)?;
    // Snapshot first: `xs[:] = xs` must see the old contents.
    let replacement: Vec<Value> = value.iterate()?.collect();
    let mut items = items.borrow_mut();
    let len = items.len();

    if bounds.step.unwrap_or(1) == 1 {
        let (start, stop, _) = bounds.indices(len)?;
        let start = start.clamp(0, len as i64) as usize;
        let stop = (stop.clamp(0, len as i64) as usize).max(start);
        let new_len = len - (stop - start) + replacement.len();
        limits.check_container_len(new_len)?;
        items.splice(start..stop, replacement);
        return Ok(());
    }

    let positions = bounds.positions(len)?;
    if positions.len() != replacement.len() {
        return Err(value_error(format!(
            "attempt to assign sequence of size {} to extended slice of size {}",
            replacement.len(),
            positions.len()
        )));
    }
    for (i, item) in positions.into_iter().zip(replacement) {
        items[i] = item;
    }
    Ok(())
}
