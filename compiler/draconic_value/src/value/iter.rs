//! Iteration over script values.
//!
//! Containers are snapshotted when iteration starts, so a loop body may
//! mutate the container it iterates without invalidating the iterator.
//! Ranges stay lazy.

use super::containers::RangeIter;
use super::Value;
use crate::errors::{not_iterable, DraconicError};

/// Iterator over the items of an iterable value.
pub enum ValueIter {
    Items(std::vec::IntoIter<Value>),
    Range(RangeIter),
}

impl ValueIter {
    pub fn new(value: &Value) -> Result<Self, DraconicError> {
        let items: Vec<Value> = match value {
            Value::Range(range) => return Ok(ValueIter::Range(range.iter())),
            Value::Str(s) => s.chars().map(|c| Value::string(c.to_string())).collect(),
            Value::List(items) => items.borrow().clone(),
            Value::Tuple(items) => items.to_vec(),
            Value::Dict(dict) => dict.borrow().keys().cloned().collect(),
            Value::Set(set) => set.borrow().iter().cloned().collect(),
            _ => return Err(not_iterable(value)),
        };
        Ok(ValueIter::Items(items.into_iter()))
    }
}

impl Iterator for ValueIter {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        match self {
            ValueIter::Items(items) => items.next(),
            ValueIter::Range(range) => range.next().map(Value::Int),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            ValueIter::Items(items) => items.size_hint(),
            ValueIter::Range(range) => range.size_hint(),
        }
    }
}

impl ExactSizeIterator for ValueIter {}
