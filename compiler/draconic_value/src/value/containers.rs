//! Dict, set and range storage.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use super::hash_key::HashKey;
use super::Value;
use crate::errors::DraconicError;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Insertion-ordered mapping.
///
/// Each entry keeps the key value it was first inserted with, so
/// `d[1.0] = x` on a dict that already holds `1` keeps `1` as the key.
#[derive(Clone, Default)]
pub struct Dict {
    entries: FxIndexMap<HashKey, (Value, Value)>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (Value, Value)>,
    ) -> Result<Self, DraconicError> {
        let mut dict = Dict::new();
        for (key, value) in pairs {
            dict.insert(key, value)?;
        }
        Ok(dict)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &Value) -> Result<Option<Value>, DraconicError> {
        let key = HashKey::from_value(key)?;
        Ok(self.get_by_key(&key).cloned())
    }

    pub fn get_by_key(&self, key: &HashKey) -> Option<&Value> {
        self.entries.get(key).map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &Value) -> Result<bool, DraconicError> {
        let key = HashKey::from_value(key)?;
        Ok(self.entries.contains_key(&key))
    }

    /// Insert or overwrite, keeping insertion position for existing keys.
    pub fn insert(&mut self, key: Value, value: Value) -> Result<(), DraconicError> {
        let hash_key = HashKey::from_value(&key)?;
        self.insert_hashed(hash_key, key, value);
        Ok(())
    }

    pub(crate) fn insert_hashed(&mut self, hash_key: HashKey, key: Value, value: Value) {
        match self.entries.get_mut(&hash_key) {
            Some(entry) => entry.1 = value,
            None => {
                self.entries.insert(hash_key, (key, value));
            }
        }
    }

    pub fn remove(&mut self, key: &Value) -> Result<Option<Value>, DraconicError> {
        let key = HashKey::from_value(key)?;
        Ok(self.entries.shift_remove(&key).map(|(_, value)| value))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.values().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.values().map(|(key, value)| (key, value))
    }

    /// New dict holding `self` overwritten by `other` (right-biased).
    pub fn merged(&self, other: &Dict) -> Dict {
        let mut merged = self.clone();
        for (hash_key, (key, value)) in &other.entries {
            merged.insert_hashed(hash_key.clone(), key.clone(), value.clone());
        }
        merged
    }
}

impl Dict {
    /// Same keys, with values matched pairwise by `value_eq`.
    pub(crate) fn entries_eq(
        &self,
        other: &Dict,
        mut value_eq: impl FnMut(&Value, &Value) -> Result<bool, DraconicError>,
    ) -> Result<bool, DraconicError> {
        if self.len() != other.len() {
            return Ok(false);
        }
        for (key, (_, value)) in &self.entries {
            match other.get_by_key(key) {
                Some(theirs) if value_eq(value, theirs)? => {}
                _ => return Ok(false),
            }
        }
        Ok(true)
    }
}

impl PartialEq for Dict {
    fn eq(&self, other: &Self) -> bool {
        self.entries_eq(other, Value::try_eq).unwrap_or(false)
    }
}

/// Insertion-ordered set.
#[derive(Clone, Default)]
pub struct Set {
    items: FxIndexMap<HashKey, Value>,
}

impl Set {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Result<Self, DraconicError> {
        let mut set = Set::new();
        for value in values {
            set.insert(value)?;
        }
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns false if an equal element was already present.
    pub fn insert(&mut self, value: Value) -> Result<bool, DraconicError> {
        let key = HashKey::from_value(&value)?;
        if self.items.contains_key(&key) {
            return Ok(false);
        }
        self.items.insert(key, value);
        Ok(true)
    }

    pub fn contains(&self, value: &Value) -> Result<bool, DraconicError> {
        let key = HashKey::from_value(value)?;
        Ok(self.items.contains_key(&key))
    }

    /// Returns false if the element was absent.
    pub fn remove(&mut self, value: &Value) -> Result<bool, DraconicError> {
        let key = HashKey::from_value(value)?;
        Ok(self.items.shift_remove(&key).is_some())
    }

    /// Remove and return the oldest element.
    pub fn pop(&mut self) -> Option<Value> {
        self.items.shift_remove_index(0).map(|(_, value)| value)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.values()
    }

    pub fn union(&self, other: &Set) -> Set {
        let mut items = self.items.clone();
        for (key, value) in &other.items {
            items.entry(key.clone()).or_insert_with(|| value.clone());
        }
        Set { items }
    }

    pub fn intersection(&self, other: &Set) -> Set {
        let items = self
            .items
            .iter()
            .filter(|(key, _)| other.items.contains_key(*key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Set { items }
    }

    pub fn difference(&self, other: &Set) -> Set {
        let items = self
            .items
            .iter()
            .filter(|(key, _)| !other.items.contains_key(*key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Set { items }
    }

    pub fn symmetric_difference(&self, other: &Set) -> Set {
        let mut result = self.difference(other);
        for (key, value) in &other.items {
            if !self.items.contains_key(key) {
                result.items.insert(key.clone(), value.clone());
            }
        }
        result
    }

    pub fn is_subset(&self, other: &Set) -> bool {
        self.len() <= other.len() && self.items.keys().all(|key| other.items.contains_key(key))
    }
}

impl PartialEq for Set {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.is_subset(other)
    }
}

/// `range(start, stop, step)`; `step` is never zero.
#[derive(Copy, Clone, Debug)]
pub struct RangeValue {
    pub start: i64,
    pub stop: i64,
    pub step: i64,
}

impl RangeValue {
    /// Callers validate `step != 0`.
    pub fn new(start: i64, stop: i64, step: i64) -> Self {
        debug_assert!(step != 0, "range step must be non-zero");
        RangeValue { start, stop, step }
    }

    pub fn len(&self) -> usize {
        let (start, stop, step) = (
            i128::from(self.start),
            i128::from(self.stop),
            i128::from(self.step),
        );
        let count = if step > 0 && start < stop {
            (stop - start - 1) / step + 1
        } else if step < 0 && start > stop {
            (start - stop - 1) / (-step) + 1
        } else {
            0
        };
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index`; negative indices count from the end.
    pub fn get(&self, index: i64) -> Option<i64> {
        let len = i128::try_from(self.len()).ok()?;
        let index = i128::from(index);
        let index = if index < 0 { index + len } else { index };
        if index < 0 || index >= len {
            return None;
        }
        i64::try_from(i128::from(self.start) + index * i128::from(self.step)).ok()
    }

    pub fn contains(&self, value: i64) -> bool {
        let in_bounds = if self.step > 0 {
            self.start <= value && value < self.stop
        } else {
            self.stop < value && value <= self.start
        };
        in_bounds && (i128::from(value) - i128::from(self.start)) % i128::from(self.step) == 0
    }

    pub fn iter(&self) -> RangeIter {
        RangeIter {
            range: *self,
            index: 0,
            len: self.len(),
        }
    }
}

/// Two ranges are equal when they produce the same sequence.
impl PartialEq for RangeValue {
    fn eq(&self, other: &Self) -> bool {
        let len = self.len();
        len == other.len()
            && (len == 0
                || (self.start == other.start && (len == 1 || self.step == other.step)))
    }
}

/// Lazy iterator over a range.
#[derive(Clone, Debug)]
pub struct RangeIter {
    range: RangeValue,
    index: usize,
    len: usize,
}

impl Iterator for RangeIter {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.index >= self.len {
            return None;
        }
        let value = self.range.get(i64::try_from(self.index).ok()?);
        self.index += 1;
        value
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}
