//! Hashable projection of values used as dict keys and set elements.

use std::rc::Rc;

use super::Value;
use crate::errors::{unhashable, DraconicError};

/// Key under which a value is stored in a `Dict` or `Set`.
///
/// Numbers are normalised so that values equal under `==` share a key:
/// `1`, `1.0` and `True` are all `Int(1)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HashKey {
    None,
    Int(i64),
    /// Bit pattern of a float with no exact integer counterpart.
    Float(u64),
    Str(Rc<str>),
    Tuple(Rc<[HashKey]>),
}

impl HashKey {
    pub fn from_value(value: &Value) -> Result<Self, DraconicError> {
        match value {
            Value::None => Ok(HashKey::None),
            Value::Bool(b) => Ok(HashKey::Int(i64::from(*b))),
            Value::Int(i) => Ok(HashKey::Int(*i)),
            Value::Float(f) => Ok(float_key(*f)),
            Value::Str(s) => Ok(HashKey::Str(Rc::clone(s))),
            Value::Tuple(items) => {
                let keys = items
                    .iter()
                    .map(HashKey::from_value)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(HashKey::Tuple(Rc::from(keys)))
            }
            _ => Err(unhashable(value)),
        }
    }
}

fn float_key(f: f64) -> HashKey {
    // i64::MIN as f64 is exact; i64::MAX as f64 rounds up to 2^63.
    if f.fract() == 0.0 && f >= -9_223_372_036_854_775_808.0 && f < 9_223_372_036_854_775_808.0 {
        return HashKey::Int(f as i64);
    }
    HashKey::Float(f.to_bits())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_numbers_share_a_key() {
        let one = HashKey::from_value(&Value::Int(1)).unwrap();
        assert_eq!(HashKey::from_value(&Value::Float(1.0)).unwrap(), one);
        assert_eq!(HashKey::from_value(&Value::Bool(true)).unwrap(), one);
        assert_eq!(
            HashKey::from_value(&Value::Float(-0.0)).unwrap(),
            HashKey::Int(0)
        );
    }

    #[test]
    fn fractional_floats_keep_their_bits() {
        let key = HashKey::from_value(&Value::Float(1.5)).unwrap();
        assert_eq!(key, HashKey::Float(1.5_f64.to_bits()));
    }

    #[test]
    fn tuples_of_hashables_are_hashable() {
        let tuple = Value::tuple(vec![Value::Int(1), Value::str("a")]);
        assert!(HashKey::from_value(&tuple).is_ok());
    }

    #[test]
    fn mutable_containers_are_unhashable() {
        let err = HashKey::from_value(&Value::list(vec![])).unwrap_err();
        assert_eq!(err.to_string(), "unhashable type: 'list'");

        let nested = Value::tuple(vec![Value::list(vec![])]);
        assert!(HashKey::from_value(&nested).is_err());
    }
}
