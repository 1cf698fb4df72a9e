use pretty_assertions::assert_eq;

use super::*;
use crate::LimitKind;

#[test]
fn numbers_compare_across_int_float_bool() {
    assert_eq!(Value::Int(1), Value::Float(1.0));
    assert_eq!(Value::Bool(true), Value::Int(1));
    assert_ne!(Value::Int(1), Value::Float(1.5));
    assert_ne!(Value::Int(1), Value::str("1"));
}

#[test]
fn cross_family_values_are_unequal_not_errors() {
    assert_ne!(Value::None, Value::Int(0));
    assert_ne!(Value::list(vec![]), Value::tuple(vec![]));
    assert_ne!(Value::str(""), Value::None);
}

#[test]
fn containers_compare_structurally() {
    let a = Value::list(vec![Value::Int(1), Value::str("x")]);
    let b = Value::list(vec![Value::Float(1.0), Value::str("x")]);
    assert_eq!(a, b);
    assert!(!a.is_same(&b));
    assert!(a.is_same(&a.clone()));
}

#[test]
fn dict_equality_ignores_order() {
    let a = Dict::from_pairs(vec![
        (Value::str("a"), Value::Int(1)),
        (Value::str("b"), Value::Int(2)),
    ])
    .unwrap();
    let b = Dict::from_pairs(vec![
        (Value::str("b"), Value::Int(2)),
        (Value::str("a"), Value::Int(1)),
    ])
    .unwrap();
    assert_eq!(Value::dict(a), Value::dict(b));
}

#[test]
fn dict_keeps_first_key_and_insertion_order() {
    let mut dict = Dict::new();
    dict.insert(Value::Int(1), Value::str("a")).unwrap();
    dict.insert(Value::str("z"), Value::str("b")).unwrap();
    dict.insert(Value::Float(1.0), Value::str("c")).unwrap();
    assert_eq!(dict.len(), 2);
    assert_eq!(Value::dict(dict).repr(), "{1: 'c', 'z': 'b'}");
}

#[test]
fn dict_merge_is_right_biased_and_fresh() {
    let left = Dict::from_pairs(vec![(Value::str("a"), Value::Int(1))]).unwrap();
    let right = Dict::from_pairs(vec![
        (Value::str("a"), Value::Int(9)),
        (Value::str("b"), Value::Int(2)),
    ])
    .unwrap();
    let merged = left.merged(&right);
    assert_eq!(Value::dict(merged).repr(), "{'a': 9, 'b': 2}");
    assert_eq!(left.get(&Value::str("a")).unwrap(), Some(Value::Int(1)));
}

#[test]
fn set_algebra() {
    let a = Set::from_values(vec![Value::Int(1), Value::Int(2), Value::Int(3)]).unwrap();
    let b = Set::from_values(vec![Value::Int(3), Value::Int(4)]).unwrap();
    assert_eq!(Value::set(a.union(&b)).repr(), "{1, 2, 3, 4}");
    assert_eq!(Value::set(a.intersection(&b)).repr(), "{3}");
    assert_eq!(Value::set(a.difference(&b)).repr(), "{1, 2}");
    assert_eq!(Value::set(a.symmetric_difference(&b)).repr(), "{1, 2, 4}");
    assert!(Set::from_values(vec![Value::Int(3)]).unwrap().is_subset(&b));
}

#[test]
fn truthiness() {
    assert!(!Value::None.is_truthy());
    assert!(!Value::Int(0).is_truthy());
    assert!(!Value::str("").is_truthy());
    assert!(!Value::list(vec![]).is_truthy());
    assert!(!Value::Range(RangeValue::new(3, 3, 1)).is_truthy());
    assert!(Value::Float(0.1).is_truthy());
    assert!(Value::tuple(vec![Value::None]).is_truthy());
}

#[test]
fn repr_matches_python() {
    assert_eq!(Value::None.repr(), "None");
    assert_eq!(Value::Bool(true).repr(), "True");
    assert_eq!(Value::Float(1.0).repr(), "1.0");
    assert_eq!(Value::Float(0.1).repr(), "0.1");
    assert_eq!(Value::Float(1e20).repr(), "1e+20");
    assert_eq!(Value::Float(1.5e-7).repr(), "1.5e-07");
    assert_eq!(Value::Float(f64::INFINITY).repr(), "inf");
    assert_eq!(Value::str("it's").repr(), "\"it's\"");
    assert_eq!(Value::str("a\nb").repr(), "'a\\nb'");
    assert_eq!(Value::tuple(vec![Value::Int(1)]).repr(), "(1,)");
    assert_eq!(Value::tuple(vec![]).repr(), "()");
    assert_eq!(Value::set(Set::new()).repr(), "set()");
    assert_eq!(Value::Range(RangeValue::new(0, 10, 2)).repr(), "range(0, 10, 2)");
    assert_eq!(
        Value::list(vec![Value::str("a"), Value::None]).to_str(),
        "['a', None]"
    );
    assert_eq!(Value::str("plain").to_str(), "plain");
}

#[test]
fn self_referencing_list_repr_terminates() {
    let list = Value::list(vec![]);
    if let Value::List(items) = &list {
        items.borrow_mut().push(list.clone());
    }
    assert!(list.repr().contains("..."));
    // Break the cycle so the test does not leak.
    if let Value::List(items) = &list {
        items.borrow_mut().clear();
    }
}

#[test]
fn rendering_stops_at_the_length_budget() {
    let mut tower = Value::list(vec![]);
    for _ in 0..40 {
        tower = Value::list(vec![tower.clone(), tower]);
    }
    let err = tower.try_repr(1_000).unwrap_err();
    assert_eq!(err.limit(), Some(LimitKind::StringLength));
    assert!(tower.repr().ends_with("..."));
    assert_eq!(Value::str("abc").try_to_str(3).unwrap(), "abc");
    assert!(Value::str("abcd").try_to_str(3).is_err());
    assert_eq!(
        Value::list(vec![Value::Int(1)]).try_repr(10).unwrap(),
        "[1]"
    );
}

#[test]
fn self_referencing_lists_fail_to_compare() {
    let cyclic = || {
        let list = Value::list(vec![]);
        if let Value::List(items) = &list {
            items.borrow_mut().push(list.clone());
        }
        list
    };
    let (a, b) = (cyclic(), cyclic());
    let err = a.try_eq(&b).unwrap_err();
    assert_eq!(err.exception_name(), Some("RuntimeError"));
    assert!(err.is_catchable());
    assert_ne!(a, b);
    assert!(a.try_eq(&a.clone()).unwrap());
    for list in [&a, &b] {
        if let Value::List(items) = list {
            items.borrow_mut().clear();
        }
    }
}

#[test]
fn self_referencing_dicts_fail_to_compare() {
    let cyclic = || {
        let dict = Value::dict(Dict::new());
        if let Value::Dict(entries) = &dict {
            entries
                .borrow_mut()
                .insert(Value::str("self"), dict.clone())
                .unwrap();
        }
        dict
    };
    let (a, b) = (cyclic(), cyclic());
    let err = a.try_eq(&b).unwrap_err();
    assert_eq!(err.exception_name(), Some("RuntimeError"));
    for dict in [&a, &b] {
        if let Value::Dict(entries) = dict {
            entries.borrow_mut().clear();
        }
    }
}

#[test]
fn range_len_get_contains() {
    let range = RangeValue::new(10, 0, -3);
    assert_eq!(range.len(), 4);
    assert_eq!(range.get(0), Some(10));
    assert_eq!(range.get(-1), Some(1));
    assert_eq!(range.get(4), None);
    assert!(range.contains(4));
    assert!(!range.contains(5));
    let items: Vec<i64> = range.iter().collect();
    assert_eq!(items, vec![10, 7, 4, 1]);
}

#[test]
fn empty_ranges_are_equal() {
    assert_eq!(RangeValue::new(0, 0, 1), RangeValue::new(5, 2, 1));
    assert_ne!(RangeValue::new(0, 3, 1), RangeValue::new(0, 3, 2));
}

#[test]
fn iterating_a_string_yields_characters() {
    let chars: Vec<Value> = Value::str("hé").iterate().unwrap().collect();
    assert_eq!(chars, vec![Value::str("h"), Value::str("é")]);
}

#[test]
fn iterating_a_number_is_a_type_mismatch() {
    let err = Value::Int(3).iterate().err().unwrap();
    assert_eq!(err.to_string(), "'int' object is not iterable");
}

#[test]
fn host_values_materialise_into_fresh_containers() {
    let host = HostValue::from(vec![1_i64, 2]);
    let a = host.to_value().unwrap();
    let b = host.to_value().unwrap();
    assert_eq!(a, b);
    assert!(!a.is_same(&b));
}
