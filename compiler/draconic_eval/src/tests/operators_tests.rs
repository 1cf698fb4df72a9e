//! Tests for binary operator implementations.

use draconic_ir::BinaryOp;
use draconic_value::{Dict, ErrorKind, LimitKind, Set, SizeLimits, Value};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::operators::{apply_binary, floor_div, floor_mod};
use crate::Limits;

fn limits() -> SizeLimits {
    Limits::default().size_limits()
}

fn eval(left: impl Into<Value>, op: BinaryOp, right: impl Into<Value>) -> Value {
    apply_binary(op, &left.into(), &right.into(), &limits()).unwrap()
}

fn eval_err(left: impl Into<Value>, op: BinaryOp, right: impl Into<Value>) -> ErrorKind {
    apply_binary(op, &left.into(), &right.into(), &limits())
        .unwrap_err()
        .into_kind()
}

fn fault_name(kind: &ErrorKind) -> &'static str {
    match kind {
        ErrorKind::ScriptFault { name, .. } => *name,
        other => panic!("expected a script fault, got {other:?}"),
    }
}

#[test]
fn int_arithmetic() {
    assert_eq!(eval(2_i64, BinaryOp::Add, 3_i64), Value::Int(5));
    assert_eq!(eval(5_i64, BinaryOp::Sub, 3_i64), Value::Int(2));
    assert_eq!(eval(2_i64, BinaryOp::Mul, 3_i64), Value::Int(6));
    assert_eq!(eval(7_i64, BinaryOp::Div, 2_i64), Value::Float(3.5));
    assert_eq!(eval(7_i64, BinaryOp::FloorDiv, 2_i64), Value::Int(3));
    assert_eq!(eval(7_i64, BinaryOp::Mod, 2_i64), Value::Int(1));
    assert_eq!(eval(2_i64, BinaryOp::Pow, 10_i64), Value::Int(1024));
}

#[test]
fn floor_division_rounds_down() {
    assert_eq!(eval(-7_i64, BinaryOp::FloorDiv, 2_i64), Value::Int(-4));
    assert_eq!(eval(7_i64, BinaryOp::FloorDiv, -2_i64), Value::Int(-4));
    assert_eq!(eval(-7_i64, BinaryOp::Mod, 2_i64), Value::Int(1));
    assert_eq!(eval(7_i64, BinaryOp::Mod, -2_i64), Value::Int(-1));
    assert_eq!(eval(-7.0, BinaryOp::Mod, 2.0), Value::Float(1.0));
    assert_eq!(eval(-7.5, BinaryOp::FloorDiv, 2.0), Value::Float(-4.0));
}

#[test]
fn mixed_numbers_promote_to_float() {
    assert_eq!(eval(1_i64, BinaryOp::Add, 0.5), Value::Float(1.5));
    assert_eq!(eval(true, BinaryOp::Add, 1_i64), Value::Int(2));
    assert_eq!(eval(2_i64, BinaryOp::Pow, -1_i64), Value::Float(0.5));
}

#[test]
fn bool_bitwise_stays_bool() {
    assert_eq!(eval(true, BinaryOp::BitAnd, false), Value::Bool(false));
    assert_eq!(eval(true, BinaryOp::BitOr, false), Value::Bool(true));
    assert_eq!(eval(true, BinaryOp::BitXor, true), Value::Bool(false));
    assert_eq!(eval(true, BinaryOp::Add, true), Value::Int(2));
}

#[test]
fn division_by_zero_is_a_fault() {
    for op in [BinaryOp::Div, BinaryOp::FloorDiv, BinaryOp::Mod] {
        let kind = eval_err(1_i64, op, 0_i64);
        assert_eq!(fault_name(&kind), "ZeroDivisionError");
        let kind = eval_err(1.0, op, 0.0);
        assert_eq!(fault_name(&kind), "ZeroDivisionError");
    }
    let kind = eval_err(0_i64, BinaryOp::Pow, -1_i64);
    assert_eq!(fault_name(&kind), "ZeroDivisionError");
}

#[test]
fn int_overflow_is_a_fault() {
    let kind = eval_err(i64::MAX, BinaryOp::Add, 1_i64);
    assert_eq!(fault_name(&kind), "OverflowError");
    let kind = eval_err(1_i64, BinaryOp::LShift, 63_i64);
    assert_eq!(fault_name(&kind), "OverflowError");
}

#[test]
fn shifts() {
    assert_eq!(eval(1_i64, BinaryOp::LShift, 4_i64), Value::Int(16));
    assert_eq!(eval(-16_i64, BinaryOp::RShift, 2_i64), Value::Int(-4));
    assert_eq!(eval(-1_i64, BinaryOp::RShift, 100_i64), Value::Int(-1));
    let kind = eval_err(1_i64, BinaryOp::LShift, -1_i64);
    assert_eq!(fault_name(&kind), "ValueError");
}

#[test]
fn power_limits() {
    let kind = eval_err(2_i64, BinaryOp::Pow, 5000_i64);
    assert!(matches!(
        kind,
        ErrorKind::LimitExceeded {
            limit: LimitKind::Power,
            ..
        }
    ));
    let kind = eval_err(10_000_000_i64, BinaryOp::Pow, 2_i64);
    assert!(matches!(
        kind,
        ErrorKind::LimitExceeded {
            limit: LimitKind::PowerBase,
            ..
        }
    ));
    let kind = eval_err(-8.0, BinaryOp::Pow, 0.5);
    assert_eq!(fault_name(&kind), "ValueError");
}

#[test]
fn string_concatenation_and_repetition() {
    assert_eq!(eval("ab", BinaryOp::Add, "cd"), Value::str("abcd"));
    assert_eq!(eval("ab", BinaryOp::Mul, 3_i64), Value::str("ababab"));
    assert_eq!(eval(2_i64, BinaryOp::Mul, "xy"), Value::str("xyxy"));
    assert_eq!(eval("ab", BinaryOp::Mul, -2_i64), Value::str(""));
}

#[test]
fn string_results_respect_length_limit() {
    let small = SizeLimits {
        max_string_length: 4,
        ..limits()
    };
    let err = apply_binary(
        BinaryOp::Mul,
        &Value::str("abc"),
        &Value::Int(2),
        &small,
    )
    .unwrap_err();
    assert_eq!(err.limit(), Some(LimitKind::StringLength));

    let err = apply_binary(BinaryOp::Mul, &Value::str("abc"), &Value::Int(i64::MAX), &small)
        .unwrap_err();
    assert_eq!(err.limit(), Some(LimitKind::StringLength));
}

#[test]
fn sequence_concatenation_is_fresh() {
    let left = Value::list(vec![Value::Int(1)]);
    let right = Value::list(vec![Value::Int(2)]);
    let result = apply_binary(BinaryOp::Add, &left, &right, &limits()).unwrap();
    assert_eq!(result, Value::list(vec![Value::Int(1), Value::Int(2)]));
    assert!(!result.is_same(&left));
    assert_eq!(left, Value::list(vec![Value::Int(1)]));

    let tuple = Value::tuple(vec![Value::Int(1), Value::Int(2)]);
    assert_eq!(
        apply_binary(BinaryOp::Mul, &tuple, &Value::Int(2), &limits()).unwrap(),
        Value::tuple(vec![
            Value::Int(1),
            Value::Int(2),
            Value::Int(1),
            Value::Int(2)
        ])
    );
}

#[test]
fn container_results_respect_size_limit() {
    let small = SizeLimits {
        max_container_size: 3,
        ..limits()
    };
    let list = Value::list(vec![Value::Int(1), Value::Int(2)]);
    let err = apply_binary(BinaryOp::Mul, &list, &Value::Int(2), &small).unwrap_err();
    assert_eq!(err.limit(), Some(LimitKind::ContainerSize));
    let err = apply_binary(BinaryOp::Add, &list, &list, &small).unwrap_err();
    assert_eq!(err.limit(), Some(LimitKind::ContainerSize));
}

#[test]
fn dict_union_builds_a_new_dict() {
    let a = Value::dict(
        Dict::from_pairs([
            (Value::str("x"), Value::Int(1)),
            (Value::str("y"), Value::Int(2)),
        ])
        .unwrap(),
    );
    let b = Value::dict(Dict::from_pairs([(Value::str("y"), Value::Int(3))]).unwrap());
    let merged = apply_binary(BinaryOp::BitOr, &a, &b, &limits()).unwrap();

    let expected = Dict::from_pairs([
        (Value::str("x"), Value::Int(1)),
        (Value::str("y"), Value::Int(3)),
    ])
    .unwrap();
    assert_eq!(merged, Value::dict(expected));
    assert!(!merged.is_same(&a));
    let Value::Dict(original) = &a else {
        unreachable!()
    };
    assert_eq!(original.borrow().get(&Value::str("y")).unwrap(), Some(Value::Int(2)));
}

#[test]
fn set_algebra() {
    let set = |items: &[i64]| {
        Value::set(Set::from_values(items.iter().copied().map(Value::Int)).unwrap())
    };
    let a = set(&[1, 2, 3]);
    let b = set(&[2, 3, 4]);
    assert_eq!(apply_binary(BinaryOp::BitOr, &a, &b, &limits()).unwrap(), set(&[1, 2, 3, 4]));
    assert_eq!(apply_binary(BinaryOp::BitAnd, &a, &b, &limits()).unwrap(), set(&[2, 3]));
    assert_eq!(apply_binary(BinaryOp::Sub, &a, &b, &limits()).unwrap(), set(&[1]));
    assert_eq!(apply_binary(BinaryOp::BitXor, &a, &b, &limits()).unwrap(), set(&[1, 4]));
    assert!(apply_binary(BinaryOp::Add, &a, &b, &limits()).is_err());
}

#[test]
fn type_mismatch() {
    let kind = eval_err(1_i64, BinaryOp::Add, "a");
    let ErrorKind::TypeMismatch { message } = kind else {
        panic!("expected TypeMismatch, got {kind:?}");
    };
    assert_eq!(
        message,
        "unsupported operand type(s) for +: 'int' and 'str'"
    );
    assert!(matches!(
        eval_err(1.5, BinaryOp::BitAnd, 1_i64),
        ErrorKind::TypeMismatch { .. }
    ));
    assert!(matches!(
        eval_err(Value::None, BinaryOp::Add, Value::None),
        ErrorKind::TypeMismatch { .. }
    ));
}

proptest! {
    #[test]
    fn floor_div_and_mod_agree(a in -10_000_i64..10_000, b in -100_i64..100) {
        prop_assume!(b != 0);
        let q = floor_div(a, b).unwrap();
        let r = floor_mod(a, b).unwrap();
        prop_assert_eq!(q * b + r, a);
        prop_assert!(r == 0 || (r < 0) == (b < 0));
        prop_assert!(r.abs() < b.abs());
    }
}
