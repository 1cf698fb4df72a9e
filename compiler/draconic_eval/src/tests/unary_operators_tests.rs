//! Tests for unary operator implementations.

use draconic_ir::UnaryOp;
use draconic_value::{ErrorKind, Value};
use pretty_assertions::assert_eq;

use crate::unary_operators::apply_unary;

#[test]
fn negation() {
    assert_eq!(apply_unary(UnaryOp::Neg, &Value::Int(5)).unwrap(), Value::Int(-5));
    assert_eq!(apply_unary(UnaryOp::Neg, &Value::Float(2.5)).unwrap(), Value::Float(-2.5));
    assert_eq!(apply_unary(UnaryOp::Neg, &Value::Bool(true)).unwrap(), Value::Int(-1));
}

#[test]
fn negating_min_int_overflows() {
    let err = apply_unary(UnaryOp::Neg, &Value::Int(i64::MIN)).unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::ScriptFault {
            name: "OverflowError",
            ..
        }
    ));
}

#[test]
fn plus_and_invert() {
    assert_eq!(apply_unary(UnaryOp::Pos, &Value::Bool(true)).unwrap(), Value::Int(1));
    assert_eq!(apply_unary(UnaryOp::Pos, &Value::Float(1.5)).unwrap(), Value::Float(1.5));
    assert_eq!(apply_unary(UnaryOp::Invert, &Value::Int(5)).unwrap(), Value::Int(-6));
    assert_eq!(apply_unary(UnaryOp::Invert, &Value::Bool(false)).unwrap(), Value::Int(-1));
}

#[test]
fn not_uses_truthiness() {
    for (value, expected) in [
        (Value::Int(0), true),
        (Value::str(""), true),
        (Value::list(Vec::new()), true),
        (Value::None, true),
        (Value::str("x"), false),
        (Value::Float(0.1), false),
    ] {
        assert_eq!(apply_unary(UnaryOp::Not, &value).unwrap(), Value::Bool(expected));
    }
}

#[test]
fn arithmetic_on_non_numbers_is_a_type_mismatch() {
    let err = apply_unary(UnaryOp::Neg, &Value::str("a")).unwrap_err();
    let ErrorKind::TypeMismatch { message } = err.kind() else {
        panic!("expected TypeMismatch, got {err:?}");
    };
    assert_eq!(message, "bad operand type for unary -: 'str'");
    assert!(apply_unary(UnaryOp::Invert, &Value::Float(1.0)).is_err());
    assert!(apply_unary(UnaryOp::Pos, &Value::None).is_err());
}
