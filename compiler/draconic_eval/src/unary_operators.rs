//! Unary operator implementations.

use draconic_ir::UnaryOp;
use draconic_value::errors::{bad_operand, overflow};
use draconic_value::{EvalResult, Value};

/// Evaluate `<op> operand`.
///
/// `not` works on every value; the arithmetic operators accept numbers,
/// with `bool` acting as an integer.
pub fn apply_unary(op: UnaryOp, operand: &Value) -> EvalResult {
    match op {
        UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
        UnaryOp::Neg => match operand {
            Value::Float(f) => Ok(Value::Float(-f)),
            _ => match operand.as_int() {
                Some(i) => i
                    .checked_neg()
                    .map(Value::Int)
                    .ok_or_else(|| overflow("negation")),
                None => Err(bad_operand("-", operand)),
            },
        },
        UnaryOp::Pos => match operand {
            Value::Float(f) => Ok(Value::Float(*f)),
            _ => operand
                .as_int()
                .map(Value::Int)
                .ok_or_else(|| bad_operand("+", operand)),
        },
        UnaryOp::Invert => operand
            .as_int()
            .map(|i| Value::Int(!i))
            .ok_or_else(|| bad_operand("~", operand)),
    }
}
