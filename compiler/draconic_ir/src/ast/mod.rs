//! Syntax tree nodes.
//!
//! The node set is closed: the evaluator matches every kind exhaustively, so
//! adding a construct means extending these enums and its handler together.

mod expr;
mod operators;
mod patterns;
mod stmt;

pub use expr::{Comprehension, Constant, Expr, ExprKind, Keyword, LambdaDef};
pub use operators::{BinaryOp, BoolOp, CmpOp, UnaryOp};
pub use patterns::Pattern;
pub use stmt::{ExceptHandler, FunctionDef, MatchCase, Module, Param, Parameters, Stmt, StmtKind};

#[cfg(test)]
mod tests;
