//! Draconic IR - syntax tree types for the Draconic interpreter.
//!
//! The tree mirrors the statement, expression and pattern taxonomy of the
//! Python grammar. A host-side parser produces it; the evaluator in
//! `draconic_eval` consumes it.
//!
//! - Spans for source locations
//! - `Name` for identifiers (cheaply clonable, shared)
//! - Operator enums (`BinaryOp`, `UnaryOp`, `CmpOp`, `BoolOp`)
//! - Statement, expression and pattern nodes
//! - `build`: terse constructors for assembling trees by hand
//!
//! # Serialization
//!
//! With the `serde` feature every node derives `Serialize`/`Deserialize`, so
//! trees can be shipped from an out-of-process parser as JSON.

pub mod ast;
pub mod build;
mod name;
mod span;

pub use ast::{
    BinaryOp, BoolOp, CmpOp, Comprehension, Constant, ExceptHandler, Expr, ExprKind, FunctionDef,
    Keyword, LambdaDef, MatchCase, Module, Param, Parameters, Pattern, Stmt, StmtKind, UnaryOp,
};
pub use name::{is_dunder, is_identifier, Name};
pub use span::Span;
